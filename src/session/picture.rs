// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Per-context picture submission.
//!
//! A context is either idle or rendering into exactly one surface:
//!
//! ```text
//!          begin_picture(target)
//!   Idle ------------------------> Rendering(target) --+
//!    ^                                  |      ^       | render_picture(buffers)
//!    +--------- end_picture ------------+      +-------+
//! ```
//!
//! Work completes synchronously at `end_picture`, so syncing or querying a surface only has to
//! look at whether some context is still rendering into it.

use crate::session::Session;
use crate::status::VaError;
use crate::status::VaResult;
use crate::types::SurfaceStatus;
use crate::BufferId;
use crate::ContextId;
use crate::SurfaceId;

impl Session {
    pub fn begin_picture(&mut self, context: ContextId, render_target: SurfaceId) -> VaResult<()> {
        self.context(context)?;
        self.surface(render_target)?;
        let permissive = self.options.permissive_render_targets;
        let object = self.context_mut(context)?;

        if object.is_rendering() {
            return Err(VaError::PictureInProgress(context.raw()));
        }
        if !object.render_targets.contains(&render_target) {
            if !permissive {
                return Err(VaError::TargetNotPermitted {
                    context: context.raw(),
                    surface: render_target.raw(),
                });
            }
            log::warn!("surface {} is not a render target of context {}", render_target, context);
        }

        object.current_render_target = Some(render_target);
        object.pending_buffers.clear();
        log::debug!("context {}: begin picture on surface {}", context, render_target);
        Ok(())
    }

    /// Submits `buffers` for the picture in progress. Buffers are checked in order; the first
    /// dead handle fails the call, the ones before it stay submitted.
    pub fn render_picture(&mut self, context: ContextId, buffers: &[BufferId]) -> VaResult<()> {
        if !self.context(context)?.is_rendering() {
            return Err(VaError::NoPictureInProgress(context.raw()));
        }

        for &buffer in buffers {
            self.buffer(buffer)?;
            self.context_mut(context)?.pending_buffers.push(buffer);
        }

        log::debug!("context {}: rendered {} buffers", context, buffers.len());
        Ok(())
    }

    pub fn end_picture(&mut self, context: ContextId) -> VaResult<()> {
        let object = self.context_mut(context)?;
        let target =
            object.current_render_target.take().ok_or(VaError::NoPictureInProgress(context.raw()))?;
        let submitted = std::mem::take(&mut object.pending_buffers);

        log::debug!(
            "context {}: end picture on surface {} ({} buffers)",
            context,
            target,
            submitted.len()
        );
        Ok(())
    }

    /// Waits for rendering into `render_target` to finish. Pictures complete at `end_picture`,
    /// so a surface the context is still rendering into can never finish and is reported busy.
    pub fn sync_surface(&self, context: ContextId, render_target: SurfaceId) -> VaResult<()> {
        let object = self.context(context)?;
        self.surface(render_target)?;

        if object.current_render_target == Some(render_target) {
            return Err(VaError::SurfaceBusy(render_target.raw()));
        }
        Ok(())
    }

    pub fn query_surface_status(
        &self,
        context: ContextId,
        render_target: SurfaceId,
    ) -> VaResult<SurfaceStatus> {
        let object = self.context(context)?;
        self.surface(render_target)?;

        if object.current_render_target == Some(render_target) {
            Ok(SurfaceStatus::Rendering)
        } else {
            Ok(SurfaceStatus::Ready)
        }
    }
}
