// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::capabilities;
use crate::object_heap::ObjectKind;
use crate::session::Session;
use crate::status::VaError;
use crate::status::VaResult;
use crate::types::RtFormat;
use crate::ContextId;
use crate::Resolution;
use crate::SurfaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSurface {
    pub resolution: Resolution,
    pub format: RtFormat,
    // Context the surface was bound to as a render target, if any.
    pub context: Option<ContextId>,
}

impl Session {
    /// Creates `count` surfaces of the same size and format. Either all of them are created or,
    /// on failure, none are left behind.
    pub fn create_surfaces(
        &mut self,
        width: u32,
        height: u32,
        format: RtFormat,
        count: usize,
    ) -> VaResult<Vec<SurfaceId>> {
        if !capabilities::is_supported_rt_format(format) {
            return Err(VaError::UnsupportedFormat(format));
        }

        let mut ids = Vec::new();
        ids.try_reserve_exact(count).map_err(|_| VaError::AllocationFailed(ObjectKind::Surface))?;

        let surface =
            ObjectSurface { resolution: Resolution::from((width, height)), format, context: None };
        for _ in 0..count {
            match self.surfaces.insert(surface) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    log::debug!("surface allocation failed after {} of {}", ids.len(), count);
                    for id in ids.into_iter().rev() {
                        self.surfaces.free(id);
                    }
                    return Err(e);
                }
            }
        }

        log::debug!("created {} {}x{} surfaces", count, width, height);
        Ok(ids)
    }

    /// Destroys `surfaces`. The whole list is checked before anything is freed: a dead or
    /// repeated handle fails with `InvalidSurface`, a surface some context is rendering to
    /// fails with `SurfaceBusy`.
    pub fn destroy_surfaces(&mut self, surfaces: &[SurfaceId]) -> VaResult<()> {
        for (i, &surface) in surfaces.iter().enumerate() {
            if !self.surfaces.contains(surface) || surfaces[..i].contains(&surface) {
                return Err(VaError::InvalidSurface(surface.raw()));
            }
            if self.contexts.iter().any(|(_, c)| c.current_render_target == Some(surface)) {
                return Err(VaError::SurfaceBusy(surface.raw()));
            }
        }

        for &surface in surfaces.iter().rev() {
            if let Some((context, _)) =
                self.contexts.iter().find(|(_, c)| c.render_targets.contains(&surface))
            {
                log::warn!("destroying surface {} still bound to context {}", surface, context);
            }
            self.surfaces.free(surface);
        }

        log::debug!("destroyed {} surfaces", surfaces.len());
        Ok(())
    }

    pub fn surface_info(&self, surface: SurfaceId) -> VaResult<ObjectSurface> {
        self.surface(surface).copied()
    }
}
