// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::object_heap::ObjectKind;
use crate::session::Session;
use crate::status::VaError;
use crate::status::VaResult;
use crate::BufferId;
use crate::ConfigId;
use crate::ContextId;
use crate::Resolution;
use crate::SurfaceId;

/// A decode context bound to a config and a fixed set of render targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectContext {
    pub config: ConfigId,
    pub resolution: Resolution,
    pub flags: u32,
    pub render_targets: Vec<SurfaceId>,
    // Set between begin_picture and end_picture.
    pub current_render_target: Option<SurfaceId>,
    // Buffers submitted for the picture in flight.
    pub pending_buffers: Vec<BufferId>,
}

impl ObjectContext {
    fn new(config: ConfigId, resolution: Resolution, flags: u32) -> Self {
        Self {
            config,
            resolution,
            flags,
            render_targets: Vec::new(),
            current_render_target: None,
            pending_buffers: Vec::new(),
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.current_render_target.is_some()
    }
}

impl Session {
    /// Creates a context for `config` that may render into `render_targets`. The surfaces are
    /// bound to the new context.
    pub fn create_context(
        &mut self,
        config: ConfigId,
        picture_width: u32,
        picture_height: u32,
        flags: u32,
        render_targets: &[SurfaceId],
    ) -> VaResult<ContextId> {
        self.config(config)?;

        let resolution = Resolution::from((picture_width, picture_height));
        let context = self.contexts.insert(ObjectContext::new(config, resolution, flags))?;
        if let Err(e) = self.attach_render_targets(context, render_targets) {
            self.contexts.free(context);
            return Err(e);
        }

        for &target in render_targets {
            if let Some(surface) = self.surfaces.lookup_mut(target) {
                if let Some(previous) = surface.context.replace(context) {
                    log::debug!(
                        "surface {} rebound from context {} to {}",
                        target,
                        previous,
                        context
                    );
                }
            }
        }

        log::debug!(
            "created context {} ({}x{}, {} render targets)",
            context,
            picture_width,
            picture_height,
            render_targets.len()
        );
        Ok(context)
    }

    fn attach_render_targets(
        &mut self,
        context: ContextId,
        render_targets: &[SurfaceId],
    ) -> VaResult<()> {
        let mut targets = Vec::new();
        targets
            .try_reserve_exact(render_targets.len())
            .map_err(|_| VaError::AllocationFailed(ObjectKind::Context))?;
        for &target in render_targets {
            self.surface(target)?;
            targets.push(target);
        }

        self.context_mut(context)?.render_targets = targets;
        Ok(())
    }

    pub fn destroy_context(&mut self, context: ContextId) -> VaResult<()> {
        self.context(context)?;

        let object = self.contexts.free(context);
        if let Some(target) = object.current_render_target {
            log::warn!("destroying context {} while rendering to surface {}", context, target);
        }
        // Surfaces bound to this context fall back to another live context that lists them.
        for target in object.render_targets {
            let owner = self
                .contexts
                .iter()
                .find(|(_, other)| other.render_targets.contains(&target))
                .map(|(id, _)| id);
            if let Some(surface) = self.surfaces.lookup_mut(target) {
                if surface.context == Some(context) {
                    surface.context = owner;
                }
            }
        }

        log::debug!("destroyed context {}", context);
        Ok(())
    }

    pub fn context_info(&self, context: ContextId) -> VaResult<ObjectContext> {
        self.context(context).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entrypoint;
    use crate::types::Profile;
    use crate::types::RtFormat;
    use crate::types::PROGRESSIVE;

    #[test]
    fn test_create_context_binds_surfaces() {
        let mut session = Session::new();
        let config = session.create_config(Profile::H264Baseline, Entrypoint::Vld, &[]).unwrap();
        let surfaces = session.create_surfaces(1280, 720, RtFormat::YUV420, 3).unwrap();
        let context =
            session.create_context(config, 1280, 720, PROGRESSIVE, &surfaces[..2]).unwrap();

        let info = session.context_info(context).unwrap();
        assert_eq!(info.config, config);
        assert_eq!(info.resolution, Resolution { width: 1280, height: 720 });
        assert_eq!(info.flags, PROGRESSIVE);
        assert_eq!(info.render_targets, surfaces[..2].to_vec());
        assert!(!info.is_rendering());

        assert_eq!(session.surface_info(surfaces[0]).unwrap().context, Some(context));
        assert_eq!(session.surface_info(surfaces[2]).unwrap().context, None);

        session.destroy_context(context).unwrap();
        assert_eq!(session.surface_info(surfaces[0]).unwrap().context, None);
        assert_eq!(session.context_info(context), Err(VaError::InvalidContext(context.raw())));
    }

    #[test]
    fn test_shared_surface_rebinds_on_destroy() {
        let mut session = Session::new();
        let config = session.create_config(Profile::H264Main, Entrypoint::Vld, &[]).unwrap();
        let surfaces = session.create_surfaces(64, 64, RtFormat::YUV420, 2).unwrap();
        let first = session.create_context(config, 64, 64, 0, &surfaces[..1]).unwrap();
        let second = session.create_context(config, 64, 64, 0, &surfaces).unwrap();
        assert_eq!(session.surface_info(surfaces[0]).unwrap().context, Some(second));

        session.destroy_context(second).unwrap();
        assert_eq!(session.surface_info(surfaces[0]).unwrap().context, Some(first));
        assert_eq!(session.surface_info(surfaces[1]).unwrap().context, None);
        session.begin_picture(first, surfaces[0]).unwrap();
        session.end_picture(first).unwrap();

        session.destroy_context(first).unwrap();
        assert_eq!(session.surface_info(surfaces[0]).unwrap().context, None);
        session.destroy_surfaces(&surfaces).unwrap();
        session.destroy_config(config).unwrap();
        session.destroy();
    }

    #[test]
    fn test_create_context_invalid_config() {
        let mut session = Session::new();
        let surfaces = session.create_surfaces(16, 16, RtFormat::YUV420, 1).unwrap();
        let bogus = ConfigId::from_raw(0x0100_0000);
        assert_eq!(
            session.create_context(bogus, 16, 16, 0, &surfaces),
            Err(VaError::InvalidConfig(bogus.raw()))
        );
        assert_eq!(session.object_count(ObjectKind::Context), 0);
    }

    #[test]
    fn test_create_context_invalid_target_rolls_back() {
        let mut session = Session::new();
        let config = session.create_config(Profile::Mpeg2Main, Entrypoint::MoComp, &[]).unwrap();
        let surfaces = session.create_surfaces(16, 16, RtFormat::YUV420, 2).unwrap();
        session.destroy_surfaces(&surfaces[1..]).unwrap();

        assert_eq!(
            session.create_context(config, 16, 16, 0, &surfaces),
            Err(VaError::InvalidSurface(surfaces[1].raw()))
        );
        assert_eq!(session.object_count(ObjectKind::Context), 0);
        assert_eq!(session.surface_info(surfaces[0]).unwrap().context, None);
    }

    #[test]
    fn test_context_survives_config_destruction() {
        let mut session = Session::new();
        let config = session.create_config(Profile::Vc1Simple, Entrypoint::Vld, &[]).unwrap();
        let surfaces = session.create_surfaces(16, 16, RtFormat::YUV420, 1).unwrap();
        let context = session.create_context(config, 16, 16, 0, &surfaces).unwrap();

        session.destroy_config(config).unwrap();
        session.begin_picture(context, surfaces[0]).unwrap();
        session.end_picture(context).unwrap();
        session.destroy_context(context).unwrap();
        session.destroy_surfaces(&surfaces).unwrap();
        session.destroy();
    }
}
