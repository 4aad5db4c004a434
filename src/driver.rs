// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The entry points a dispatch layer calls into.

use crate::capabilities;
use crate::session::buffer::BufferInfo;
use crate::session::Session;
use crate::status::VaResult;
use crate::types::BufferType;
use crate::types::ConfigAttrib;
use crate::types::ConfigAttribType;
use crate::types::Entrypoint;
use crate::types::Profile;
use crate::types::RtFormat;
use crate::types::SurfaceStatus;
use crate::BufferId;
use crate::ConfigId;
use crate::ContextId;
use crate::SurfaceId;

pub trait VaDriver {
    fn max_profiles(&self) -> usize {
        capabilities::MAX_PROFILES
    }
    fn max_entrypoints(&self) -> usize {
        capabilities::MAX_ENTRYPOINTS
    }
    fn max_config_attributes(&self) -> usize {
        capabilities::MAX_CONFIG_ATTRIBUTES
    }
    fn vendor_string(&self) -> &str {
        capabilities::VENDOR_STRING
    }

    fn query_config_profiles(&self) -> Vec<Profile>;
    fn query_config_entrypoints(&self, profile: Profile) -> Vec<Entrypoint>;
    fn get_config_attributes(
        &self,
        profile: Profile,
        entrypoint: Entrypoint,
        types: &[ConfigAttribType],
    ) -> VaResult<Vec<ConfigAttrib>>;

    fn create_config(
        &mut self,
        profile: Profile,
        entrypoint: Entrypoint,
        attribs: &[ConfigAttrib],
    ) -> VaResult<ConfigId>;
    fn destroy_config(&mut self, config: ConfigId) -> VaResult<()>;
    fn query_config_attributes(
        &self,
        config: ConfigId,
    ) -> VaResult<(Profile, Entrypoint, Vec<ConfigAttrib>)>;

    fn create_surfaces(
        &mut self,
        width: u32,
        height: u32,
        format: RtFormat,
        count: usize,
    ) -> VaResult<Vec<SurfaceId>>;
    fn destroy_surfaces(&mut self, surfaces: &[SurfaceId]) -> VaResult<()>;

    fn create_context(
        &mut self,
        config: ConfigId,
        picture_width: u32,
        picture_height: u32,
        flags: u32,
        render_targets: &[SurfaceId],
    ) -> VaResult<ContextId>;
    fn destroy_context(&mut self, context: ContextId) -> VaResult<()>;

    fn create_buffer(
        &mut self,
        buffer_type: BufferType,
        element_size: u32,
        num_elements: u32,
        data: Option<&[u8]>,
    ) -> VaResult<BufferId>;
    fn buffer_set_num_elements(&mut self, buffer: BufferId, num_elements: u32) -> VaResult<()>;
    fn buffer_info(&self, buffer: BufferId) -> VaResult<BufferInfo>;
    fn map_buffer(&mut self, buffer: BufferId) -> VaResult<&mut [u8]>;
    fn unmap_buffer(&mut self, buffer: BufferId) -> VaResult<()>;
    fn destroy_buffer(&mut self, buffer: BufferId) -> VaResult<()>;

    fn begin_picture(&mut self, context: ContextId, render_target: SurfaceId) -> VaResult<()>;
    fn render_picture(&mut self, context: ContextId, buffers: &[BufferId]) -> VaResult<()>;
    fn end_picture(&mut self, context: ContextId) -> VaResult<()>;
    fn sync_surface(&self, context: ContextId, render_target: SurfaceId) -> VaResult<()>;
    fn query_surface_status(
        &self,
        context: ContextId,
        render_target: SurfaceId,
    ) -> VaResult<SurfaceStatus>;

    /// Destroys everything still allocated and the driver state with it.
    fn terminate(self)
    where
        Self: Sized;
}

impl VaDriver for Session {
    fn query_config_profiles(&self) -> Vec<Profile> {
        Session::query_config_profiles(self)
    }

    fn query_config_entrypoints(&self, profile: Profile) -> Vec<Entrypoint> {
        Session::query_config_entrypoints(self, profile)
    }

    fn get_config_attributes(
        &self,
        profile: Profile,
        entrypoint: Entrypoint,
        types: &[ConfigAttribType],
    ) -> VaResult<Vec<ConfigAttrib>> {
        self.get_attribute_capabilities(profile, entrypoint, types)
    }

    fn create_config(
        &mut self,
        profile: Profile,
        entrypoint: Entrypoint,
        attribs: &[ConfigAttrib],
    ) -> VaResult<ConfigId> {
        Session::create_config(self, profile, entrypoint, attribs)
    }

    fn destroy_config(&mut self, config: ConfigId) -> VaResult<()> {
        Session::destroy_config(self, config)
    }

    fn query_config_attributes(
        &self,
        config: ConfigId,
    ) -> VaResult<(Profile, Entrypoint, Vec<ConfigAttrib>)> {
        Session::get_config_attributes(self, config)
    }

    fn create_surfaces(
        &mut self,
        width: u32,
        height: u32,
        format: RtFormat,
        count: usize,
    ) -> VaResult<Vec<SurfaceId>> {
        Session::create_surfaces(self, width, height, format, count)
    }

    fn destroy_surfaces(&mut self, surfaces: &[SurfaceId]) -> VaResult<()> {
        Session::destroy_surfaces(self, surfaces)
    }

    fn create_context(
        &mut self,
        config: ConfigId,
        picture_width: u32,
        picture_height: u32,
        flags: u32,
        render_targets: &[SurfaceId],
    ) -> VaResult<ContextId> {
        Session::create_context(self, config, picture_width, picture_height, flags, render_targets)
    }

    fn destroy_context(&mut self, context: ContextId) -> VaResult<()> {
        Session::destroy_context(self, context)
    }

    fn create_buffer(
        &mut self,
        buffer_type: BufferType,
        element_size: u32,
        num_elements: u32,
        data: Option<&[u8]>,
    ) -> VaResult<BufferId> {
        self.create_buffer_with_data(buffer_type, element_size, num_elements, data)
    }

    fn buffer_set_num_elements(&mut self, buffer: BufferId, num_elements: u32) -> VaResult<()> {
        self.set_element_count(buffer, num_elements)
    }

    fn buffer_info(&self, buffer: BufferId) -> VaResult<BufferInfo> {
        Session::buffer_info(self, buffer)
    }

    fn map_buffer(&mut self, buffer: BufferId) -> VaResult<&mut [u8]> {
        Session::map_buffer(self, buffer)
    }

    fn unmap_buffer(&mut self, buffer: BufferId) -> VaResult<()> {
        Session::unmap_buffer(self, buffer)
    }

    fn destroy_buffer(&mut self, buffer: BufferId) -> VaResult<()> {
        Session::destroy_buffer(self, buffer)
    }

    fn begin_picture(&mut self, context: ContextId, render_target: SurfaceId) -> VaResult<()> {
        Session::begin_picture(self, context, render_target)
    }

    fn render_picture(&mut self, context: ContextId, buffers: &[BufferId]) -> VaResult<()> {
        Session::render_picture(self, context, buffers)
    }

    fn end_picture(&mut self, context: ContextId) -> VaResult<()> {
        Session::end_picture(self, context)
    }

    fn sync_surface(&self, context: ContextId, render_target: SurfaceId) -> VaResult<()> {
        Session::sync_surface(self, context, render_target)
    }

    fn query_surface_status(
        &self,
        context: ContextId,
        render_target: SurfaceId,
    ) -> VaResult<SurfaceStatus> {
        Session::query_surface_status(self, context, render_target)
    }

    fn terminate(self) {
        Session::terminate(self)
    }
}
