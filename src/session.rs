// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::capabilities;
use crate::object_heap::HeapCursor;
use crate::object_heap::ObjectHeap;
use crate::object_heap::ObjectKind;
use crate::object_heap::MAX_HEAP_OBJECTS;
use crate::object_heap::OBJECT_HEAP_INCREMENT;
use crate::status::VaError;
use crate::status::VaResult;
use crate::types::Entrypoint;
use crate::types::Profile;
use crate::BufferId;
use crate::ConfigId;
use crate::ContextId;
use crate::SurfaceId;

pub mod buffer;
pub mod config;
pub mod context;
pub mod picture;
pub mod surface;

use buffer::ObjectBuffer;
use config::ObjectConfig;
use context::ObjectContext;
use surface::ObjectSurface;

/// Growth policy of one object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapLimits {
    pub increment: usize,
    pub max_objects: usize,
}

impl Default for HeapLimits {
    fn default() -> Self {
        Self { increment: OBJECT_HEAP_INCREMENT, max_objects: MAX_HEAP_OBJECTS }
    }
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub config_heap: HeapLimits,
    pub context_heap: HeapLimits,
    pub surface_heap: HeapLimits,
    pub buffer_heap: HeapLimits,
    // Attributes a single config can hold, the seeded RTFormat included.
    pub max_config_attributes: usize,
    // Let begin_picture target surfaces the context was not created with.
    pub permissive_render_targets: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            config_heap: HeapLimits::default(),
            context_heap: HeapLimits::default(),
            surface_heap: HeapLimits::default(),
            buffer_heap: HeapLimits::default(),
            max_config_attributes: capabilities::MAX_CONFIG_ATTRIBUTES,
            permissive_render_targets: false,
        }
    }
}

/// One driver session: the four object tables and the invariants tying them together.
#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    configs: ObjectHeap<ObjectConfig>,
    contexts: ObjectHeap<ObjectContext>,
    surfaces: ObjectHeap<ObjectSurface>,
    buffers: ObjectHeap<ObjectBuffer>,
}

fn make_heap<T>(kind: ObjectKind, limits: HeapLimits) -> ObjectHeap<T> {
    ObjectHeap::with_limits(kind, limits.increment, limits.max_objects)
}

// Frees every object left in `heap`.
fn release_leftovers<T>(heap: &mut ObjectHeap<T>) {
    let mut cursor = HeapCursor::new();
    while let Some(id) = heap.next_live(&mut cursor) {
        log::info!("{} {} still allocated, destroying", heap.kind(), id);
        heap.free(id);
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        log::debug!("creating session with {:?}", options);
        Self {
            configs: make_heap(ObjectKind::Config, options.config_heap),
            contexts: make_heap(ObjectKind::Context, options.context_heap),
            surfaces: make_heap(ObjectKind::Surface, options.surface_heap),
            buffers: make_heap(ObjectKind::Buffer, options.buffer_heap),
            options,
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Number of live objects of `kind`.
    pub fn object_count(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Config => self.configs.len(),
            ObjectKind::Context => self.contexts.len(),
            ObjectKind::Surface => self.surfaces.len(),
            ObjectKind::Buffer => self.buffers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        ObjectKind::ALL.into_iter().all(|kind| self.object_count(kind) == 0)
    }

    pub fn query_config_profiles(&self) -> Vec<Profile> {
        capabilities::supported_profiles().to_vec()
    }

    pub fn query_config_entrypoints(&self, profile: Profile) -> Vec<Entrypoint> {
        capabilities::supported_entrypoints(profile).to_vec()
    }

    /// Tears the session down. Every object must already have been destroyed.
    ///
    /// # Panics
    ///
    /// Panics if any table still holds a live object.
    pub fn destroy(self) {
        self.buffers.destroy();
        self.contexts.destroy();
        self.surfaces.destroy();
        self.configs.destroy();
        log::debug!("session destroyed");
    }

    /// Tears the session down, destroying whatever the client left behind first.
    pub fn terminate(mut self) {
        release_leftovers(&mut self.buffers);
        release_leftovers(&mut self.contexts);
        release_leftovers(&mut self.surfaces);
        release_leftovers(&mut self.configs);
        self.destroy();
    }

    fn config(&self, id: ConfigId) -> VaResult<&ObjectConfig> {
        self.configs.lookup(id).ok_or(VaError::InvalidConfig(id.raw()))
    }

    fn context(&self, id: ContextId) -> VaResult<&ObjectContext> {
        self.contexts.lookup(id).ok_or(VaError::InvalidContext(id.raw()))
    }

    fn context_mut(&mut self, id: ContextId) -> VaResult<&mut ObjectContext> {
        self.contexts.lookup_mut(id).ok_or(VaError::InvalidContext(id.raw()))
    }

    fn surface(&self, id: SurfaceId) -> VaResult<&ObjectSurface> {
        self.surfaces.lookup(id).ok_or(VaError::InvalidSurface(id.raw()))
    }

    fn buffer(&self, id: BufferId) -> VaResult<&ObjectBuffer> {
        self.buffers.lookup(id).ok_or(VaError::InvalidBuffer(id.raw()))
    }

    fn buffer_mut(&mut self, id: BufferId) -> VaResult<&mut ObjectBuffer> {
        self.buffers.lookup_mut(id).ok_or(VaError::InvalidBuffer(id.raw()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BufferType;
    use crate::types::RtFormat;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert_eq!(session.options().max_config_attributes, 10);
        assert!(!session.options().permissive_render_targets);
        session.destroy();
    }

    #[test]
    fn test_query_profiles_and_entrypoints() {
        let session = Session::new();
        let profiles = session.query_config_profiles();
        assert_eq!(profiles.len(), capabilities::MAX_PROFILES);
        assert_eq!(profiles[0], Profile::Mpeg2Simple);
        assert_eq!(
            session.query_config_entrypoints(Profile::Mpeg2Main),
            vec![Entrypoint::Vld, Entrypoint::MoComp]
        );
        assert!(session.query_config_entrypoints(Profile::JpegBaseline).is_empty());
    }

    #[test]
    fn test_terminate_releases_leftovers() {
        let mut session = Session::new();
        let config = session.create_config(Profile::H264Main, Entrypoint::Vld, &[]).unwrap();
        let surfaces = session.create_surfaces(64, 64, RtFormat::YUV420, 3).unwrap();
        let context = session.create_context(config, 64, 64, 0, &surfaces).unwrap();
        session.create_buffer(BufferType::SliceData).unwrap();
        session.begin_picture(context, surfaces[0]).unwrap();

        assert_eq!(session.object_count(ObjectKind::Surface), 3);
        assert_eq!(session.object_count(ObjectKind::Buffer), 1);
        session.terminate();
    }

    #[test]
    #[should_panic(expected = "objects still allocated")]
    fn test_destroy_with_leftovers_panics() {
        let mut session = Session::new();
        session.create_surfaces(16, 16, RtFormat::YUV420, 1).unwrap();
        session.destroy();
    }
}
