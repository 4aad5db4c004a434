// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Reference session manager for VA-style video acceleration objects.
//!
//! A [`Session`] owns four object tables (configs, contexts, surfaces and buffers) and hands
//! out opaque, kind-tagged handles to their entries. On top of the tables it enforces the
//! per-context picture protocol: `begin_picture`, any number of `render_picture`, then
//! `end_picture`, after which the target surface can be synced or queried.
//!
//! The crate does not touch hardware. Buffer contents are opaque bytes meant for a command
//! layer sitting below it, and a dispatch layer above it talks to the session through the
//! [`VaDriver`] trait, reporting errors as [`VaStatus`] codes.

pub mod capabilities;
pub mod driver;
pub mod object_heap;
pub mod session;
pub mod shared;
pub mod status;
pub mod types;

pub use driver::VaDriver;
pub use object_heap::ObjectId;
pub use object_heap::ObjectKind;
pub use session::buffer::ObjectBuffer;
pub use session::config::ObjectConfig;
pub use session::context::ObjectContext;
pub use session::surface::ObjectSurface;
pub use session::Session;
pub use session::SessionOptions;
pub use shared::SharedSession;
pub use status::VaError;
pub use status::VaResult;
pub use status::VaStatus;

pub type ConfigId = ObjectId<ObjectConfig>;
pub type ContextId = ObjectId<ObjectContext>;
pub type SurfaceId = ObjectId<ObjectSurface>;
pub type BufferId = ObjectId<ObjectBuffer>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn get_area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from(value: (u32, u32)) -> Self {
        Self { width: value.0, height: value.1 }
    }
}

impl From<Resolution> for (u32, u32) {
    fn from(value: Resolution) -> Self {
        (value.width, value.height)
    }
}
