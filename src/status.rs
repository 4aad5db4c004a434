// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;

use thiserror::Error;

use crate::capabilities;
use crate::object_heap::ObjectKind;
use crate::types::BufferType;
use crate::types::Entrypoint;
use crate::types::Profile;
use crate::types::RtFormat;

/// Numeric status codes reported across the driver boundary.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaStatus {
    Success = 0x0000_0000,
    OperationFailed = 0x0000_0001,
    AllocationFailed = 0x0000_0002,
    InvalidDisplay = 0x0000_0003,
    InvalidConfig = 0x0000_0004,
    InvalidContext = 0x0000_0005,
    InvalidSurface = 0x0000_0006,
    InvalidBuffer = 0x0000_0007,
    InvalidImage = 0x0000_0008,
    InvalidSubpicture = 0x0000_0009,
    AttrNotSupported = 0x0000_000a,
    MaxNumExceeded = 0x0000_000b,
    UnsupportedProfile = 0x0000_000c,
    UnsupportedEntrypoint = 0x0000_000d,
    UnsupportedRtFormat = 0x0000_000e,
    UnsupportedBufferType = 0x0000_000f,
    SurfaceBusy = 0x0000_0010,
    FlagNotSupported = 0x0000_0011,
    InvalidParameter = 0x0000_0012,
    ResolutionNotSupported = 0x0000_0013,
    Unknown = 0xffff_ffff,
}

impl VaStatus {
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Short english description of the status.
    pub fn description(self) -> &'static str {
        match self {
            VaStatus::Success => "success (no error)",
            VaStatus::OperationFailed => "operation failed",
            VaStatus::AllocationFailed => "resource allocation failed",
            VaStatus::InvalidDisplay => "invalid VADisplay",
            VaStatus::InvalidConfig => "invalid VAConfigID",
            VaStatus::InvalidContext => "invalid VAContextID",
            VaStatus::InvalidSurface => "invalid VASurfaceID",
            VaStatus::InvalidBuffer => "invalid VABufferID",
            VaStatus::InvalidImage => "invalid VAImageID",
            VaStatus::InvalidSubpicture => "invalid VASubpictureID",
            VaStatus::AttrNotSupported => "attribute not supported",
            VaStatus::MaxNumExceeded => "list argument exceeds maximum number",
            VaStatus::UnsupportedProfile => "the requested VAProfile is not supported",
            VaStatus::UnsupportedEntrypoint => "the requested VAEntryPoint is not supported",
            VaStatus::UnsupportedRtFormat => "the requested RT Format is not supported",
            VaStatus::UnsupportedBufferType => "the requested VABufferType is not supported",
            VaStatus::SurfaceBusy => "surface is in use",
            VaStatus::FlagNotSupported => "flag not supported",
            VaStatus::InvalidParameter => "invalid parameter",
            VaStatus::ResolutionNotSupported => "resolution not supported",
            VaStatus::Unknown => "unknown libva error",
        }
    }
}

impl fmt::Display for VaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl<T> From<&VaResult<T>> for VaStatus {
    fn from(result: &VaResult<T>) -> Self {
        match result {
            Ok(_) => VaStatus::Success,
            Err(e) => e.status(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VaError {
    #[error("unsupported profile/entrypoint pair {profile:?}/{entrypoint:?}")]
    UnsupportedProfileOrEntrypoint { profile: Profile, entrypoint: Entrypoint },
    #[error("too many config attributes (max {max})")]
    AttributeCapacityExceeded { max: usize },
    #[error("failed to allocate {0} object")]
    AllocationFailed(ObjectKind),
    #[error("invalid config id {0:08x}")]
    InvalidConfig(u32),
    #[error("invalid context id {0:08x}")]
    InvalidContext(u32),
    #[error("invalid surface id {0:08x}")]
    InvalidSurface(u32),
    #[error("invalid buffer id {0:08x}")]
    InvalidBuffer(u32),
    #[error("unsupported render target format {0:?}")]
    UnsupportedFormat(RtFormat),
    #[error("unsupported buffer type {0:?}")]
    UnsupportedBufferType(BufferType),
    #[error("element count {requested} exceeds buffer capacity {max}")]
    ElementCountOutOfRange { requested: u32, max: u32 },
    #[error("buffer data is {actual} bytes, expected {expected}")]
    DataSizeMismatch { expected: usize, actual: usize },
    #[error("surface {surface:08x} is not a render target of context {context:08x}")]
    TargetNotPermitted { context: u32, surface: u32 },
    #[error("surface {0:08x} is still being rendered")]
    SurfaceBusy(u32),
    #[error("context {0:08x} already has a picture in progress")]
    PictureInProgress(u32),
    #[error("context {0:08x} has no picture in progress")]
    NoPictureInProgress(u32),
}

impl VaError {
    /// The status code an external dispatch layer reports for this error.
    pub fn status(&self) -> VaStatus {
        match self {
            VaError::UnsupportedProfileOrEntrypoint { profile, .. } => {
                if capabilities::is_profile_supported(*profile) {
                    VaStatus::UnsupportedEntrypoint
                } else {
                    VaStatus::UnsupportedProfile
                }
            }
            VaError::AttributeCapacityExceeded { .. } => VaStatus::MaxNumExceeded,
            VaError::AllocationFailed(_) => VaStatus::AllocationFailed,
            VaError::InvalidConfig(_) => VaStatus::InvalidConfig,
            VaError::InvalidContext(_) => VaStatus::InvalidContext,
            VaError::InvalidSurface(_) | VaError::TargetNotPermitted { .. } => {
                VaStatus::InvalidSurface
            }
            VaError::InvalidBuffer(_) => VaStatus::InvalidBuffer,
            VaError::UnsupportedFormat(_) => VaStatus::UnsupportedRtFormat,
            VaError::UnsupportedBufferType(_) => VaStatus::UnsupportedBufferType,
            VaError::ElementCountOutOfRange { .. } | VaError::DataSizeMismatch { .. } => {
                VaStatus::InvalidParameter
            }
            VaError::SurfaceBusy(_) => VaStatus::SurfaceBusy,
            VaError::PictureInProgress(_) | VaError::NoPictureInProgress(_) => {
                VaStatus::OperationFailed
            }
        }
    }
}

pub type VaResult<T> = std::result::Result<T, VaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(VaStatus::Success.code(), 0);
        assert_eq!(VaStatus::MaxNumExceeded.code(), 0xb);
        assert_eq!(VaStatus::SurfaceBusy.code(), 0x10);
        assert_eq!(VaStatus::ResolutionNotSupported.code(), 0x13);
        assert_eq!(VaStatus::Unknown.code(), 0xffff_ffff);
        assert_eq!(VaStatus::InvalidConfig.to_string(), "invalid VAConfigID");
    }

    #[test]
    fn test_profile_entrypoint_status() {
        let bad_entrypoint = VaError::UnsupportedProfileOrEntrypoint {
            profile: Profile::H264Main,
            entrypoint: Entrypoint::MoComp,
        };
        assert_eq!(bad_entrypoint.status(), VaStatus::UnsupportedEntrypoint);

        let bad_profile = VaError::UnsupportedProfileOrEntrypoint {
            profile: Profile::H263Baseline,
            entrypoint: Entrypoint::Vld,
        };
        assert_eq!(bad_profile.status(), VaStatus::UnsupportedProfile);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            VaError::AttributeCapacityExceeded { max: 10 }.status(),
            VaStatus::MaxNumExceeded
        );
        assert_eq!(
            VaError::AllocationFailed(ObjectKind::Surface).status(),
            VaStatus::AllocationFailed
        );
        assert_eq!(
            VaError::TargetNotPermitted { context: 0x0200_0000, surface: 0x0400_0000 }.status(),
            VaStatus::InvalidSurface
        );
        assert_eq!(
            VaError::ElementCountOutOfRange { requested: 5, max: 4 }.status(),
            VaStatus::InvalidParameter
        );
        assert_eq!(
            VaError::UnsupportedFormat(RtFormat::YUV444).status(),
            VaStatus::UnsupportedRtFormat
        );
        assert_eq!(VaStatus::from(&Ok::<(), VaError>(())), VaStatus::Success);
        assert_eq!(
            VaStatus::from(&Err::<(), _>(VaError::InvalidBuffer(7))),
            VaStatus::InvalidBuffer
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(VaError::InvalidSurface(0x0400_0001).to_string(), "invalid surface id 04000001");
        assert_eq!(
            VaError::AllocationFailed(ObjectKind::Buffer).to_string(),
            "failed to allocate buffer object"
        );
    }
}
