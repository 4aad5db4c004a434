// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::types::BufferType;
use crate::types::ConfigAttribType;
use crate::types::Entrypoint;
use crate::types::Profile;
use crate::types::RtFormat;
use crate::types::ATTRIB_NOT_SUPPORTED;

pub const MAX_PROFILES: usize = 11;
pub const MAX_ENTRYPOINTS: usize = 5;
pub const MAX_CONFIG_ATTRIBUTES: usize = 10;
pub const VENDOR_STRING: &str = "ChromiumOS reference VA session 1.0";

// Profiles the session accepts, in the order they are reported.
const SUPPORTED_PROFILES: [Profile; MAX_PROFILES] = [
    Profile::Mpeg2Simple,
    Profile::Mpeg2Main,
    Profile::Mpeg4Simple,
    Profile::Mpeg4AdvancedSimple,
    Profile::Mpeg4Main,
    Profile::H264Baseline,
    Profile::H264Main,
    Profile::H264High,
    Profile::Vc1Simple,
    Profile::Vc1Main,
    Profile::Vc1Advanced,
];

pub fn supported_profiles() -> &'static [Profile] {
    &SUPPORTED_PROFILES
}

pub fn is_profile_supported(profile: Profile) -> bool {
    SUPPORTED_PROFILES.contains(&profile)
}

// Returns the entrypoints available for `profile`, empty if the profile is not supported.
pub fn supported_entrypoints(profile: Profile) -> &'static [Entrypoint] {
    match profile {
        Profile::Mpeg2Simple | Profile::Mpeg2Main => &[Entrypoint::Vld, Entrypoint::MoComp],
        Profile::Mpeg4Simple
        | Profile::Mpeg4AdvancedSimple
        | Profile::Mpeg4Main
        | Profile::H264Baseline
        | Profile::H264Main
        | Profile::H264High
        | Profile::Vc1Simple
        | Profile::Vc1Main
        | Profile::Vc1Advanced => &[Entrypoint::Vld],
        Profile::H263Baseline | Profile::JpegBaseline | Profile::H264ConstrainedBaseline => &[],
    }
}

pub fn is_supported(profile: Profile, entrypoint: Entrypoint) -> bool {
    supported_entrypoints(profile).contains(&entrypoint)
}

// Value of attribute `attrib_type` for the given pair. Only the render target format is
// meaningful; everything else reports ATTRIB_NOT_SUPPORTED.
pub fn attribute_capability(
    _profile: Profile,
    _entrypoint: Entrypoint,
    attrib_type: ConfigAttribType,
) -> u32 {
    if attrib_type == ConfigAttribType::RT_FORMAT {
        RtFormat::YUV420.0
    } else {
        ATTRIB_NOT_SUPPORTED
    }
}

pub fn is_supported_rt_format(format: RtFormat) -> bool {
    format == RtFormat::YUV420
}

// Only decode-side buffers can be created.
pub fn is_supported_buffer_type(buffer_type: BufferType) -> bool {
    matches!(
        buffer_type,
        BufferType::PictureParameter
            | BufferType::IqMatrix
            | BufferType::BitPlane
            | BufferType::SliceGroupMap
            | BufferType::SliceParameter
            | BufferType::SliceData
            | BufferType::MacroblockParameter
            | BufferType::ResidualData
            | BufferType::DeblockingParameter
            | BufferType::Image
    )
}
