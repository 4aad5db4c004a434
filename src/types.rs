// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Value types shared by the session operations.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Mpeg2Simple = 0,
    Mpeg2Main = 1,
    Mpeg4Simple = 2,
    Mpeg4AdvancedSimple = 3,
    Mpeg4Main = 4,
    H264Baseline = 5,
    H264Main = 6,
    H264High = 7,
    Vc1Simple = 8,
    Vc1Main = 9,
    Vc1Advanced = 10,
    H263Baseline = 11,
    JpegBaseline = 12,
    H264ConstrainedBaseline = 13,
}

impl Profile {
    pub const ALL: [Profile; 14] = [
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
        Profile::H263Baseline,
        Profile::JpegBaseline,
        Profile::H264ConstrainedBaseline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Profile::Mpeg2Simple => "VAProfileMPEG2Simple",
            Profile::Mpeg2Main => "VAProfileMPEG2Main",
            Profile::Mpeg4Simple => "VAProfileMPEG4Simple",
            Profile::Mpeg4AdvancedSimple => "VAProfileMPEG4AdvancedSimple",
            Profile::Mpeg4Main => "VAProfileMPEG4Main",
            Profile::H264Baseline => "VAProfileH264Baseline",
            Profile::H264Main => "VAProfileH264Main",
            Profile::H264High => "VAProfileH264High",
            Profile::Vc1Simple => "VAProfileVC1Simple",
            Profile::Vc1Main => "VAProfileVC1Main",
            Profile::Vc1Advanced => "VAProfileVC1Advanced",
            Profile::H263Baseline => "VAProfileH263Baseline",
            Profile::JpegBaseline => "VAProfileJPEGBaseline",
            Profile::H264ConstrainedBaseline => "VAProfileH264ConstrainedBaseline",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    // Accepts both the full VA name and its suffix, case-insensitively ("mpeg2simple").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        Profile::ALL
            .into_iter()
            .find(|p| {
                let name = p.name().to_ascii_lowercase();
                name == wanted || name.trim_start_matches("vaprofile") == wanted
            })
            .ok_or_else(|| format!("unknown profile {:?}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entrypoint {
    Vld = 1,
    Izz = 2,
    Idct = 3,
    MoComp = 4,
    Deblocking = 5,
    EncSlice = 6,
    EncPicture = 7,
}

impl Entrypoint {
    pub fn name(self) -> &'static str {
        match self {
            Entrypoint::Vld => "VAEntrypointVLD",
            Entrypoint::Izz => "VAEntrypointIZZ",
            Entrypoint::Idct => "VAEntrypointIDCT",
            Entrypoint::MoComp => "VAEntrypointMoComp",
            Entrypoint::Deblocking => "VAEntrypointDeblocking",
            Entrypoint::EncSlice => "VAEntrypointEncSlice",
            Entrypoint::EncPicture => "VAEntrypointEncPicture",
        }
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Configuration attribute type. Values outside the named constants are accepted and stored
/// verbatim; the driver only interprets the ones it knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigAttribType(pub u32);

impl ConfigAttribType {
    pub const RT_FORMAT: Self = Self(0);
    pub const SPATIAL_RESIDUAL: Self = Self(1);
    pub const SPATIAL_CLIPPING: Self = Self(2);
    pub const INTRA_RESIDUAL: Self = Self(3);
    pub const ENCRYPTION: Self = Self(4);
    pub const RATE_CONTROL: Self = Self(5);
}

/// Value reported for an attribute that does not apply to a profile/entrypoint pair.
pub const ATTRIB_NOT_SUPPORTED: u32 = 0x8000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigAttrib {
    pub attrib_type: ConfigAttribType,
    pub value: u32,
}

impl ConfigAttrib {
    pub fn new(attrib_type: ConfigAttribType, value: u32) -> Self {
        Self { attrib_type, value }
    }
}

/// Render target format bits, as used by surfaces and the RTFormat attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RtFormat(pub u32);

impl RtFormat {
    pub const YUV420: Self = Self(0x0000_0001);
    pub const YUV422: Self = Self(0x0000_0002);
    pub const YUV444: Self = Self(0x0000_0004);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferType {
    PictureParameter = 0,
    IqMatrix = 1,
    BitPlane = 2,
    SliceGroupMap = 3,
    SliceParameter = 4,
    SliceData = 5,
    MacroblockParameter = 6,
    ResidualData = 7,
    DeblockingParameter = 8,
    Image = 9,
    ProtectedSliceData = 10,
    QMatrix = 11,
    HuffmanTable = 12,
    EncCoded = 21,
    EncSequenceParameter = 22,
    EncPictureParameter = 23,
    EncSliceParameter = 24,
}

/// Context creation flag for progressive content.
pub const PROGRESSIVE: u32 = 0x1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceStatus {
    Rendering = 0,
    Displaying = 1,
    Ready = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("VAProfileMPEG2Simple".parse::<Profile>(), Ok(Profile::Mpeg2Simple));
        assert_eq!("h264high".parse::<Profile>(), Ok(Profile::H264High));
        assert_eq!("Vc1Advanced".parse::<Profile>(), Ok(Profile::Vc1Advanced));
        assert!("av1".parse::<Profile>().is_err());
    }

    #[test]
    fn test_profile_values() {
        for (i, profile) in Profile::ALL.iter().enumerate() {
            assert_eq!(*profile as usize, i);
        }
    }
}
