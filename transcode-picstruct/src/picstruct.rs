//! Picture structure codes and source field modes.
//!
//! A picture structure (`pic_struct` in H.264/HEVC picture timing SEI)
//! tells the decoder how one coded frame is displayed: as a progressive
//! frame, as one or more fields, or repeated as whole frames.

use std::fmt;
use std::str::FromStr;

use crate::error::{PicStructError, Result};
use serde::{Deserialize, Serialize};

/// A single interlaced field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Top (even lines) field.
    Top,
    /// Bottom (odd lines) field.
    Bottom,
}

impl Field {
    /// The other field of the frame.
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Display structure of one coded frame.
///
/// Discriminants are the values written to the picstruct index and carried
/// in the picture timing SEI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PicStruct {
    /// Progressive frame.
    ProgressiveFrame = 0,
    /// Top field only.
    Top = 1,
    /// Bottom field only.
    Bottom = 2,
    /// Top field, then bottom field.
    TopBottom = 3,
    /// Bottom field, then top field.
    BottomTop = 4,
    /// Top, bottom, top repeated.
    TopBottomTop = 5,
    /// Bottom, top, bottom repeated.
    BottomTopBottom = 6,
    /// Frame displayed twice.
    FrameDoubling = 7,
    /// Frame displayed three times.
    FrameTripling = 8,
    /// Top field paired with the previous bottom field (HEVC).
    TopPrevBottom = 9,
    /// Bottom field paired with the previous top field (HEVC).
    BottomPrevTop = 10,
    /// Top field paired with the next bottom field (HEVC).
    TopNextBottom = 11,
    /// Bottom field paired with the next top field (HEVC).
    BottomNextTop = 12,
}

impl PicStruct {
    /// All picture structures in value order.
    pub const ALL: [PicStruct; 13] = [
        Self::ProgressiveFrame,
        Self::Top,
        Self::Bottom,
        Self::TopBottom,
        Self::BottomTop,
        Self::TopBottomTop,
        Self::BottomTopBottom,
        Self::FrameDoubling,
        Self::FrameTripling,
        Self::TopPrevBottom,
        Self::BottomPrevTop,
        Self::TopNextBottom,
        Self::BottomNextTop,
    ];

    /// Numeric value as carried in the bitstream.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Canonical identifier, e.g. `TOP_BOTTOM_TOP`.
    pub fn name(self) -> &'static str {
        match self {
            Self::ProgressiveFrame => "PROGRESSIVE_FRAME",
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::TopBottom => "TOP_BOTTOM",
            Self::BottomTop => "BOTTOM_TOP",
            Self::TopBottomTop => "TOP_BOTTOM_TOP",
            Self::BottomTopBottom => "BOTTOM_TOP_BOTTOM",
            Self::FrameDoubling => "FRAME_DOUBLING",
            Self::FrameTripling => "FRAME_TRIPLING",
            Self::TopPrevBottom => "TOP_PREVBOTTOM",
            Self::BottomPrevTop => "BOTTOM_PREVTOP",
            Self::TopNextBottom => "TOP_NEXTBOTTOM",
            Self::BottomNextTop => "BOTTOM_NEXTTOP",
        }
    }

    /// Initials of each word of the identifier (`TOP_BOTTOM_TOP` -> `TBT`).
    pub fn abbreviation(self) -> String {
        self.name()
            .split('_')
            .filter_map(|word| word.chars().next())
            .collect()
    }

    /// Last field shown, derived from the identifier suffix.
    ///
    /// Progressive and frame-repeat structures carry no field parity.
    pub fn last_field(self) -> Option<Field> {
        match self {
            Self::Top | Self::BottomTop | Self::TopBottomTop | Self::BottomPrevTop
            | Self::BottomNextTop => Some(Field::Top),
            Self::Bottom | Self::TopBottom | Self::BottomTopBottom | Self::TopPrevBottom
            | Self::TopNextBottom => Some(Field::Bottom),
            Self::ProgressiveFrame | Self::FrameDoubling | Self::FrameTripling => None,
        }
    }

    /// Whether this structure displays whole frames.
    pub fn is_progressive(self) -> bool {
        matches!(
            self,
            Self::ProgressiveFrame | Self::FrameDoubling | Self::FrameTripling
        )
    }

    /// Whether this structure repeats its first field (3 fields).
    pub fn is_three_field(self) -> bool {
        matches!(self, Self::TopBottomTop | Self::BottomTopBottom)
    }

    /// The other 3-field structure, for `TOP_BOTTOM_TOP` and `BOTTOM_TOP_BOTTOM`.
    pub fn complement(self) -> Option<Self> {
        match self {
            Self::TopBottomTop => Some(Self::BottomTopBottom),
            Self::BottomTopBottom => Some(Self::TopBottomTop),
            _ => None,
        }
    }

    /// Display duration in field periods.
    pub fn field_duration(self) -> u32 {
        match self {
            Self::Top
            | Self::Bottom
            | Self::TopPrevBottom
            | Self::BottomPrevTop
            | Self::TopNextBottom
            | Self::BottomNextTop => 1,
            Self::ProgressiveFrame | Self::TopBottom | Self::BottomTop => 2,
            Self::TopBottomTop | Self::BottomTopBottom => 3,
            Self::FrameDoubling => 4,
            Self::FrameTripling => 6,
        }
    }

    /// Pick the structure showing `field_count` fields after a frame whose
    /// last field was `previous`.
    ///
    /// The result starts on the field opposite to `previous`; without a
    /// previous parity the top-first variant is chosen.
    pub fn from_field_repeat(field_count: i64, previous: Option<Field>) -> Result<Self> {
        let after_top = previous == Some(Field::Top);
        match (field_count, after_top) {
            (1, false) => Ok(Self::Top),
            (1, true) => Ok(Self::Bottom),
            (2, false) => Ok(Self::TopBottom),
            (2, true) => Ok(Self::BottomTop),
            (3, false) => Ok(Self::TopBottomTop),
            (3, true) => Ok(Self::BottomTopBottom),
            (count, _) => Err(PicStructError::UnmappedRepeatCount {
                count,
                progressive: false,
            }),
        }
    }

    /// Pick the structure showing one frame `frame_count` times.
    pub fn from_frame_repeat(frame_count: i64) -> Result<Self> {
        match frame_count {
            1 => Ok(Self::ProgressiveFrame),
            2 => Ok(Self::FrameDoubling),
            3 => Ok(Self::FrameTripling),
            count => Err(PicStructError::UnmappedRepeatCount {
                count,
                progressive: true,
            }),
        }
    }
}

impl fmt::Display for PicStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for PicStruct {
    type Error = PicStructError;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| transcode_core::Error::invalid_param(format!("pic_struct {}", value)).into())
    }
}

/// Field dominance of a source, or a request to treat it as progressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// Progressive frames.
    Progressive,
    /// Bottom field displayed first.
    BottomFieldFirst,
    /// Top field displayed first.
    #[default]
    TopFieldFirst,
}

impl FieldMode {
    /// Numeric code used in frame properties and the index file.
    pub fn code(self) -> i64 {
        match self {
            Self::Progressive => 0,
            Self::BottomFieldFirst => 1,
            Self::TopFieldFirst => 2,
        }
    }

    /// Short name: `P`, `BFF` or `TFF`.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Progressive => "P",
            Self::BottomFieldFirst => "BFF",
            Self::TopFieldFirst => "TFF",
        }
    }

    /// Whether the mode describes interlaced fields.
    pub fn is_field_based(self) -> bool {
        self != Self::Progressive
    }

    /// Parity assumed to precede the first frame of a cycle.
    ///
    /// A top-field-first cycle must open on a top field, so it is seeded as
    /// if a bottom field had just been shown, and vice versa.
    pub fn seed_field(self) -> Option<Field> {
        match self {
            Self::Progressive => None,
            Self::BottomFieldFirst => Some(Field::Top),
            Self::TopFieldFirst => Some(Field::Bottom),
        }
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl TryFrom<i64> for FieldMode {
    type Error = PicStructError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Progressive),
            1 => Ok(Self::BottomFieldFirst),
            2 => Ok(Self::TopFieldFirst),
            other => Err(PicStructError::InvalidFieldMode(other)),
        }
    }
}

impl FromStr for FieldMode {
    type Err = PicStructError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "progressive" => Ok(Self::Progressive),
            "bff" | "bottom" => Ok(Self::BottomFieldFirst),
            "tff" | "top" => Ok(Self::TopFieldFirst),
            other => match other.parse::<i64>() {
                Ok(code) => Self::try_from(code),
                Err(_) => Err(transcode_core::Error::invalid_param(format!(
                    "unknown field mode '{}'",
                    s
                ))
                .into()),
            },
        }
    }
}

/// Video coding format that will carry the picture structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodingFormat {
    /// H.264 / AVC.
    #[default]
    H264,
    /// H.265 / HEVC.
    H265,
}

impl VideoCodingFormat {
    /// Whether this format can signal `code`.
    ///
    /// The paired-field structures (values 9-12) only exist in HEVC.
    pub fn supports(self, code: PicStruct) -> bool {
        match self {
            Self::H264 => code.value() <= PicStruct::FrameTripling.value(),
            Self::H265 => true,
        }
    }
}

impl fmt::Display for VideoCodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H264 => f.write_str("H.264"),
            Self::H265 => f.write_str("H.265"),
        }
    }
}

impl FromStr for VideoCodingFormat {
    type Err = PicStructError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h264" | "h.264" | "avc" => Ok(Self::H264),
            "h265" | "h.265" | "hevc" => Ok(Self::H265),
            _ => Err(transcode_core::Error::invalid_param(format!("unknown coding format '{}'", s)).into()),
        }
    }
}
