//! Canned telecine and pulldown patterns.
//!
//! These are the well-known cycles for common film-to-video conversions,
//! written out by hand. [`RateConverter`](crate::RateConverter) derives the
//! same kind of cycle for arbitrary rates; the presets are useful to check
//! its output against, or to force a specific cadence.

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::pattern::CyclicPattern;
use crate::picstruct::PicStruct::{self, *};
use serde::{Deserialize, Serialize};
use transcode_core::Rational;

/// Telecine/pulldown pattern presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelecinePattern {
    /// 3:2 pulldown (23.976p -> 29.97i).
    /// Pattern: TB TBT BT BTB
    Pulldown32,
    /// 6:4 soft pulldown (23.976p -> 59.94p).
    /// Pattern: FD FT
    Pulldown64,
    /// Every frame shown twice (29.97p -> 59.94p).
    SoftDoubling,
    /// Every frame shown three times (19.98p -> 59.94p).
    SoftTripling,
    /// Euro pulldown (24p -> 25i), one 3-field frame every 12 frames.
    EuroPulldown,
    /// 2:2 pulldown (25p -> 25i, progressive segmented frame).
    Pulldown22,
}

impl TelecinePattern {
    /// All presets.
    pub const ALL: [TelecinePattern; 6] = [
        Self::Pulldown32,
        Self::Pulldown64,
        Self::SoftDoubling,
        Self::SoftTripling,
        Self::EuroPulldown,
        Self::Pulldown22,
    ];

    /// Get the source frame rate for this pattern.
    pub fn source_fps(&self) -> Rational {
        match self {
            Self::Pulldown32 | Self::Pulldown64 => Rational::new(24000, 1001),
            Self::SoftDoubling => Rational::new(30000, 1001),
            Self::SoftTripling => Rational::new(20000, 1001),
            Self::EuroPulldown => Rational::new(24, 1),
            Self::Pulldown22 => Rational::new(25, 1),
        }
    }

    /// Get the target (container) frame rate for this pattern.
    pub fn target_fps(&self) -> Rational {
        match self {
            Self::Pulldown32 => Rational::new(30000, 1001),
            Self::Pulldown64 | Self::SoftDoubling | Self::SoftTripling => {
                Rational::new(60000, 1001)
            }
            Self::EuroPulldown | Self::Pulldown22 => Rational::new(25, 1),
        }
    }

    /// Picture structures of one cycle.
    pub fn codes(&self) -> Vec<PicStruct> {
        match self {
            Self::Pulldown32 => vec![TopBottom, TopBottomTop, BottomTop, BottomTopBottom],
            Self::Pulldown64 => vec![FrameDoubling, FrameTripling],
            Self::SoftDoubling => vec![FrameDoubling],
            Self::SoftTripling => vec![FrameTripling],
            Self::EuroPulldown => {
                let mut codes = vec![TopBottom, TopBottomTop];
                codes.extend(std::iter::repeat(BottomTop).take(11));
                codes.push(BottomTopBottom);
                codes.extend(std::iter::repeat(TopBottom).take(10));
                codes
            }
            Self::Pulldown22 => vec![TopBottom],
        }
    }

    /// Get the pattern length in source frames.
    pub fn pattern_length(&self) -> usize {
        self.codes().len()
    }

    /// Whether the cycle repeats whole frames rather than fields.
    pub fn is_progressive(&self) -> bool {
        self.codes().iter().all(|c| c.is_progressive())
    }

    /// Build a fresh cyclic pattern for this preset.
    pub fn pattern(&self) -> CyclicPattern {
        CyclicPattern::new(self.codes())
    }

    /// Kebab-case preset name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pulldown32 => "pulldown-32",
            Self::Pulldown64 => "pulldown-64",
            Self::SoftDoubling => "soft-doubling",
            Self::SoftTripling => "soft-tripling",
            Self::EuroPulldown => "euro-pulldown",
            Self::Pulldown22 => "pulldown-22",
        }
    }
}

impl fmt::Display for TelecinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TelecinePattern {
    type Err = crate::error::PicStructError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                transcode_core::Error::invalid_param(format!("unknown telecine pattern '{}'", s))
                    .into()
            })
    }
}
