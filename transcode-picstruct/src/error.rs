//! Error types for picture structure pattern computation.

use crate::picstruct::{FieldMode, PicStruct, VideoCodingFormat};
use thiserror::Error;
use transcode_core::Rational;

/// Picture structure error types.
#[derive(Error, Debug)]
pub enum PicStructError {
    /// A rate or duration with a non-positive numerator or denominator.
    #[error("Invalid rate: {num}/{den}")]
    InvalidRate {
        /// Numerator as supplied.
        num: i64,
        /// Denominator as supplied.
        den: i64,
    },

    /// The clip runs faster than the container can display.
    #[error("Clip rate {clip} exceeds container rate {container}")]
    SourceFasterThanContainer {
        /// Container frame rate.
        container: Rational,
        /// Clip frame rate.
        clip: Rational,
    },

    /// The repeating cycle does not close within one second of container time.
    #[error("No pattern within one second: cycle of {cycle_length} frames at {container} fps")]
    NoPatternWithinOneSecond {
        /// Reduced denominator of the container/clip ratio.
        cycle_length: i64,
        /// Container frame rate.
        container: Rational,
    },

    /// The error diffusion asked for a repeat count no picture structure can express.
    #[error("No picture structure repeats {count} {}", repeat_unit(.progressive))]
    UnmappedRepeatCount {
        /// Requested repeat count.
        count: i64,
        /// Whether frames (true) or fields (false) were being repeated.
        progressive: bool,
    },

    /// Field mode code outside the defined modes.
    #[error("Invalid field mode: {0}")]
    InvalidFieldMode(i64),

    /// A progressive-only converter was asked for a field-based pattern.
    #[error("Field mode {requested} cannot be displayed by a {configured} converter")]
    IncompatibleFieldMode {
        /// Field mode the converter was configured with.
        configured: FieldMode,
        /// Field mode the clip asked for.
        requested: FieldMode,
    },

    /// The target bitstream format cannot signal this picture structure.
    #[error("{code} is not supported by {format}")]
    UnsupportedPicStruct {
        /// Offending picture structure.
        code: PicStruct,
        /// Target coding format.
        format: VideoCodingFormat,
    },

    /// Malformed line in a frame timing listing.
    #[error("Invalid timing at line {line}: {message}")]
    InvalidTiming {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// I/O error while reading timings or writing an index.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] transcode_core::Error),
}

fn repeat_unit(progressive: &bool) -> &'static str {
    if *progressive {
        "frames"
    } else {
        "fields"
    }
}

/// Result type for picture structure operations.
pub type Result<T> = std::result::Result<T, PicStructError>;

impl PicStructError {
    /// Create an invalid timing error.
    pub fn invalid_timing(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidTiming {
            line,
            message: message.into(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Only an unmapped repeat count can be absorbed, by falling back to a
    /// progressive pattern.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnmappedRepeatCount { .. })
    }
}
