//! # Transcode Picture Structure
//!
//! Pulldown and telecine timing metadata for the Transcode project.
//!
//! A stream muxed at a fixed container rate often carries clips at lower
//! rates. Rather than duplicating pixels, the encoder signals how each coded
//! frame is displayed: as a progressive frame, as two or three fields, or
//! repeated two or three times. This crate computes those picture structure
//! codes:
//!
//! - **Rate conversion**: exact rational subdivision of the container/clip
//!   ratio into a repeating cycle of picture structures
//! - **Field parity balancing**: optional rewriting of field-based cycles so
//!   3-field structures pair off before progressive frames
//! - **Telecine presets**: hand-written 3:2, 6:4, 2:2 and Euro pulldown cycles
//! - **Indexing**: frame-by-frame assignment with regime change detection,
//!   written out as a picstruct v1 text file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use transcode_picstruct::{FieldMode, RateConverter, TimingConfig};
//! use transcode_core::Rational;
//!
//! let converter = RateConverter::new(TimingConfig::new(
//!     Rational::new(30000, 1001),
//!     FieldMode::TopFieldFirst,
//! ))?;
//!
//! let mut pattern = converter.determine_pattern(
//!     Rational::new(24000, 1001),
//!     FieldMode::TopFieldFirst,
//!     false,
//! )?;
//!
//! // One code per output frame, until the clip timing changes.
//! for frame in frames {
//!     encoder.set_pic_struct(pattern.advance());
//! }
//! ```
//!
//! ## Indexing
//!
//! ```rust,ignore
//! use transcode_picstruct::{read_timings, write_index, PicStructIndexer};
//!
//! let timings = read_timings(BufReader::new(File::open("timings.txt")?))?;
//! let mut indexer = PicStructIndexer::new(converter);
//! write_index(&mut indexer, timings, File::create("clip.picstruct")?)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod balance;
pub mod converter;
pub mod error;
pub mod index;
pub mod pattern;
pub mod picstruct;
pub mod telecine;
pub mod timing;
pub mod writer;

// Re-export main types
pub use balance::balance_field_pattern;
pub use converter::{positive_rate, RateConverter, TimingConfig};
pub use error::{PicStructError, Result};
pub use index::{IndexEntry, PicStructIndexer, PicStructRecord, RegimeSummary};
pub use pattern::CyclicPattern;
pub use picstruct::{Field, FieldMode, PicStruct, VideoCodingFormat};
pub use telecine::TelecinePattern;
pub use timing::{parse_timing_line, read_timings, FrameTiming};
pub use writer::{write_index, PicStructWriter};

use transcode_core::Rational;

/// Convenience function to compute a pattern for a clip in a container.
///
/// The clip is assumed to share the container's field mode.
pub fn determine_pattern(
    container_rate: Rational,
    clip_rate: Rational,
    field_mode: FieldMode,
) -> Result<CyclicPattern> {
    RateConverter::new(TimingConfig::new(container_rate, field_mode))?
        .determine_pattern(clip_rate, field_mode, false)
}
