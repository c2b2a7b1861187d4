//! Frame-by-frame picture structure indexing.
//!
//! The indexer walks a clip's frame timings in order. Consecutive frames with
//! the same timing share one pattern regime; a new pattern is computed only
//! when the timing changes, and every frame takes the next code of the
//! current pattern.

use std::fmt;

use crate::converter::RateConverter;
use crate::error::Result;
use crate::pattern::CyclicPattern;
use crate::picstruct::{FieldMode, PicStruct, VideoCodingFormat};
use crate::timing::FrameTiming;
use tracing::info;
use transcode_core::Rational;

/// Description of a newly entered pattern regime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegimeSummary {
    /// Clip frame rate of the regime.
    pub clip_rate: Rational,
    /// Field mode of the regime.
    pub field_mode: FieldMode,
    /// Whether progressive repeats were preferred.
    pub prefer_progressive: bool,
    /// One cycle of the computed pattern.
    pub codes: Vec<PicStruct>,
}

impl fmt::Display for RegimeSummary {
    /// `TB TBT BT BTB, (24000/1001), TFF`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbreviated: Vec<String> = self.codes.iter().map(|c| c.abbreviation()).collect();
        write!(
            f,
            "{}, ({}/{}), {}",
            abbreviated.join(" "),
            self.clip_rate.num,
            self.clip_rate.den,
            self.field_mode
        )?;
        if self.prefer_progressive {
            f.write_str(", prefer_progressive")?;
        }
        Ok(())
    }
}

/// One line of the index: a frame and its picture structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PicStructRecord {
    /// 0-based frame number.
    pub frame: u64,
    /// Field mode of the frame.
    pub field_mode: FieldMode,
    /// Picture structure for the frame.
    pub pic_struct: PicStruct,
}

impl fmt::Display for PicStructRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.frame,
            self.field_mode.code(),
            self.pic_struct.value()
        )
    }
}

/// Result of indexing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Set on the first frame of a new regime.
    pub regime: Option<RegimeSummary>,
    /// The frame's record.
    pub record: PicStructRecord,
}

/// Assigns picture structures to frames in presentation order.
pub struct PicStructIndexer {
    converter: RateConverter,
    /// Required bitstream format, if any.
    format: Option<VideoCodingFormat>,
    /// Timing of the current regime.
    timing: Option<FrameTiming>,
    /// Pattern of the current regime.
    pattern: CyclicPattern,
    /// Next frame number.
    next_frame: u64,
    /// Regimes entered so far.
    regimes: u64,
}

impl PicStructIndexer {
    /// Create an indexer around a converter.
    pub fn new(converter: RateConverter) -> Self {
        Self {
            converter,
            format: None,
            timing: None,
            pattern: CyclicPattern::default(),
            next_frame: 0,
            regimes: 0,
        }
    }

    /// Reject patterns that `format` cannot signal.
    pub fn with_format(mut self, format: VideoCodingFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Get the converter.
    pub fn converter(&self) -> &RateConverter {
        &self.converter
    }

    /// Number of frames indexed so far.
    pub fn frames_indexed(&self) -> u64 {
        self.next_frame
    }

    /// Number of regimes entered so far.
    pub fn regime_count(&self) -> u64 {
        self.regimes
    }

    /// Pattern of the current regime.
    pub fn current_pattern(&self) -> Option<&CyclicPattern> {
        self.timing.map(|_| &self.pattern)
    }

    /// Index the next frame.
    ///
    /// On error nothing is consumed: the frame number does not advance and
    /// the previous regime stays current.
    pub fn push(&mut self, timing: FrameTiming) -> Result<IndexEntry> {
        let unchanged = self
            .timing
            .map_or(false, |current| current.same_regime(&timing));
        let regime = if unchanged {
            None
        } else {
            Some(self.enter_regime(timing)?)
        };

        let record = PicStructRecord {
            frame: self.next_frame,
            field_mode: timing.field_mode,
            pic_struct: self.pattern.advance(),
        };
        self.next_frame += 1;

        Ok(IndexEntry { regime, record })
    }

    fn enter_regime(&mut self, timing: FrameTiming) -> Result<RegimeSummary> {
        let clip_rate = timing.clip_rate().reduce();
        let pattern = self.converter.determine_pattern(
            clip_rate,
            timing.field_mode,
            timing.prefer_progressive,
        )?;
        if let Some(format) = self.format {
            pattern.check_format(format)?;
        }

        info!(
            frame = self.next_frame,
            clip = %clip_rate,
            mode = %timing.field_mode,
            pattern = %pattern.abbreviated(),
            "entering new pattern regime"
        );

        let summary = RegimeSummary {
            clip_rate,
            field_mode: timing.field_mode,
            prefer_progressive: timing.prefer_progressive,
            codes: pattern.codes().to_vec(),
        };
        self.timing = Some(timing);
        self.pattern = pattern;
        self.regimes += 1;
        Ok(summary)
    }
}
