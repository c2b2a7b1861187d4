//! Per-frame timing metadata.
//!
//! Frame timing normally comes from a decoder's frame properties (duration
//! and field order). [`read_timings`] accepts the same data as plain text,
//! one frame per line:
//!
//! ```text
//! # dur_num dur_den field_mode [prefer_progressive]
//! 1001 24000 tff
//! 1001 30000 2 0
//! 1001 24000 p true
//! ```

use std::cmp::Ordering;
use std::io::BufRead;

use crate::converter::positive_rate;
use crate::error::{PicStructError, Result};
use crate::picstruct::FieldMode;
use transcode_core::Rational;

/// Timing of one source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    /// Frame duration in seconds.
    pub duration: Rational,
    /// Field mode of the frame.
    pub field_mode: FieldMode,
    /// Prefer whole-frame repeats when the frame is progressive.
    pub prefer_progressive: bool,
}

impl FrameTiming {
    /// Create a frame timing from a duration fraction.
    pub fn new(duration_num: i64, duration_den: i64, field_mode: FieldMode) -> Result<Self> {
        Ok(Self {
            duration: positive_rate(duration_num, duration_den)?,
            field_mode,
            prefer_progressive: false,
        })
    }

    /// Set the prefer-progressive flag.
    pub fn with_prefer_progressive(mut self, prefer: bool) -> Self {
        self.prefer_progressive = prefer;
        self
    }

    /// Frame rate implied by the duration.
    pub fn clip_rate(&self) -> Rational {
        self.duration.recip()
    }

    /// Whether two frames belong to the same pattern regime.
    ///
    /// Durations compare by value, so `2/50` and `1/25` are one regime.
    pub fn same_regime(&self, other: &FrameTiming) -> bool {
        self.field_mode == other.field_mode
            && self.prefer_progressive == other.prefer_progressive
            && self.duration.cmp(&other.duration) == Ordering::Equal
    }
}

/// Parse one timing line. Blank lines and `#` comments yield `None`.
pub fn parse_timing_line(line_no: usize, line: &str) -> Result<Option<FrameTiming>> {
    let content = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    }
    .trim();
    if content.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = content.split_whitespace().collect();
    if !(3..=4).contains(&fields.len()) {
        return Err(PicStructError::invalid_timing(
            line_no,
            format!("expected 3 or 4 columns, found {}", fields.len()),
        ));
    }

    let parse_int = |value: &str, what: &str| -> Result<i64> {
        value
            .parse::<i64>()
            .map_err(|_| PicStructError::invalid_timing(line_no, format!("bad {} '{}'", what, value)))
    };
    let num = parse_int(fields[0], "duration numerator")?;
    let den = parse_int(fields[1], "duration denominator")?;
    let field_mode: FieldMode = fields[2].parse().map_err(|err| match err {
        invalid @ PicStructError::InvalidFieldMode(_) => invalid,
        _ => PicStructError::invalid_timing(line_no, format!("bad field mode '{}'", fields[2])),
    })?;
    let prefer = match fields.get(3).map(|s| s.to_ascii_lowercase()) {
        None => false,
        Some(flag) => match flag.as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                return Err(PicStructError::invalid_timing(
                    line_no,
                    format!("bad prefer_progressive flag '{}'", flag),
                ))
            }
        },
    };

    FrameTiming::new(num, den, field_mode)
        .map(|t| Some(t.with_prefer_progressive(prefer)))
}

/// Read a frame timing listing.
pub fn read_timings<R: BufRead>(reader: R) -> Result<Vec<FrameTiming>> {
    let mut timings = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(timing) = parse_timing_line(i + 1, &line?)? {
            timings.push(timing);
        }
    }
    Ok(timings)
}
