//! Cyclic picture structure patterns.

use crate::error::{PicStructError, Result};
use crate::picstruct::{PicStruct, VideoCodingFormat};

/// A repeating sequence of picture structures with a cursor.
///
/// The cursor is advanced *before* each read, so the first call to
/// [`advance`](Self::advance) returns the element at index 1 (or the sole
/// element of a one-entry pattern). Index consumers written against this
/// ordering depend on it; do not "fix" it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicPattern {
    codes: Vec<PicStruct>,
    /// Index of the most recently returned code.
    position: usize,
}

impl CyclicPattern {
    /// Create a pattern. An empty sequence becomes a single progressive frame.
    pub fn new(codes: impl Into<Vec<PicStruct>>) -> Self {
        let mut codes = codes.into();
        if codes.is_empty() {
            codes.push(PicStruct::ProgressiveFrame);
        }
        Self { codes, position: 0 }
    }

    /// Move to the next position, wrapping at the end, and return its code.
    pub fn advance(&mut self) -> PicStruct {
        self.position = (self.position + 1) % self.codes.len();
        self.codes[self.position]
    }

    /// The codes of one full cycle.
    pub fn codes(&self) -> &[PicStruct] {
        &self.codes
    }

    /// Cycle length in output frames.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Always false; a pattern holds at least one code.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Return the cursor to its initial position.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Field periods displayed over one cycle.
    pub fn fields_per_cycle(&self) -> u32 {
        self.codes.iter().map(|c| c.field_duration()).sum()
    }

    /// Space-separated abbreviations, e.g. `TB TBT BT BTB`.
    pub fn abbreviated(&self) -> String {
        self.codes
            .iter()
            .map(|c| c.abbreviation())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fail if `format` cannot signal every code of the cycle.
    pub fn check_format(&self, format: VideoCodingFormat) -> Result<()> {
        match self.codes.iter().find(|c| !format.supports(**c)) {
            Some(&code) => Err(PicStructError::UnsupportedPicStruct { code, format }),
            None => Ok(()),
        }
    }
}

impl Default for CyclicPattern {
    fn default() -> Self {
        Self::new(vec![PicStruct::ProgressiveFrame])
    }
}

impl From<Option<Vec<PicStruct>>> for CyclicPattern {
    fn from(codes: Option<Vec<PicStruct>>) -> Self {
        codes.map(Self::new).unwrap_or_default()
    }
}

/// Endless iteration over [`advance`](CyclicPattern::advance).
impl Iterator for CyclicPattern {
    type Item = PicStruct;

    fn next(&mut self) -> Option<PicStruct> {
        Some(self.advance())
    }
}
