//! Picstruct v1 index writer.
//!
//! ```text
//! # picstruct format v1
//!
//! # format: frame_id frame_field_order pic_struct
//!
//! #TB TBT BT BTB, (24000/1001), TFF
//! 0 2 5
//! 1 2 4
//! ```

use std::io::Write;

use crate::error::Result;
use crate::index::{IndexEntry, PicStructIndexer};
use crate::timing::FrameTiming;
use tracing::debug;

/// First line of every picstruct v1 file.
pub const FORMAT_MARKER: &str = "# picstruct format v1";

/// Column description line.
pub const COLUMN_COMMENT: &str = "# format: frame_id frame_field_order pic_struct";

/// Writes index entries as picstruct v1 text.
pub struct PicStructWriter<W: Write> {
    out: W,
    header_written: bool,
    records: u64,
}

impl<W: Write> PicStructWriter<W> {
    /// Wrap an output stream.
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
            records: 0,
        }
    }

    /// Write the file header. Called implicitly by the first entry.
    pub fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "{}", FORMAT_MARKER)?;
            writeln!(self.out)?;
            writeln!(self.out, "{}", COLUMN_COMMENT)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Write one entry, preceded by its regime comment if it opens one.
    pub fn write_entry(&mut self, entry: &IndexEntry) -> Result<()> {
        self.write_header()?;
        if let Some(regime) = &entry.regime {
            writeln!(self.out)?;
            writeln!(self.out, "#{}", regime)?;
        }
        writeln!(self.out, "{}", entry.record)?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Flush and return the underlying stream.
    pub fn into_inner(mut self) -> Result<W> {
        self.write_header()?;
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Index every timing and write the result to `out`.
///
/// Stops at the first error; records already written stay in `out`.
pub fn write_index<W, I>(indexer: &mut PicStructIndexer, timings: I, out: W) -> Result<W>
where
    W: Write,
    I: IntoIterator<Item = FrameTiming>,
{
    let mut writer = PicStructWriter::new(out);
    writer.write_header()?;
    for timing in timings {
        let entry = indexer.push(timing)?;
        writer.write_entry(&entry)?;
    }
    debug!(
        records = writer.records_written(),
        regimes = indexer.regime_count(),
        "picstruct index written"
    );
    writer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{RateConverter, TimingConfig};
    use crate::error::PicStructError;
    use crate::picstruct::FieldMode;
    use std::io::{BufWriter, Read, Seek, SeekFrom};
    use transcode_core::Rational;

    fn ntsc_indexer() -> PicStructIndexer {
        PicStructIndexer::new(
            RateConverter::new(TimingConfig::new(
                Rational::new(30000, 1001),
                FieldMode::TopFieldFirst,
            ))
            .unwrap(),
        )
    }

    fn film(n: usize) -> Vec<FrameTiming> {
        vec![FrameTiming::new(1001, 24000, FieldMode::TopFieldFirst).unwrap(); n]
    }

    #[test]
    fn test_header_only() {
        let out = PicStructWriter::new(Vec::new()).into_inner().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# picstruct format v1\n\n# format: frame_id frame_field_order pic_struct\n"
        );
    }

    #[test]
    fn test_film_index() {
        let mut indexer = ntsc_indexer();
        let out = write_index(&mut indexer, film(5), Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "\
# picstruct format v1

# format: frame_id frame_field_order pic_struct

#TB TBT BT BTB, (24000/1001), TFF
0 2 5
1 2 4
2 2 6
3 2 3
4 2 5
";
        assert_eq!(text, expected);
        assert_eq!(indexer.frames_indexed(), 5);
    }

    #[test]
    fn test_regime_comment_per_change() {
        let mut indexer = ntsc_indexer();
        let mut timings = film(2);
        timings.push(FrameTiming::new(1001, 30000, FieldMode::TopFieldFirst).unwrap());
        timings.push(
            FrameTiming::new(1001, 24000, FieldMode::Progressive)
                .unwrap()
                .with_prefer_progressive(true),
        );
        let out = write_index(&mut indexer, timings, Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let comments: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with('#'))
            .skip(2)
            .collect();
        assert_eq!(
            comments,
            vec![
                "#TB TBT BT BTB, (24000/1001), TFF",
                "#TB, (30000/1001), TFF",
                "#PF FD PF PF, (24000/1001), P, prefer_progressive",
            ]
        );
        assert!(text.ends_with("\n3 0 7\n"));
    }

    #[test]
    fn test_error_keeps_written_records() {
        let mut indexer = ntsc_indexer();
        let mut timings = film(2);
        timings.push(FrameTiming::new(1, 60, FieldMode::TopFieldFirst).unwrap());

        let mut writer = PicStructWriter::new(Vec::new());
        let mut failure = None;
        for timing in timings {
            match indexer.push(timing) {
                Ok(entry) => writer.write_entry(&entry).unwrap(),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        assert!(matches!(
            failure,
            Some(PicStructError::SourceFasterThanContainer { .. })
        ));
        assert_eq!(writer.records_written(), 2);
    }

    #[test]
    fn test_write_to_file() {
        let mut file = tempfile::tempfile().unwrap();
        let mut indexer = ntsc_indexer();
        {
            let out = BufWriter::new(&mut file);
            write_index(&mut indexer, film(3), out).unwrap();
        }

        file.seek(SeekFrom::Start(0)).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        assert!(text.starts_with(FORMAT_MARKER));
        assert_eq!(text.lines().filter(|l| !l.starts_with('#') && !l.is_empty()).count(), 3);
    }
}
