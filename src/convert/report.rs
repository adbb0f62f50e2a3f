//! Per-split conversion reports.
//!
//! Recoverable gaps never abort a run; they are recorded here with stable
//! codes and surfaced in the end-of-run summary, so a batch invocation can
//! still exit zero while telling the user exactly what was skipped.

use std::fmt;

/// Counts and gap records for one split's conversion.
#[derive(Clone, Debug, Default)]
pub struct SplitReport {
    /// Split name this report covers.
    pub split: String,
    /// Images emitted into the document.
    pub images_processed: usize,
    /// Base-names with no matching image file on disk.
    pub images_skipped: usize,
    /// Annotations emitted into the document.
    pub annotations_kept: usize,
    /// Rows dropped: unknown label, malformed row, or degenerate box.
    pub annotations_dropped: usize,
    /// One record per recoverable gap, in encounter order.
    pub gaps: Vec<Gap>,
}

impl SplitReport {
    pub fn new(split: impl Into<String>) -> Self {
        Self {
            split: split.into(),
            ..Default::default()
        }
    }

    /// Records a gap and bumps the counter its code maps to.
    pub fn record(&mut self, code: GapCode, message: impl Into<String>) {
        match code {
            GapCode::ImageFileMissing => self.images_skipped += 1,
            GapCode::UnknownLabel | GapCode::MalformedRow | GapCode::DegenerateBox => {
                self.annotations_dropped += 1;
            }
            GapCode::CsvFileMissing => {}
        }
        self.gaps.push(Gap {
            code,
            message: message.into(),
        });
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} image(s) ({} skipped), {} annotation(s) ({} dropped)",
            self.images_processed,
            self.images_skipped,
            self.annotations_kept,
            self.annotations_dropped
        )?;

        for gap in &self.gaps {
            write!(f, "\n  [{}] {}", gap.code.as_str(), gap.message)?;
        }

        Ok(())
    }
}

/// A single recoverable gap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gap {
    pub code: GapCode,
    pub message: String,
}

/// Stable codes for recoverable gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GapCode {
    /// No image file found for a listed base-name in any supported extension.
    ImageFileMissing,
    /// No per-image CSV; the image is still emitted with zero annotations.
    CsvFileMissing,
    /// A row's label resolved to nothing in the label map.
    UnknownLabel,
    /// A row failed to parse.
    MalformedRow,
    /// A row's box had a non-positive or non-finite size.
    DegenerateBox,
}

impl GapCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapCode::ImageFileMissing => "image-file-missing",
            GapCode::CsvFileMissing => "csv-file-missing",
            GapCode::UnknownLabel => "unknown-label",
            GapCode::MalformedRow => "malformed-row",
            GapCode::DegenerateBox => "degenerate-box",
        }
    }
}
