//! CLI output for completed picks.
//!
//! # Output Format
//!
//! ## Delivered
//!
//! ```text
//! pick-multiple: 2 pictures
//! 001 dawn (1024x768, 183402 bytes)
//!     Saved: picked/dawn.jpg
//! 002 mountains (768x1024, 201877 bytes)
//!     Saved: picked/mountains.jpg
//! ```
//!
//! ## Cancelled
//!
//! ```text
//! pick-single: cancelled
//!     Cause: could not process 1 item
//!     broken.jpg: decode error: ...
//! ```
//!
//! With `--json` the same information is printed as a [`PickReport`].
//!
//! # Architecture
//!
//! [`format_report`] is pure and returns `Vec<String>` for testability;
//! [`print_report`] writes to stdout. [`save_images`] is the only function
//! here that touches the filesystem.

use crate::request::{CancelCause, ImageResult, PickKind, PickOutcome, PickedImage};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Report model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickStatus {
    Delivered,
    Cancelled,
}

/// One picture written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub path: PathBuf,
}

/// Everything the CLI reports about one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickReport {
    pub kind: String,
    pub status: PickStatus,
    pub images: Vec<SavedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl PickReport {
    pub fn delivered(kind: PickKind, images: Vec<SavedImage>) -> Self {
        Self {
            kind: kind.to_string(),
            status: PickStatus::Delivered,
            images,
            cause: None,
            failures: Vec::new(),
        }
    }

    pub fn cancelled(kind: PickKind, cause: &CancelCause) -> Self {
        let failures = match cause {
            CancelCause::ProcessingFailed(items) => items
                .iter()
                .map(|f| format!("{}: {}", f.item, f.reason))
                .collect(),
            _ => Vec::new(),
        };
        Self {
            kind: kind.to_string(),
            status: PickStatus::Cancelled,
            images: Vec::new(),
            cause: Some(describe_cause(cause)),
            failures,
        }
    }
}

/// Human-readable summary of why a request was cancelled.
pub fn describe_cause(cause: &CancelCause) -> String {
    match cause {
        CancelCause::NoSelection => "nothing selected".to_string(),
        CancelCause::ProcessingFailed(items) if items.len() == 1 => {
            "could not process 1 item".to_string()
        }
        CancelCause::ProcessingFailed(items) => {
            format!("could not process {} items", items.len())
        }
        CancelCause::PlatformFailed(reason) => format!("picker failed: {reason}"),
    }
}

// ============================================================================
// Saving
// ============================================================================

/// File name for `name` that is not yet in `taken`.
///
/// Empty names become `picture`; repeats get `-2`, `-3`, ... appended.
/// Separators decoded out of a URI are replaced so the file stays in `out_dir`.
fn unique_file_name(name: &str, taken: &mut HashSet<String>) -> String {
    let cleaned = name.replace(['/', '\\'], "_");
    let stem = match cleaned.as_str() {
        "" | "." | ".." => "picture",
        other => other,
    };
    let mut candidate = format!("{stem}.jpg");
    let mut n = 2;
    while !taken.insert(candidate.to_lowercase()) {
        candidate = format!("{stem}-{n}.jpg");
        n += 1;
    }
    candidate
}

/// Write each picture to `out_dir` as `<display-name>.jpg`.
pub fn save_images(images: ImageResult, out_dir: &Path) -> std::io::Result<Vec<SavedImage>> {
    std::fs::create_dir_all(out_dir)?;
    let mut taken = HashSet::new();
    let mut saved = Vec::with_capacity(images.len());
    for image in images {
        let path = out_dir.join(unique_file_name(&image.name, &mut taken));
        let PickedImage {
            name,
            stream,
            width,
            height,
        } = image;
        let data = stream.into_inner();
        std::fs::write(&path, &data)?;
        saved.push(SavedImage {
            name,
            width,
            height,
            bytes: data.len(),
            path,
        });
    }
    Ok(saved)
}

/// Turn the outcome of a request into a report, saving delivered pictures.
pub fn report_outcome(
    kind: PickKind,
    outcome: PickOutcome,
    out_dir: &Path,
) -> std::io::Result<PickReport> {
    match outcome {
        PickOutcome::Available(images) => {
            Ok(PickReport::delivered(kind, save_images(images, out_dir)?))
        }
        PickOutcome::Cancelled(cause) => Ok(PickReport::cancelled(kind, &cause)),
    }
}

// ============================================================================
// Display
// ============================================================================

fn picture_count(n: usize) -> String {
    match n {
        1 => "1 picture".to_string(),
        n => format!("{n} pictures"),
    }
}

/// Format a report as text lines.
pub fn format_report(report: &PickReport) -> Vec<String> {
    let mut lines = Vec::new();
    match report.status {
        PickStatus::Delivered => {
            lines.push(format!(
                "{}: {}",
                report.kind,
                picture_count(report.images.len())
            ));
            for (i, image) in report.images.iter().enumerate() {
                lines.push(format!(
                    "{} {} ({}x{}, {} bytes)",
                    format_index(i + 1),
                    image.name,
                    image.width,
                    image.height,
                    image.bytes
                ));
                lines.push(format!("{}Saved: {}", indent(1), image.path.display()));
            }
        }
        PickStatus::Cancelled => {
            lines.push(format!("{}: cancelled", report.kind));
            if let Some(cause) = &report.cause {
                lines.push(format!("{}Cause: {cause}", indent(1)));
            }
            for failure in &report.failures {
                lines.push(format!("{}{failure}", indent(1)));
            }
        }
    }
    lines
}

pub fn print_report(report: &PickReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

/// Print the report as pretty JSON.
pub fn print_report_json(report: &PickReport) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
