//! CLI output formatting.
//!
//! One block per handled object: the source key as the header, then one
//! indented line per written variant, or the skip reason.
//!
//! ```text
//! photos/original/vacation.png
//!     thumbs/vacation_original.png → file:///srv/storage/photos/thumbs/vacation_original.png (48213 bytes)
//!     thumbs/vacation_thumb_420.png → file:///srv/storage/photos/thumbs/vacation_thumb_420.png (9120 bytes)
//! photos/original/notes.txt
//!     skipped: Image not processed due to .txt file extension
//! ```
//!
//! Format functions are pure and return `Vec<String>`; `print_*` wrappers
//! write to stdout.

use crate::handler::{HandleOutcome, HandlerError};
use crate::types::SourceReference;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn header(source: &SourceReference) -> String {
    format!("{}/{}", source.container, source.raw_key)
}

/// Format the outcome of handling one object.
pub fn format_outcome(source: &SourceReference, outcome: &HandleOutcome) -> Vec<String> {
    let mut lines = vec![header(source)];
    match outcome {
        HandleOutcome::Skipped { reason } => {
            lines.push(format!("{}skipped: {}", indent(1), reason));
        }
        HandleOutcome::Written { confirmations } if confirmations.is_empty() => {
            lines.push(format!("{}no variants configured", indent(1)));
        }
        HandleOutcome::Written { confirmations } => {
            for c in confirmations {
                lines.push(format!(
                    "{}{} → {} ({} bytes)",
                    indent(1),
                    c.key,
                    c.location,
                    c.size
                ));
            }
        }
    }
    lines
}

/// Format a failure to handle one object.
pub fn format_failure(source: &SourceReference, error: &HandlerError) -> Vec<String> {
    vec![header(source), format!("{}failed: {}", indent(1), error)]
}

pub fn print_outcome(source: &SourceReference, outcome: &HandleOutcome) {
    for line in format_outcome(source, outcome) {
        println!("{}", line);
    }
}

pub fn print_failure(source: &SourceReference, error: &HandlerError) {
    for line in format_failure(source, error) {
        eprintln!("{}", line);
    }
}
