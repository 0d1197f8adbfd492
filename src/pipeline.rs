//! Variant generation for a single source image.
//!
//! Given the source bytes and a [`VariantPlan`], produce every variant and
//! the key it belongs under. No storage is touched here; reading the source
//! and writing the variants is the [`handler`](crate::handler)'s job.
//!
//! ## Outcomes
//!
//! ```text
//! extension missing / not allowed  →  Outcome::Skipped { reason }
//! every transform succeeded        →  Outcome::Produced { results }   (plan order)
//! any transform failed             →  Err(PipelineError::Transform)   (nothing returned)
//! ```
//!
//! ## Parallel Processing
//!
//! Variants are independent, so they are transformed in parallel on the
//! [rayon](https://docs.rs/rayon) pool. Collecting into a `Result` waits for
//! all of them and surfaces a failure instead of a partial result set.

use crate::imaging::{ImageTransform, TransformError};
use crate::keys::{self, DecodedFileName, KeyError};
use crate::plan::VariantPlan;
use crate::types::{SourceReference, VariantResult};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid source key: {0}")]
    Key(#[from] KeyError),
    #[error("Image processing failed: {0}")]
    Transform(#[from] TransformError),
}

/// Result of running the pipeline on one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The source was not an accepted image; nothing was produced.
    Skipped { reason: String },
    /// Every variant in the plan, in plan order.
    Produced { results: Vec<VariantResult> },
}

/// Whether a source key passes the extension check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted(DecodedFileName),
    Rejected { reason: String },
}

/// Decode `raw_key` and check its extension against the plan.
///
/// A key without an extension, or with one the plan does not list, is
/// rejected with a human-readable reason. Only undecodable percent-encoding
/// is an error.
pub fn admit(plan: &VariantPlan, raw_key: &str) -> Result<Admission, KeyError> {
    match keys::decode_file_name(raw_key) {
        Ok(name) if plan.allows(&name.extension) => Ok(Admission::Accepted(name)),
        Ok(name) => Ok(Admission::Rejected {
            reason: format!(
                "Image not processed due to .{} file extension",
                name.extension
            ),
        }),
        Err(KeyError::InvalidKeyFormat(_)) => Ok(Admission::Rejected {
            reason: "Image not processed due to missing file extension".to_string(),
        }),
        Err(e) => Err(e),
    }
}

/// Produce every variant of `source_bytes` described by `plan`.
///
/// [`handler::handle`](crate::handler::handle) runs the same two steps
/// separately so it can skip before downloading the source.
pub fn process(
    backend: &impl ImageTransform,
    source: &SourceReference,
    source_bytes: &[u8],
    source_mime: &str,
    plan: &VariantPlan,
    destination_prefix: &str,
) -> Result<Outcome, PipelineError> {
    let name = match admit(plan, &source.raw_key)? {
        Admission::Accepted(name) => name,
        Admission::Rejected { reason } => return Ok(Outcome::Skipped { reason }),
    };

    let results = generate_variants(
        backend,
        &name,
        source_bytes,
        source_mime,
        plan,
        destination_prefix,
    )?;
    Ok(Outcome::Produced { results })
}

/// Transform an already-admitted source into every planned variant.
pub(crate) fn generate_variants(
    backend: &impl ImageTransform,
    name: &DecodedFileName,
    source_bytes: &[u8],
    source_mime: &str,
    plan: &VariantPlan,
    destination_prefix: &str,
) -> Result<Vec<VariantResult>, TransformError> {
    plan.variants()
        .par_iter()
        .map(|spec| -> Result<VariantResult, TransformError> {
            let width = spec.target_width();
            let destination_key =
                keys::destination_key(destination_prefix, &name.base_name, width, &name.extension);
            debug!(key = %destination_key, size = %spec.size, "transforming variant");
            let bytes = backend.transform(source_bytes, source_mime, width, spec.quality)?;
            Ok(VariantResult {
                destination_key,
                bytes,
            })
        })
        .collect()
}
