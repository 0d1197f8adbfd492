//! End-to-end handling of one uploaded object.
//!
//! ```text
//! SourceReference ──admit──▶ skipped?  ──yes──▶ HandleOutcome::Skipped
//!                              │ no
//!                              ▼
//!                  storage.read(source_prefix + file name)
//!                              ▼
//!                  pipeline: transform every variant (parallel)
//!                              ▼
//!                  storage.write(each variant)      (parallel)
//!                              ▼
//!                  HandleOutcome::Written { confirmations }
//! ```
//!
//! The extension check runs before anything is downloaded. There are no
//! retries: a read, transform or write failure fails the whole object, and
//! redelivering the event is the caller's decision.

use crate::config::ThumbnailerConfig;
use crate::imaging::ImageTransform;
use crate::keys::{self, KeyError};
use crate::pipeline::{self, Admission, PipelineError};
use crate::plan::{PlanError, VariantPlan};
use crate::storage::{Storage, StorageError, WriteConfirmation};
use crate::types::SourceReference;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, info_span};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Invalid source key: {0}")]
    Key(#[from] KeyError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Everything the handler needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    pub source_prefix: String,
    pub destination_prefix: String,
    pub plan: VariantPlan,
}

impl HandlerSettings {
    /// Build settings from loaded config values.
    pub fn from_config(config: &ThumbnailerConfig) -> Result<Self, PlanError> {
        Ok(Self {
            source_prefix: config.storage.source_prefix.clone(),
            destination_prefix: config.storage.destination_prefix.clone(),
            plan: config.plan.to_plan()?,
        })
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            source_prefix: "original/".to_string(),
            destination_prefix: "thumbs/".to_string(),
            plan: VariantPlan::default(),
        }
    }
}

/// Terminal outcome for one source object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    Skipped { reason: String },
    /// One confirmation per variant, in plan order.
    Written { confirmations: Vec<WriteConfirmation> },
}

/// Read the source object, generate its variants and store them.
pub fn handle(
    storage: &impl Storage,
    backend: &impl ImageTransform,
    source: &SourceReference,
    settings: &HandlerSettings,
) -> Result<HandleOutcome, HandlerError> {
    let span = info_span!("handle", container = %source.container, key = %source.raw_key);
    let _enter = span.enter();

    let name = match pipeline::admit(&settings.plan, &source.raw_key)? {
        Admission::Accepted(name) => name,
        Admission::Rejected { reason } => {
            info!(%reason, "skipping object");
            return Ok(HandleOutcome::Skipped { reason });
        }
    };

    let source_key = keys::source_key(&settings.source_prefix, &name.file_name);
    let original = storage.read(&source.container, &source_key)?;
    info!(
        source_key = %source_key,
        size = original.bytes.len(),
        mime = %original.mime_type,
        "downloaded original"
    );

    let results = pipeline::generate_variants(
        backend,
        &name,
        &original.bytes,
        &original.mime_type,
        &settings.plan,
        &settings.destination_prefix,
    )
    .map_err(PipelineError::from)?;

    let confirmations = results
        .par_iter()
        .map(|result| {
            storage.write(
                &source.container,
                &result.destination_key,
                &result.bytes,
                &original.mime_type,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(variants = confirmations.len(), "stored variants");
    Ok(HandleOutcome::Written { confirmations })
}
