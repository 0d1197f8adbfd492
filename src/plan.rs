//! Which variants to produce for each accepted image.
//!
//! A [`VariantPlan`] is an ordered list of [`VariantSpec`] plus the extensions
//! that are accepted at all. The stock plan republishes the original at
//! quality 60 and produces three downscaled widths:
//!
//! ```text
//! original  → thumbs/<name>_original.<ext>
//! 1200px    → thumbs/<name>_thumb_1200.<ext>
//! 640px     → thumbs/<name>_thumb_640.<ext>
//! 420px     → thumbs/<name>_thumb_420.<ext>
//! ```
//!
//! Sizes must be pairwise distinct: two entries with the same size would be
//! written to the same destination key.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("variant size listed more than once: {0}")]
    DuplicateSize(VariantSize),
    #[error("variant width must be greater than zero")]
    ZeroWidth,
    #[error("invalid variant size {0:?}: expected \"original\" or a pixel width")]
    UnknownSize(String),
}

/// Keyword used for the original-size variant in config files.
const ORIGINAL_KEYWORD: &str = "original";

/// Target size of one variant.
///
/// In TOML this is either the string `"original"` or a pixel width:
/// `sizes = ["original", 1200, 640, 420]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SizeSetting", into = "SizeSetting")]
pub enum VariantSize {
    /// Keep the source dimensions, only re-encode.
    Original,
    /// Resize to this width, height following the aspect ratio.
    Width(u32),
}

impl VariantSize {
    pub fn target_width(self) -> Option<u32> {
        match self {
            VariantSize::Original => None,
            VariantSize::Width(w) => Some(w),
        }
    }
}

impl fmt::Display for VariantSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantSize::Original => f.write_str(ORIGINAL_KEYWORD),
            VariantSize::Width(w) => write!(f, "{w}px"),
        }
    }
}

/// Wire form of [`VariantSize`] in config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SizeSetting {
    Width(u32),
    Keyword(String),
}

impl TryFrom<SizeSetting> for VariantSize {
    type Error = PlanError;

    fn try_from(setting: SizeSetting) -> Result<Self, Self::Error> {
        match setting {
            SizeSetting::Width(0) => Err(PlanError::ZeroWidth),
            SizeSetting::Width(w) => Ok(VariantSize::Width(w)),
            SizeSetting::Keyword(k) if k == ORIGINAL_KEYWORD => Ok(VariantSize::Original),
            SizeSetting::Keyword(k) => Err(PlanError::UnknownSize(k)),
        }
    }
}

impl From<VariantSize> for SizeSetting {
    fn from(size: VariantSize) -> Self {
        match size {
            VariantSize::Original => SizeSetting::Keyword(ORIGINAL_KEYWORD.to_string()),
            VariantSize::Width(w) => SizeSetting::Width(w),
        }
    }
}

/// One variant to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub size: VariantSize,
    pub quality: Quality,
}

impl VariantSpec {
    pub fn target_width(&self) -> Option<u32> {
        self.size.target_width()
    }
}

/// Ordered variants plus the accepted source extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPlan {
    variants: Vec<VariantSpec>,
    extensions: Vec<String>,
}

impl VariantPlan {
    /// Build a plan applying one quality to every size.
    ///
    /// Rejects zero widths and repeated sizes. An empty size list is allowed
    /// and produces no variants.
    pub fn new(
        sizes: &[VariantSize],
        quality: Quality,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, PlanError> {
        let mut seen = HashSet::new();
        for size in sizes {
            if *size == VariantSize::Width(0) {
                return Err(PlanError::ZeroWidth);
            }
            if !seen.insert(*size) {
                return Err(PlanError::DuplicateSize(*size));
            }
        }

        Ok(Self {
            variants: sizes
                .iter()
                .map(|&size| VariantSpec { size, quality })
                .collect(),
            extensions: extensions.into_iter().map(Into::into).collect(),
        })
    }

    pub fn variants(&self) -> &[VariantSpec] {
        &self.variants
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Case-sensitive allow-list check: `jpg` is accepted, `JPG` is not.
    pub fn allows(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }
}

/// Stock sizes: the re-encoded original followed by descending widths.
pub fn default_sizes() -> Vec<VariantSize> {
    vec![
        VariantSize::Original,
        VariantSize::Width(1200),
        VariantSize::Width(640),
        VariantSize::Width(420),
    ]
}

/// Stock accepted extensions.
pub fn default_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
}

impl Default for VariantPlan {
    fn default() -> Self {
        Self {
            variants: default_sizes()
                .into_iter()
                .map(|size| VariantSpec {
                    size,
                    quality: Quality::default(),
                })
                .collect(),
            extensions: default_extensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_matches_stock_policy() {
        let plan = VariantPlan::default();
        let widths: Vec<Option<u32>> = plan.variants().iter().map(|v| v.target_width()).collect();
        assert_eq!(widths, vec![None, Some(1200), Some(640), Some(420)]);
        assert!(plan.variants().iter().all(|v| v.quality.value() == 60));
        assert_eq!(plan.extensions(), &["jpg", "jpeg", "png"]);
    }

    #[test]
    fn allows_is_case_sensitive() {
        let plan = VariantPlan::default();
        assert!(plan.allows("jpg"));
        assert!(plan.allows("png"));
        assert!(!plan.allows("JPG"));
        assert!(!plan.allows("gif"));
        assert!(!plan.allows(""));
    }

    #[test]
    fn new_preserves_order_and_quality() {
        let plan = VariantPlan::new(
            &[VariantSize::Width(420), VariantSize::Original],
            Quality::new(80),
            ["png"],
        )
        .unwrap();
        assert_eq!(
            plan.variants(),
            &[
                VariantSpec {
                    size: VariantSize::Width(420),
                    quality: Quality::new(80)
                },
                VariantSpec {
                    size: VariantSize::Original,
                    quality: Quality::new(80)
                },
            ]
        );
    }

    #[test]
    fn empty_plan_is_valid() {
        let plan = VariantPlan::new(&[], Quality::default(), ["jpg"]).unwrap();
        assert!(plan.variants().is_empty());
    }

    #[test]
    fn duplicate_width_rejected() {
        let err = VariantPlan::new(
            &[VariantSize::Width(640), VariantSize::Width(640)],
            Quality::default(),
            ["jpg"],
        )
        .unwrap_err();
        assert_eq!(err, PlanError::DuplicateSize(VariantSize::Width(640)));
    }

    #[test]
    fn duplicate_original_rejected() {
        let err = VariantPlan::new(
            &[VariantSize::Original, VariantSize::Original],
            Quality::default(),
            ["jpg"],
        )
        .unwrap_err();
        assert_eq!(err, PlanError::DuplicateSize(VariantSize::Original));
    }

    #[test]
    fn zero_width_rejected() {
        let err = VariantPlan::new(&[VariantSize::Width(0)], Quality::default(), ["jpg"])
            .unwrap_err();
        assert_eq!(err, PlanError::ZeroWidth);
    }

    // =========================================================================
    // Config representation
    // =========================================================================

    #[derive(Debug, Deserialize, Serialize)]
    struct Sizes {
        sizes: Vec<VariantSize>,
    }

    #[test]
    fn sizes_parse_from_mixed_toml_array() {
        let parsed: Sizes = toml::from_str(r#"sizes = ["original", 1200, 420]"#).unwrap();
        assert_eq!(
            parsed.sizes,
            vec![
                VariantSize::Original,
                VariantSize::Width(1200),
                VariantSize::Width(420)
            ]
        );
    }

    #[test]
    fn unknown_size_keyword_rejected() {
        assert!(toml::from_str::<Sizes>(r#"sizes = ["thumb"]"#).is_err());
    }

    #[test]
    fn zero_size_rejected_in_toml() {
        assert!(toml::from_str::<Sizes>("sizes = [0]").is_err());
    }

    #[test]
    fn sizes_serialize_back_to_keyword_and_numbers() {
        let text = toml::to_string(&Sizes {
            sizes: default_sizes(),
        })
        .unwrap();
        let reparsed: Sizes = toml::from_str(&text).unwrap();
        assert_eq!(reparsed.sizes, default_sizes());
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(VariantSize::Original.to_string(), "original");
        assert_eq!(VariantSize::Width(640).to_string(), "640px");
    }
}
