//! Parameter types for image operations.
//!
//! - [`Quality`]: lossy encoding quality (0-100, default 60), clamped on construction.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (0-100).
///
/// The meaning is codec-defined. Formats without a quality axis (PNG) ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 0);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn deserialized_quality_is_clamped() {
        let q: Quality = serde_json::from_str("150").unwrap();
        assert_eq!(q.value(), 100);
        assert_eq!(serde_json::to_string(&Quality::new(85)).unwrap(), "85");
    }

    #[test]
    fn quality_default_is_60() {
        assert_eq!(Quality::default().value(), 60);
    }
}
