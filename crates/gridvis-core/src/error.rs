//! Error types for parsing settings values.

use thiserror::Error;

/// A textual value did not name any known variant.
///
/// Returned by the `FromStr` impls of [`crate::Scaling`], [`crate::Theme`]
/// and [`crate::StyleFlag`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    /// Kind of value being parsed (e.g. "scaling")
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_display() {
        let err = UnknownVariant::new("theme", "sepia");
        assert_eq!(err.to_string(), "unknown theme 'sepia'");
    }
}
