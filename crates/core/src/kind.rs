use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three ways Lean 4 lets you introduce a new type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// Data type built from (possibly recursive) constructors.
    Inductive,
    /// Single-constructor record of named fields.
    Structure,
    /// Record used as an ad-hoc polymorphic interface.
    Class,
}

/// Raised when a tag is not one of `inductive`, `structure`, `class`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid declaration kind (expected inductive, structure or class)")]
pub struct ParseKindError(pub String);

impl DeclarationKind {
    pub const ALL: [DeclarationKind; 3] = [
        DeclarationKind::Inductive,
        DeclarationKind::Structure,
        DeclarationKind::Class,
    ];

    /// Lean keyword for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Inductive => "inductive",
            DeclarationKind::Structure => "structure",
            DeclarationKind::Class => "class",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclarationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inductive" => Ok(DeclarationKind::Inductive),
            "structure" => Ok(DeclarationKind::Structure),
            "class" => Ok(DeclarationKind::Class),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_tags() {
        for kind in DeclarationKind::ALL {
            assert_eq!(kind.as_str().parse::<DeclarationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Structure".parse::<DeclarationKind>().is_err());
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = "enum".parse::<DeclarationKind>().unwrap_err();
        assert_eq!(err, ParseKindError("enum".to_string()));
        assert!(err.to_string().contains("'enum'"));
    }

    #[test]
    fn test_serializes_as_lowercase_tag() {
        let json = serde_json::to_string(&DeclarationKind::Class).unwrap();
        assert_eq!(json, "\"class\"");
        let kind: DeclarationKind = serde_json::from_str("\"inductive\"").unwrap();
        assert_eq!(kind, DeclarationKind::Inductive);
    }
}
