use serde::{Deserialize, Serialize};

/// Kind of transfer being notarized. Forgiveness tiers differ per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Acquisition,
    Inheritance,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acquisition => "acquisition",
            Self::Inheritance => "inheritance",
        }
    }

    /// Display name used on printed reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acquisition => "Adquisición",
            Self::Inheritance => "Herencia",
        }
    }

    /// Parses an operation code. Accepts the English codes and the Spanish
    /// form values (`adquisicion`, `herencia`), ignoring case and accents.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "acquisition" | "adquisicion" | "adquisición" => Some(Self::Acquisition),
            "inheritance" | "herencia" => Some(Self::Inheritance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_english_codes() {
        assert_eq!(OperationType::parse("acquisition"), Some(OperationType::Acquisition));
        assert_eq!(OperationType::parse("inheritance"), Some(OperationType::Inheritance));
    }

    #[test]
    fn parse_accepts_spanish_form_values() {
        assert_eq!(OperationType::parse("adquisicion"), Some(OperationType::Acquisition));
        assert_eq!(OperationType::parse("Adquisición"), Some(OperationType::Acquisition));
        assert_eq!(OperationType::parse(" HERENCIA "), Some(OperationType::Inheritance));
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(OperationType::parse("donacion"), None);
        assert_eq!(OperationType::parse(""), None);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for op in [OperationType::Acquisition, OperationType::Inheritance] {
            assert_eq!(OperationType::parse(op.as_str()), Some(op));
        }
    }
}
