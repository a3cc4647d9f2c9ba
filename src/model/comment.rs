use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which workflow a comment thread hangs off.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Permit,
    MedicalLeave,
    Certification,
}

impl RequestKind {
    pub fn as_str(&self) -> &str {
        match self {
            RequestKind::Permit => "permit",
            RequestKind::MedicalLeave => "medical_leave",
            RequestKind::Certification => "certification",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "permit" => Some(RequestKind::Permit),
            "medical_leave" => Some(RequestKind::MedicalLeave),
            "certification" => Some(RequestKind::Certification),
            _ => None,
        }
    }

    /// Table holding the request rows for this kind.
    pub fn table(&self) -> &str {
        match self {
            RequestKind::Permit => "permit_requests",
            RequestKind::MedicalLeave => "medical_leaves",
            RequestKind::Certification => "certifications",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_path_segments() {
        assert_eq!(RequestKind::parse("permit"), Some(RequestKind::Permit));
        assert_eq!(
            RequestKind::parse("medical_leave"),
            Some(RequestKind::MedicalLeave)
        );
        assert_eq!(
            RequestKind::parse("certification"),
            Some(RequestKind::Certification)
        );
        assert_eq!(RequestKind::parse("payroll"), None);
    }
}
