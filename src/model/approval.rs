use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

/// Outcome of evaluating every approval record attached to a request.
#[derive(Debug, Eq, PartialEq)]
pub enum Consensus {
    /// Every designated approver has approved (vacuously true when a request
    /// has no designated approvers). Final sign-off may proceed.
    Ready,
    /// At least one approver has not decided yet.
    AwaitingDecisions { pending: usize },
    /// At least one approver rejected; the request can never be finalized.
    Rejected { rejected: usize },
}

/// The single place the sign-off rule lives. A request may be finalized only
/// when none of its approval records are rejected and none remain pending.
pub fn evaluate(records: &[ApprovalStatus]) -> Consensus {
    let rejected = records
        .iter()
        .filter(|s| **s == ApprovalStatus::Rejected)
        .count();
    if rejected > 0 {
        return Consensus::Rejected { rejected };
    }

    let pending = records
        .iter()
        .filter(|s| **s == ApprovalStatus::Pending)
        .count();
    if pending > 0 {
        return Consensus::AwaitingDecisions { pending };
    }

    Consensus::Ready
}

#[cfg(test)]
mod tests {
    use super::ApprovalStatus::*;
    use super::*;

    #[test]
    fn empty_set_is_ready() {
        assert_eq!(evaluate(&[]), Consensus::Ready);
    }

    #[test]
    fn all_approved_is_ready() {
        assert_eq!(evaluate(&[Approved, Approved, Approved]), Consensus::Ready);
    }

    #[test]
    fn any_pending_blocks() {
        assert_eq!(
            evaluate(&[Approved, Pending, Approved]),
            Consensus::AwaitingDecisions { pending: 1 }
        );
    }

    #[test]
    fn any_rejection_blocks() {
        assert_eq!(
            evaluate(&[Approved, Rejected]),
            Consensus::Rejected { rejected: 1 }
        );
    }

    #[test]
    fn rejection_wins_over_pending() {
        // A rejection is terminal even while other approvers are undecided.
        assert_eq!(
            evaluate(&[Pending, Rejected, Pending]),
            Consensus::Rejected { rejected: 1 }
        );
    }

    #[test]
    fn status_round_trips_through_db_strings() {
        for s in [Pending, Approved, Rejected] {
            assert_eq!(ApprovalStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ApprovalStatus::parse("cancelled"), None);
    }
}
