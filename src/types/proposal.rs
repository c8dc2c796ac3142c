//! Current-schema proposal record

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coin::{amount_str, Coins};
use crate::any::{Any, TypeUrl};

/// Lifecycle status of a proposal, stored as its numeric code
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "i32", into = "i32")]
pub enum ProposalStatus {
    #[default]
    Unspecified,
    DepositPeriod,
    CertifierVotingPeriod,
    ValidatorVotingPeriod,
    Passed,
    Rejected,
    Failed,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 7] = [
        Self::Unspecified,
        Self::DepositPeriod,
        Self::CertifierVotingPeriod,
        Self::ValidatorVotingPeriod,
        Self::Passed,
        Self::Rejected,
        Self::Failed,
    ];

    pub fn code(&self) -> i32 {
        match self {
            Self::Unspecified => 0,
            Self::DepositPeriod => 1,
            Self::CertifierVotingPeriod => 2,
            Self::ValidatorVotingPeriod => 3,
            Self::Passed => 4,
            Self::Rejected => 5,
            Self::Failed => 6,
        }
    }
}

impl TryFrom<i32> for ProposalStatus {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.code() == code)
            .ok_or_else(|| format!("unknown proposal status code {}", code))
    }
}

impl From<ProposalStatus> for i32 {
    fn from(status: ProposalStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "Unspecified",
            Self::DepositPeriod => "DepositPeriod",
            Self::CertifierVotingPeriod => "CertifierVotingPeriod",
            Self::ValidatorVotingPeriod => "ValidatorVotingPeriod",
            Self::Passed => "Passed",
            Self::Rejected => "Rejected",
            Self::Failed => "Failed",
        };
        write!(f, "{}", name)
    }
}

/// Final vote tally of a proposal
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TallyResult {
    #[serde(with = "amount_str")]
    pub yes: u128,
    #[serde(with = "amount_str")]
    pub abstain: u128,
    #[serde(with = "amount_str")]
    pub no: u128,
    #[serde(with = "amount_str")]
    pub no_with_veto: u128,
}

/// Proposal record as the current schema stores it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Proposal {
    pub proposal_id: u64,
    /// Executable content; opaque to storage and migration
    pub content: Any,
    pub status: ProposalStatus,
    pub is_proposer_council_member: bool,
    pub proposer_address: String,
    pub final_tally_result: TallyResult,
    pub submit_time: DateTime<Utc>,
    pub deposit_end_time: DateTime<Utc>,
    pub total_deposit: Coins,
    pub voting_start_time: DateTime<Utc>,
    pub voting_end_time: DateTime<Utc>,
}

/// Plain-text signalling proposal
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TextProposal {
    pub title: String,
    pub description: String,
}

impl TextProposal {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl TypeUrl for TextProposal {
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.TextProposal";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_roundtrip() {
        for (code, status) in ProposalStatus::ALL.iter().enumerate() {
            assert_eq!(status.code(), code as i32);
            assert_eq!(ProposalStatus::try_from(code as i32).unwrap(), *status);
        }
        assert!(ProposalStatus::try_from(7).is_err());
        assert!(ProposalStatus::try_from(-1).is_err());
    }

    #[test]
    fn test_status_serializes_as_code() {
        assert_eq!(serde_json::to_string(&ProposalStatus::Passed).unwrap(), "4");
        let status: ProposalStatus = serde_json::from_str("2").unwrap();
        assert_eq!(status, ProposalStatus::CertifierVotingPeriod);
        assert!(serde_json::from_str::<ProposalStatus>("9").is_err());
    }
}
