//! Legacy (schema version 1) governance shapes
//!
//! These types are only ever decoded, never written by the current module.
//! They exist so migration can read what older binaries stored.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::any::Any;
use crate::keys::{PARAM_KEY_DEPOSIT, PARAM_KEY_TALLY, PARAM_KEY_VOTING};
use crate::params::{KeyTable, ParamValue};
use crate::types::{Coins, ProposalStatus, TallyResult, VotingParams};

/// Schema version these shapes belong to
pub const LEGACY_VERSION: u64 = 1;

/// Proposal record as stored by schema version 1
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Proposal {
    pub proposal_id: u64,
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

/// Legacy deposit parameters, including the dropped initial-deposit floor
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositParams {
    pub min_initial_deposit: Coins,
    pub min_deposit: Coins,
    pub max_deposit_period: Duration,
}

impl ParamValue for DepositParams {
    fn validate(&self) -> Result<(), String> {
        self.min_initial_deposit
            .validate()
            .map_err(|e| format!("invalid minimum initial deposit: {}", e))?;
        self.min_deposit
            .validate()
            .map_err(|e| format!("invalid minimum deposit: {}", e))
    }
}

/// Legacy aggregate of the three tally triples
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyParams {
    pub default_tally: crate::types::TallyParams,
    pub certifier_update_security_vote_tally: crate::types::TallyParams,
    pub certifier_update_stake_vote_tally: crate::types::TallyParams,
}

impl ParamValue for TallyParams {
    fn validate(&self) -> Result<(), String> {
        self.default_tally.validate()?;
        self.certifier_update_security_vote_tally.validate()?;
        self.certifier_update_stake_vote_tally.validate()
    }
}

/// Key table the legacy module registered for its parameter namespace
pub fn legacy_key_table() -> KeyTable {
    KeyTable::new()
        .register::<DepositParams>(PARAM_KEY_DEPOSIT)
        .register::<VotingParams>(PARAM_KEY_VOTING)
        .register::<TallyParams>(PARAM_KEY_TALLY)
}
