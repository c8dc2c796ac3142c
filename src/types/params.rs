//! Current-schema governance parameter sets

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::coin::{tokens_from_consensus_power, Coins, MICRO_CTK_DENOM};
use super::dec::Dec;

/// Default deposit and voting period: two days
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60 * 60 * 24 * 2);

/// Tally triple governing how votes decide a proposal
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyParams {
    /// Minimum share of voting power that must vote
    pub quorum: Dec,
    /// Minimum share of yes votes (excluding abstain) to pass
    pub threshold: Dec,
    /// Minimum share of no-with-veto votes to veto
    pub veto_threshold: Dec,
}

impl TallyParams {
    pub fn new(quorum: Dec, threshold: Dec, veto_threshold: Dec) -> Self {
        Self {
            quorum,
            threshold,
            veto_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("quorum", self.quorum),
            ("threshold", self.threshold),
            ("veto threshold", self.veto_threshold),
        ] {
            if !value.is_fraction() {
                return Err(format!("{} must be within [0, 1]: {}", name, value));
            }
        }
        if self.threshold == Dec::zero() {
            return Err("threshold must be positive".to_string());
        }
        if self.veto_threshold == Dec::zero() {
            return Err("veto threshold must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for TallyParams {
    fn default() -> Self {
        Self::new(
            Dec::from_atomics(334_000_000_000_000_000),
            Dec::from_atomics(500_000_000_000_000_000),
            Dec::from_atomics(334_000_000_000_000_000),
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositParams {
    pub min_deposit: Coins,
    pub max_deposit_period: Duration,
}

impl DepositParams {
    pub fn validate(&self) -> Result<(), String> {
        self.min_deposit
            .validate()
            .map_err(|e| format!("invalid minimum deposit: {}", e))?;
        if self.max_deposit_period.is_zero() {
            return Err("maximum deposit period must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for DepositParams {
    fn default() -> Self {
        Self {
            min_deposit: Coins::single(MICRO_CTK_DENOM, tokens_from_consensus_power(512)),
            max_deposit_period: DEFAULT_PERIOD,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VotingParams {
    pub voting_period: Duration,
}

impl VotingParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.voting_period.is_zero() {
            return Err("voting period must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for VotingParams {
    fn default() -> Self {
        Self {
            voting_period: DEFAULT_PERIOD,
        }
    }
}

/// Tally triples for certifier-update votes, split out of the legacy
/// aggregate tally parameters
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomParams {
    pub certifier_update_security_vote_tally: TallyParams,
    pub certifier_update_stake_vote_tally: TallyParams,
}

impl CustomParams {
    pub fn validate(&self) -> Result<(), String> {
        self.certifier_update_security_vote_tally
            .validate()
            .map_err(|e| format!("certifier security tally: {}", e))?;
        self.certifier_update_stake_vote_tally
            .validate()
            .map_err(|e| format!("certifier stake tally: {}", e))
    }
}
