//! Schema transform contract
//!
//! A [`Transformer`] maps one decoded legacy value to its current-schema
//! shape. It is a pure function of its input: no store access, no codec.
//! Decoding and re-encoding are the migrator's job.
//!
//! ```rust,ignore
//! struct RenameTransformer;
//!
//! impl Transformer<OldEntry, NewEntry> for RenameTransformer {
//!     fn transform(&self, old: OldEntry) -> NewEntry {
//!         NewEntry {
//!             id: old.id,
//!             display_name: old.name,
//!         }
//!     }
//! }
//! ```

use crate::legacy;
use crate::types::{CustomParams, DepositParams, Proposal, TallyParams};

pub trait Transformer<Source, Target> {
    fn transform(&self, source: Source) -> Target;

    /// Name used in logs and reports
    fn record_type(&self) -> &str;
}

/// Legacy proposal to current proposal, field for field
pub struct ProposalTransformer;

impl Transformer<legacy::Proposal, Proposal> for ProposalTransformer {
    fn transform(&self, source: legacy::Proposal) -> Proposal {
        Proposal {
            proposal_id: source.proposal_id,
            content: source.content,
            status: source.status,
            is_proposer_council_member: source.is_proposer_council_member,
            proposer_address: source.proposer_address,
            final_tally_result: source.final_tally_result,
            submit_time: source.submit_time,
            deposit_end_time: source.deposit_end_time,
            total_deposit: source.total_deposit,
            voting_start_time: source.voting_start_time,
            voting_end_time: source.voting_end_time,
        }
    }

    fn record_type(&self) -> &str {
        "Proposal"
    }
}

/// Drops the legacy initial-deposit floor
pub struct DepositTransformer;

impl Transformer<legacy::DepositParams, DepositParams> for DepositTransformer {
    fn transform(&self, source: legacy::DepositParams) -> DepositParams {
        DepositParams {
            min_deposit: source.min_deposit,
            max_deposit_period: source.max_deposit_period,
        }
    }

    fn record_type(&self) -> &str {
        "DepositParams"
    }
}

/// Splits the legacy tally aggregate into general and certifier-update parts
pub struct TallySplitter;

impl Transformer<legacy::TallyParams, (TallyParams, CustomParams)> for TallySplitter {
    fn transform(&self, source: legacy::TallyParams) -> (TallyParams, CustomParams) {
        let custom = CustomParams {
            certifier_update_security_vote_tally: source.certifier_update_security_vote_tally,
            certifier_update_stake_vote_tally: source.certifier_update_stake_vote_tally,
        };
        (source.default_tally, custom)
    }

    fn record_type(&self) -> &str {
        "TallyParams"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coins, Dec, DEFAULT_PERIOD};

    #[test]
    fn test_deposit_transformer_drops_initial_deposit() {
        let legacy = legacy::DepositParams {
            min_initial_deposit: Coins::single("uctk", 1),
            min_deposit: Coins::single("uctk", 5),
            max_deposit_period: DEFAULT_PERIOD,
        };
        let params = DepositTransformer.transform(legacy);
        assert_eq!(params.min_deposit, Coins::single("uctk", 5));
        assert_eq!(params.max_deposit_period, DEFAULT_PERIOD);
    }

    #[test]
    fn test_tally_splitter() {
        let triple = |threshold: i64| {
            TallyParams::new(
                Dec::new_with_prec(335, 3).unwrap(),
                Dec::new_with_prec(threshold, 3).unwrap(),
                Dec::new_with_prec(335, 3).unwrap(),
            )
        };
        let legacy = legacy::TallyParams {
            default_tally: triple(600),
            certifier_update_security_vote_tally: triple(668),
            certifier_update_stake_vote_tally: triple(800),
        };

        let (tally, custom) = TallySplitter.transform(legacy);
        assert_eq!(tally, triple(600));
        assert_eq!(custom.certifier_update_security_vote_tally, triple(668));
        assert_eq!(custom.certifier_update_stake_vote_tally, triple(800));
    }
}
