//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};

use gov_migrate::keys::{proposal_key, PARAM_KEY_DEPOSIT, PARAM_KEY_TALLY};
use gov_migrate::legacy::{self, legacy_key_table};
use gov_migrate::types::{
    tokens_from_consensus_power, Coin, Coins, Dec, ProposalStatus, TallyParams, TallyResult,
    TextProposal, DEFAULT_PERIOD, MICRO_CTK_DENOM,
};
use gov_migrate::{Any, Codec, KvStore, MsgPackCodec, ParamSpace, GOV_SPACE};

pub fn text_content() -> Any {
    Any::pack(&TextProposal::new("title", "description"), &MsgPackCodec).unwrap()
}

/// Proposals 1..=7 with status codes 0..=6, all wrapping the same text content
pub fn seed_status_proposals<S: KvStore>(store: &mut S) -> Vec<legacy::Proposal> {
    let proposals: Vec<legacy::Proposal> = ProposalStatus::ALL
        .iter()
        .enumerate()
        .map(|(i, status)| legacy::Proposal {
            proposal_id: i as u64 + 1,
            status: *status,
            content: text_content(),
            ..Default::default()
        })
        .collect();
    for proposal in &proposals {
        let bytes = MsgPackCodec.encode(proposal).unwrap();
        store.set(&proposal_key(proposal.proposal_id), &bytes).unwrap();
    }
    proposals
}

/// A proposal with every legacy field populated
pub fn full_legacy_proposal(id: u64) -> legacy::Proposal {
    legacy::Proposal {
        proposal_id: id,
        content: Any::new("/shield.v1alpha1.ShieldClaimProposal", vec![0x0a, 0x03, 0xde, 0xad, 0xff]),
        status: ProposalStatus::ValidatorVotingPeriod,
        is_proposer_council_member: true,
        proposer_address: "certik1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du".to_string(),
        final_tally_result: TallyResult {
            yes: 1_000,
            abstain: 20,
            no: 300,
            no_with_veto: 4,
        },
        submit_time: Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap(),
        deposit_end_time: Utc.with_ymd_and_hms(2021, 6, 3, 12, 0, 0).unwrap(),
        total_deposit: Coins::new(vec![Coin::new(MICRO_CTK_DENOM, 512_000_000)]),
        voting_start_time: Utc.with_ymd_and_hms(2021, 6, 2, 8, 30, 0).unwrap(),
        voting_end_time: Utc.with_ymd_and_hms(2021, 6, 4, 8, 30, 0).unwrap(),
    }
}

pub fn tally(quorum: i64, threshold: i64, veto: i64) -> TallyParams {
    TallyParams::new(
        Dec::new_with_prec(quorum, 3).unwrap(),
        Dec::new_with_prec(threshold, 3).unwrap(),
        Dec::new_with_prec(veto, 3).unwrap(),
    )
}

pub fn default_tally() -> TallyParams {
    tally(335, 600, 335)
}

pub fn security_tally() -> TallyParams {
    tally(335, 668, 335)
}

pub fn stake_tally() -> TallyParams {
    tally(335, 800, 335)
}

pub fn legacy_deposit() -> legacy::DepositParams {
    legacy::DepositParams {
        min_initial_deposit: Coins::single(MICRO_CTK_DENOM, tokens_from_consensus_power(1)),
        min_deposit: Coins::single(MICRO_CTK_DENOM, tokens_from_consensus_power(5)),
        max_deposit_period: DEFAULT_PERIOD,
    }
}

pub fn legacy_tally() -> legacy::TallyParams {
    legacy::TallyParams {
        default_tally: default_tally(),
        certifier_update_security_vote_tally: security_tally(),
        certifier_update_stake_vote_tally: stake_tally(),
    }
}

/// Write legacy deposit and tally parameters under the legacy key table
pub fn seed_legacy_params<S: KvStore>(store: &mut S) {
    let mut space = ParamSpace::new(store, GOV_SPACE, legacy_key_table());
    space.set(PARAM_KEY_DEPOSIT, &legacy_deposit()).unwrap();
    space.set(PARAM_KEY_TALLY, &legacy_tally()).unwrap();
}
