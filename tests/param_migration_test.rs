//! Parameter splitter integration tests

mod common;

use gov_migrate::keys::{
    param_key, PARAM_KEY_CUSTOM, PARAM_KEY_DEPOSIT, PARAM_KEY_TALLY, PARAM_KEY_VOTING,
};
use gov_migrate::legacy::legacy_key_table;
use gov_migrate::types::{
    tokens_from_consensus_power, Coins, CustomParams, DepositParams, TallyParams, VotingParams,
    DEFAULT_PERIOD, MICRO_CTK_DENOM,
};
use gov_migrate::{
    gov_key_table, migrate_params, migrate_proposals, KvStore, MemStore, MsgPackCodec,
    ParamSpace, GOV_SPACE,
};

#[test]
fn test_migrate_params_scenario() {
    let mut store = MemStore::new();
    common::seed_legacy_params(&mut store);

    let mut space = ParamSpace::new(&mut store, GOV_SPACE, legacy_key_table());
    space.set_key_table(gov_key_table());
    migrate_params(&mut space).unwrap();

    let deposit: DepositParams = space.get(PARAM_KEY_DEPOSIT).unwrap();
    let tally: TallyParams = space.get(PARAM_KEY_TALLY).unwrap();
    let custom: CustomParams = space.get(PARAM_KEY_CUSTOM).unwrap();

    assert_eq!(
        deposit.min_deposit,
        Coins::single(MICRO_CTK_DENOM, tokens_from_consensus_power(5))
    );
    assert_eq!(deposit.max_deposit_period, DEFAULT_PERIOD);
    assert_eq!(tally, common::default_tally());
    assert_eq!(custom.certifier_update_security_vote_tally, common::security_tally());
    assert_eq!(custom.certifier_update_stake_vote_tally, common::stake_tally());
}

#[test]
fn test_tally_values_are_exact() {
    let mut store = MemStore::new();
    common::seed_legacy_params(&mut store);

    let mut space = ParamSpace::new(&mut store, GOV_SPACE, gov_key_table());
    migrate_params(&mut space).unwrap();

    let tally: TallyParams = space.get(PARAM_KEY_TALLY).unwrap();
    assert_eq!(tally.quorum.to_string(), "0.335000000000000000");
    assert_eq!(tally.threshold.to_string(), "0.600000000000000000");
    assert_eq!(tally.veto_threshold.to_string(), "0.335000000000000000");

    let custom: CustomParams = space.get(PARAM_KEY_CUSTOM).unwrap();
    assert_eq!(
        custom.certifier_update_security_vote_tally.threshold.to_string(),
        "0.668000000000000000"
    );
    assert_eq!(
        custom.certifier_update_stake_vote_tally.threshold.to_string(),
        "0.800000000000000000"
    );
}

#[test]
fn test_initial_deposit_leaves_no_trace() {
    let mut store = MemStore::new();
    common::seed_legacy_params(&mut store);

    let mut space = ParamSpace::new(&mut store, GOV_SPACE, gov_key_table());
    migrate_params(&mut space).unwrap();

    let raw = space.get_raw(PARAM_KEY_DEPOSIT).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let fields: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(fields, vec!["max_deposit_period", "min_deposit"]);
    assert!(!String::from_utf8(raw).unwrap().contains("min_initial_deposit"));
}

#[test]
fn test_legacy_aggregate_no_longer_readable() {
    let mut store = MemStore::new();
    common::seed_legacy_params(&mut store);

    let mut space = ParamSpace::new(&mut store, GOV_SPACE, gov_key_table());
    migrate_params(&mut space).unwrap();

    let raw = space.get_raw(PARAM_KEY_TALLY).unwrap().unwrap();
    assert!(serde_json::from_slice::<gov_migrate::legacy::TallyParams>(&raw).is_err());
}

#[test]
fn test_voting_params_untouched() {
    let mut store = MemStore::new();
    common::seed_legacy_params(&mut store);
    {
        let mut space = ParamSpace::new(&mut store, GOV_SPACE, legacy_key_table());
        space.set(PARAM_KEY_VOTING, &VotingParams::default()).unwrap();
    }
    let voting_key = param_key(GOV_SPACE, PARAM_KEY_VOTING);
    let before = store.get(&voting_key).unwrap();
    assert!(before.is_some());

    let mut space = ParamSpace::new(&mut store, GOV_SPACE, gov_key_table());
    migrate_params(&mut space).unwrap();
    assert_eq!(space.get_raw(PARAM_KEY_VOTING).unwrap(), before);
}

#[test]
fn test_order_independence() {
    let mut first = MemStore::new();
    common::seed_status_proposals(&mut first);
    common::seed_legacy_params(&mut first);
    let mut second = first.clone();

    // proposals, then params
    migrate_proposals(&mut first, &MsgPackCodec).unwrap();
    migrate_params(&mut ParamSpace::new(&mut first, GOV_SPACE, gov_key_table())).unwrap();

    // params, then proposals
    migrate_params(&mut ParamSpace::new(&mut second, GOV_SPACE, gov_key_table())).unwrap();
    migrate_proposals(&mut second, &MsgPackCodec).unwrap();

    assert_eq!(first.snapshot(), second.snapshot());
}
