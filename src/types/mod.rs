//! Current-schema governance types

pub mod coin;
pub mod dec;
pub mod params;
pub mod proposal;

pub use coin::{tokens_from_consensus_power, Coin, Coins, MICRO_CTK_DENOM};
pub use dec::Dec;
pub use params::{CustomParams, DepositParams, TallyParams, VotingParams, DEFAULT_PERIOD};
pub use proposal::{Proposal, ProposalStatus, TallyResult, TextProposal};
