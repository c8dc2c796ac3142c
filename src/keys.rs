//! Key layout of the governance store
//!
//! ```text
//! 0x00 | proposal_id (u64, big-endian)   -> Proposal (MessagePack)
//! "params/" | space | "/" | param_key    -> parameter value (JSON)
//! "version/" | module                    -> schema version (u64, big-endian)
//! ```
//!
//! Proposal ids are encoded big-endian so ascending key order is ascending
//! id order.

use crate::error::MigrationError;

/// Prefix of every proposal record
pub const PROPOSALS_PREFIX: &[u8] = &[0x00];

/// Prefix of every parameter namespace
pub const PARAMS_PREFIX: &[u8] = b"params/";

/// Prefix of the per-module schema version markers
pub const VERSION_PREFIX: &[u8] = b"version/";

/// Parameter key for deposit parameters
pub const PARAM_KEY_DEPOSIT: &str = "depositparams";
/// Parameter key for voting parameters
pub const PARAM_KEY_VOTING: &str = "votingparams";
/// Parameter key for tally parameters
pub const PARAM_KEY_TALLY: &str = "tallyparams";
/// Parameter key for custom (certifier update) tally parameters
pub const PARAM_KEY_CUSTOM: &str = "customparams";

const PROPOSAL_KEY_LEN: usize = PROPOSALS_PREFIX.len() + 8;

/// Key of proposal `proposal_id`: the proposal prefix then the id big-endian
pub fn proposal_key(proposal_id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(PROPOSAL_KEY_LEN);
    key.extend_from_slice(PROPOSALS_PREFIX);
    key.extend_from_slice(&proposal_id.to_be_bytes());
    key
}

/// Recover the proposal id embedded in a proposal key
pub fn proposal_id_from_key(key: &[u8]) -> Result<u64, MigrationError> {
    let malformed = |reason: &str| MigrationError::MalformedKey {
        key: hex::encode(key),
        reason: reason.to_string(),
    };

    let id_bytes = key
        .strip_prefix(PROPOSALS_PREFIX)
        .ok_or_else(|| malformed("missing proposal prefix"))?;
    let id_bytes: [u8; 8] = id_bytes
        .try_into()
        .map_err(|_| malformed("proposal id must be 8 bytes"))?;
    Ok(u64::from_be_bytes(id_bytes))
}

/// Prefix under which one parameter namespace stores its values
pub fn param_space_prefix(space: &str) -> Vec<u8> {
    let mut prefix = PARAMS_PREFIX.to_vec();
    prefix.extend_from_slice(space.as_bytes());
    prefix.push(b'/');
    prefix
}

/// Full store key of parameter `key` in namespace `space`
pub fn param_key(space: &str, key: &str) -> Vec<u8> {
    let mut full = param_space_prefix(space);
    full.extend_from_slice(key.as_bytes());
    full
}

/// Key holding the schema version of `module`
pub fn version_key(module: &str) -> Vec<u8> {
    let mut key = VERSION_PREFIX.to_vec();
    key.extend_from_slice(module.as_bytes());
    key
}

/// Smallest key strictly greater than every key starting with `prefix`
///
/// Returns `None` when the prefix is all `0xff` bytes (unbounded).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

/// Human-readable rendering of a key for error messages
pub fn describe_key(key: &[u8]) -> String {
    if key.len() == PROPOSAL_KEY_LEN {
        if let Ok(id) = proposal_id_from_key(key) {
            return format!("proposal {} (0x{})", id, hex::encode(key));
        }
    }
    match std::str::from_utf8(key) {
        Ok(text) if key.starts_with(PARAMS_PREFIX) || key.starts_with(VERSION_PREFIX) => {
            text.to_string()
        }
        _ => format!("0x{}", hex::encode(key)),
    }
}
