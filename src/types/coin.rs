use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Smallest-unit denomination of the staking token
pub const MICRO_CTK_DENOM: &str = "uctk";

/// Units of the smallest denomination per unit of consensus power
pub const POWER_REDUCTION: u128 = 1_000_000;

fn denom_regex() -> &'static Regex {
    static DENOM: OnceLock<Regex> = OnceLock::new();
    DENOM.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9/:._-]{2,127}$").expect("denom pattern is valid")
    })
}

pub fn validate_denom(denom: &str) -> Result<(), String> {
    if denom_regex().is_match(denom) {
        Ok(())
    } else {
        Err(format!("invalid denom: {}", denom))
    }
}

/// Token amount in the smallest unit for a given consensus power
pub fn tokens_from_consensus_power(power: u64) -> u128 {
    power as u128 * POWER_REDUCTION
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount_str")]
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_denom(&self.denom)?;
        if self.amount == 0 {
            return Err(format!("zero amount for {}", self.denom));
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins sorted by denomination, at most one coin per denomination
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, Hash)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Build a coin set, sorting by denomination
    pub fn new(mut coins: Vec<Coin>) -> Self {
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        Self(coins)
    }

    pub fn single(denom: impl Into<String>, amount: u128) -> Self {
        Self(vec![Coin::new(denom, amount)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Every coin valid and positive, denominations strictly ascending
    pub fn validate(&self) -> Result<(), String> {
        for coin in &self.0 {
            coin.validate()?;
        }
        for pair in self.0.windows(2) {
            if pair[0].denom >= pair[1].denom {
                return Err(format!(
                    "coins not sorted or duplicated: {} then {}",
                    pair[0].denom, pair[1].denom
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        write!(f, "{}", rendered.join(","))
    }
}

/// Integer amounts travel as decimal strings
pub(crate) mod amount_str {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| D::Error::custom(format!("invalid integer amount: {:?}", raw)))
    }
}
