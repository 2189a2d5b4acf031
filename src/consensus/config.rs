//! Chain configuration and genesis parsing.

use super::{pova::ConfigError, DEFAULT_MAX_SEAL_WAIT, DEFAULT_PERIOD};
use crate::primitives::Header;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// POVA engine parameters, the `pova` section of the chain config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PovaConfig {
    /// Target seconds between consecutive blocks.
    pub period: u64,
    /// Seconds a producer waits for its slot before sealing anyway.
    #[serde(default = "default_max_seal_wait")]
    pub max_seal_wait: u64,
    /// Verify the secp256k1 seal in `extra` on top of the declared coinbase.
    #[serde(default)]
    pub verify_seal: bool,
}

fn default_max_seal_wait() -> u64 {
    DEFAULT_MAX_SEAL_WAIT
}

impl Default for PovaConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            max_seal_wait: DEFAULT_MAX_SEAL_WAIT,
            verify_seal: false,
        }
    }
}

impl PovaConfig {
    /// Create a config with the given period.
    pub fn new(period: u64) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Set the seal patience window in seconds.
    pub fn with_max_seal_wait(mut self, secs: u64) -> Self {
        self.max_seal_wait = secs;
        self
    }

    /// Enable seal signature verification.
    pub fn with_verify_seal(mut self, verify_seal: bool) -> Self {
        self.verify_seal = verify_seal;
        self
    }
}

/// Host chain configuration.
///
/// The engine only reads the optional `pova` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Chain identifier.
    #[serde(default)]
    pub chain_id: u64,
    /// POVA parameters. Defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pova: Option<PovaConfig>,
}

impl ChainConfig {
    /// Create a config without a `pova` section.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            pova: None,
        }
    }

    /// Attach POVA parameters.
    pub fn with_pova(mut self, pova: PovaConfig) -> Self {
        self.pova = Some(pova);
        self
    }

    /// Block period in seconds, [`DEFAULT_PERIOD`] when unset.
    pub fn period(&self) -> u64 {
        self.pova.map_or(DEFAULT_PERIOD, |p| p.period)
    }

    /// Seal patience window, [`DEFAULT_MAX_SEAL_WAIT`] seconds when unset.
    pub fn max_seal_wait(&self) -> Duration {
        Duration::from_secs(self.pova.map_or(DEFAULT_MAX_SEAL_WAIT, |p| p.max_seal_wait))
    }

    /// Whether seal signatures are verified.
    pub fn verify_seal(&self) -> bool {
        self.pova.is_some_and(|p| p.verify_seal)
    }
}

/// Genesis document.
///
/// ```json
/// {
///   "config": { "chainId": 1337, "pova": { "period": 5 } },
///   "validators": ["0x0101010101010101010101010101010101010101"],
///   "timestamp": 0
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    /// Chain configuration.
    pub config: ChainConfig,
    /// Rotation order.
    #[serde(default)]
    pub validators: Vec<Address>,
    /// Genesis timestamp.
    #[serde(default)]
    pub timestamp: u64,
}

impl Genesis {
    /// Parse a genesis document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let genesis: Self = serde_json::from_str(json)?;
        if genesis.validators.is_empty() {
            return Err(ConfigError::EmptyValidatorSet);
        }
        Ok(genesis)
    }

    /// Header at height 0 stamped with the genesis timestamp.
    pub fn header(&self) -> Header {
        Header::new(0, B256::ZERO).with_time(self.timestamp)
    }
}
