use std::{fs, io, path::Path};

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    page_replacer::ReplacementPolicy,
    player::{Mode, Player, Timing},
    Mmu,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulator settings. Every field is optional in the JSON form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
    pub policy: ReplacementPolicy,
    pub mode: Mode,
    pub timing: Timing,
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json)
    }

    pub fn build_mmu(&self) -> Mmu {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Mmu::with_policy(self.policy, rng)
    }

    pub fn build_player(&self) -> Player {
        Player::new(self.build_mmu(), self.timing, self.mode)
    }
}
