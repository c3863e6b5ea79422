use std::path::PathBuf;

use garde::Validate;
use ratchet_fs::{toml::FromToml, DefaultPathProvider};
use serde::{Deserialize, Serialize};

use ratchet_telemetry::Telemetry;

use crate::{
    error::Error,
    kdf::pbkdf2::{Prf, MAX_ITERATIONS, MAX_KEY_LENGTH},
    salt::MAX_SALT_LENGTH,
};

#[derive(Validate, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[garde(dive)]
    pub pbkdf2: Pbkdf2Config,
    #[garde(dive)]
    pub ssha1: SaltedSha1Config,
    #[garde(dive)]
    pub telemetry: ratchet_telemetry::config::Config,
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl DefaultPathProvider for Config {
    const DEFAULT_FILENAME: &'static str = "config/ratchet.toml";
}

impl Config {
    /// Run validation, returning the config unchanged when it passes.
    ///
    /// # Errors
    /// Returns `Error::Config` with every failing field.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()?;
        Ok(self)
    }

    /// Load and validate the config file at `path`, or the default path.
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// If the file cannot be read or parsed, or fails validation.
    pub async fn load(path: Option<PathBuf>) -> Result<Self, Error> {
        Self::from_toml_path_or_default(path).await?.validated()
    }

    /// Telemetry built from the `[telemetry]` table, ready for `init` or `init_scoped`.
    #[must_use]
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::new(self.telemetry.clone())
    }
}

/// Parameters new PBKDF2 hashes are created with, and that stored ones are held to.
#[derive(Validate, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pbkdf2Config {
    #[garde(skip)]
    pub prf: Prf,
    #[garde(range(min = 1000, max = MAX_ITERATIONS))]
    pub iterations: u32,
    #[garde(range(min = 8, max = MAX_SALT_LENGTH))]
    pub salt_length: usize,
    #[garde(range(min = 16, max = MAX_KEY_LENGTH))]
    pub key_length: usize,
}

impl Default for Pbkdf2Config {
    fn default() -> Self {
        Self {
            prf: Prf::Sha256,
            iterations: 10_000,
            salt_length: 20,
            key_length: 40,
        }
    }
}

#[derive(Validate, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaltedSha1Config {
    #[garde(range(min = 1, max = MAX_SALT_LENGTH))]
    pub salt_length: usize,
}

impl Default for SaltedSha1Config {
    fn default() -> Self {
        Self { salt_length: 10 }
    }
}
