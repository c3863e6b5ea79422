use rand::CryptoRng;
use tracing::{debug, warn};

use crate::{
    algorithm::Algorithm,
    config::Config,
    digest::{Md5, SaltedSha1, Sha1},
    error::Error,
    format::{classify, Classification, EncodedHash, Variant},
    kdf::pbkdf2::Pbkdf2,
    salt,
};

/// Algorithm to create a new hash with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
pub enum AlgorithmSelector {
    Md5,
    Sha1,
    SaltedSha1,
    #[default]
    Pbkdf2Default,
}

impl AlgorithmSelector {
    /// Resolve one of the historical string handles.
    ///
    /// `md5`, `sha1` and `ssha1` select their algorithm on an exact match. Every other
    /// name, `pbkdf2` included, resolves to [`AlgorithmSelector::Pbkdf2Default`]. Unknown
    /// names are not an error: existing callers rely on them producing PBKDF2 hashes.
    #[must_use]
    pub fn from_legacy_name(name: &str) -> Self {
        match name {
            "md5" => AlgorithmSelector::Md5,
            "sha1" => AlgorithmSelector::Sha1,
            "ssha1" => AlgorithmSelector::SaltedSha1,
            _ => AlgorithmSelector::Pbkdf2Default,
        }
    }

    #[must_use]
    pub fn variant(self) -> Variant {
        match self {
            AlgorithmSelector::Md5 => Variant::LegacyMd5Raw,
            AlgorithmSelector::Sha1 => Variant::LegacySha1Raw,
            AlgorithmSelector::SaltedSha1 => Variant::SaltedSha1V1,
            AlgorithmSelector::Pbkdf2Default => Variant::Pbkdf2V1,
        }
    }
}

/// Entry point for hashing, verifying and migrating stored password hashes.
///
/// Verification never trusts a caller-supplied algorithm: the stored hash is classified
/// and handed to the algorithm that owns its format.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    md5: Md5,
    sha1: Sha1,
    ssha1: SaltedSha1,
    pbkdf2: Pbkdf2,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            md5: Md5,
            sha1: Sha1,
            ssha1: SaltedSha1::new(config.ssha1.clone()),
            pbkdf2: Pbkdf2::new(config.pbkdf2.clone()),
        }
    }

    #[must_use]
    pub fn pbkdf2(&self) -> &Pbkdf2 {
        &self.pbkdf2
    }

    #[must_use]
    pub fn salted_sha1(&self) -> &SaltedSha1 {
        &self.ssha1
    }

    /// Hash `input` in the current format.
    ///
    /// # Errors
    /// If the configured PBKDF2 parameters are unusable.
    pub fn hash(&self, input: &str) -> Result<EncodedHash, Error> {
        self.pbkdf2.hash(input)
    }

    /// Hash `input` in the current format, drawing the salt from `rng`.
    ///
    /// # Errors
    /// If the configured PBKDF2 parameters are unusable.
    pub fn hash_with<R>(&self, rng: &mut R, input: &str) -> Result<EncodedHash, Error>
    where
        R: CryptoRng + ?Sized,
    {
        self.pbkdf2.hash_with(rng, input)
    }

    /// Hash `input` with the selected algorithm.
    ///
    /// Prefer [`Dispatcher::hash`]; the other selectors exist for compatibility with
    /// callers that still produce legacy hashes.
    ///
    /// # Errors
    /// If the selected algorithm's configured parameters are unusable.
    pub fn create(&self, input: &str, selector: AlgorithmSelector) -> Result<EncodedHash, Error> {
        self.create_with(&mut rand::rng(), input, selector)
    }

    /// Like [`Dispatcher::create`], drawing salts from `rng`.
    ///
    /// # Errors
    /// If the selected algorithm's configured parameters are unusable.
    #[tracing::instrument(skip(self, rng, input))]
    pub fn create_with<R>(
        &self,
        rng: &mut R,
        input: &str,
        selector: AlgorithmSelector,
    ) -> Result<EncodedHash, Error>
    where
        R: CryptoRng + ?Sized,
    {
        match selector {
            AlgorithmSelector::Md5 => self.md5.hash_with(rng, input),
            AlgorithmSelector::Sha1 => self.sha1.hash_with(rng, input),
            AlgorithmSelector::SaltedSha1 => self.ssha1.hash_with(rng, input),
            AlgorithmSelector::Pbkdf2Default => self.pbkdf2.hash_with(rng, input),
        }
    }

    /// Hash `input` with an algorithm named by its historical string handle.
    /// See [`AlgorithmSelector::from_legacy_name`] for how names resolve.
    ///
    /// # Errors
    /// If the selected algorithm's configured parameters are unusable.
    #[deprecated(note = "use `Dispatcher::hash`, or a specific algorithm directly")]
    pub fn create_by_name(&self, input: &str, name: &str) -> Result<EncodedHash, Error> {
        self.create(input, AlgorithmSelector::from_legacy_name(name))
    }

    /// Check `input` against a stored hash.
    ///
    /// Returns `false` for unrecognised formats and for stored hashes that fail to parse,
    /// without telling the caller which of those happened.
    #[tracing::instrument(skip_all)]
    pub fn verify(&self, input: &str, stored: &str) -> bool {
        let Classification::Known(variant) = classify(stored) else {
            debug!(counter.unrecognized_hashes = 1, "unrecognized hash format");
            return false;
        };

        let result = match variant {
            Variant::Pbkdf2V1 => self.pbkdf2.compare(input, stored),
            Variant::SaltedSha1V1 => self.ssha1.compare(input, stored),
            Variant::LegacySha1Raw => self.sha1.compare(input, stored),
            Variant::LegacyMd5Raw => self.md5.compare(input, stored),
        };

        result.unwrap_or_else(|e| {
            warn!(
                counter.malformed_hashes = 1,
                variant = %variant,
                err = %e,
                "stored hash could not be compared"
            );
            false
        })
    }

    /// Whether a stored hash should be replaced with a fresh [`Dispatcher::hash`].
    ///
    /// Only PBKDF2 hashes can be up to date, and the PBKDF2 parameters decide. Anything
    /// else, including unrecognised or unparsable hashes, needs migration.
    #[tracing::instrument(skip_all)]
    pub fn requires_migration(&self, stored: &str) -> bool {
        match classify(stored) {
            Classification::Known(Variant::Pbkdf2V1) => {
                self.pbkdf2.requires_migration(stored).unwrap_or_else(|e| {
                    warn!(
                        counter.malformed_hashes = 1,
                        variant = %Variant::Pbkdf2V1,
                        err = %e,
                        "stored hash could not be inspected"
                    );
                    true
                })
            }
            Classification::Known(_) | Classification::Unrecognized => true,
        }
    }

    /// Generate a hex salt of `length` characters from the thread-local CSPRNG.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if `length` is zero or above
    /// [`salt::MAX_SALT_LENGTH`].
    pub fn generate_salt(&self, length: usize) -> Result<String, Error> {
        salt::generate_salt(&mut rand::rng(), length)
    }
}
