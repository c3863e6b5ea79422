use rand::CryptoRng;

use crate::{
    error::Error,
    format::{EncodedHash, Variant},
};

/// A hashing scheme that owns one [`Variant`] of the stored format.
pub trait Algorithm {
    const VARIANT: Variant;

    /// Hash `input`, drawing any salt from `rng`.
    ///
    /// # Errors
    /// If the configured parameters cannot produce a hash.
    fn hash_with<R>(&self, rng: &mut R, input: &str) -> Result<EncodedHash, Error>
    where
        R: CryptoRng + ?Sized;

    /// Hash `input` using the thread-local CSPRNG for salts.
    ///
    /// # Errors
    /// See [`Algorithm::hash_with`].
    fn hash(&self, input: &str) -> Result<EncodedHash, Error> {
        self.hash_with(&mut rand::rng(), input)
    }

    /// Check `input` against a stored hash of this variant.
    ///
    /// # Errors
    /// If `encoded` cannot be parsed as this variant.
    fn compare(&self, input: &str, encoded: &str) -> Result<bool, Error>;

    /// Whether `encoded` should be replaced by a fresh hash.
    /// Only the current format overrides this.
    ///
    /// # Errors
    /// If `encoded` cannot be parsed as this variant.
    fn requires_migration(&self, _encoded: &str) -> Result<bool, Error> {
        Ok(true)
    }
}
