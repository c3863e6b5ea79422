use rand::CryptoRng;
use tracing::debug;

use super::{hex_digest, hex_matches};
use crate::{
    algorithm::Algorithm,
    config::SaltedSha1Config,
    error::Error,
    format::{EncodedHash, Variant, SALTED_SHA1_TAG, SHA1_HEX_LEN},
    salt::generate_salt,
};

/// Salted SHA-1: `SSHA1Xv1` + salt + hex(sha1(salt ‖ input)).
#[derive(Debug, Clone, Default)]
pub struct SaltedSha1 {
    config: SaltedSha1Config,
}

impl SaltedSha1 {
    #[must_use]
    pub fn new(config: SaltedSha1Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SaltedSha1Config {
        &self.config
    }

    /// Hash with a caller-chosen salt.
    ///
    /// # Errors
    /// If `salt` is empty or not ASCII, since it could not be split back out of the hash.
    pub fn hash_with_salt(&self, input: &str, salt: &str) -> Result<EncodedHash, Error> {
        if salt.is_empty() || !salt.is_ascii() {
            return Err(Error::InvalidArgument(
                "salted sha1 salt must be non-empty ascii".to_string(),
            ));
        }

        let digest = hex_digest::<::sha1::Sha1>(&[salt.as_bytes(), input.as_bytes()]);
        Ok(EncodedHash::new(
            Self::VARIANT,
            format!("{SALTED_SHA1_TAG}{salt}{digest}"),
        ))
    }

    /// Split a stored hash into its salt and hex digest.
    ///
    /// # Errors
    /// If the tag is missing, the payload is not ASCII, or there is no room for a salt.
    pub fn split(encoded: &str) -> Result<(&str, &str), Error> {
        let payload = encoded
            .strip_prefix(SALTED_SHA1_TAG)
            .ok_or_else(|| Error::malformed(Self::VARIANT, "missing tag"))?;

        if !payload.is_ascii() {
            return Err(Error::malformed(Self::VARIANT, "non-ascii payload"));
        }
        if payload.len() <= SHA1_HEX_LEN {
            return Err(Error::malformed(Self::VARIANT, "payload too short"));
        }

        Ok(payload.split_at(payload.len() - SHA1_HEX_LEN))
    }
}

impl Algorithm for SaltedSha1 {
    const VARIANT: Variant = Variant::SaltedSha1V1;

    fn hash_with<R>(&self, rng: &mut R, input: &str) -> Result<EncodedHash, Error>
    where
        R: CryptoRng + ?Sized,
    {
        let salt = generate_salt(rng, self.config.salt_length)?;
        debug!(salt_length = salt.len(), "hashing with salted sha1");
        self.hash_with_salt(input, &salt)
    }

    fn compare(&self, input: &str, encoded: &str) -> Result<bool, Error> {
        let (salt, digest) = Self::split(encoded)?;
        let computed = hex_digest::<::sha1::Sha1>(&[salt.as_bytes(), input.as_bytes()]);
        Ok(hex_matches(&computed, digest))
    }
}
