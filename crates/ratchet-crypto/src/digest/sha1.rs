use rand::CryptoRng;

use super::{hex_digest, hex_matches};
use crate::{
    algorithm::Algorithm,
    error::Error,
    format::{EncodedHash, Variant},
};

/// Unsalted SHA-1, stored as 40 hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1;

impl Sha1 {
    #[must_use]
    pub fn digest_hex(input: &str) -> String {
        hex_digest::<::sha1::Sha1>(&[input.as_bytes()])
    }
}

impl Algorithm for Sha1 {
    const VARIANT: Variant = Variant::LegacySha1Raw;

    fn hash_with<R>(&self, _rng: &mut R, input: &str) -> Result<EncodedHash, Error>
    where
        R: CryptoRng + ?Sized,
    {
        Ok(EncodedHash::new(Self::VARIANT, Self::digest_hex(input)))
    }

    fn compare(&self, input: &str, encoded: &str) -> Result<bool, Error> {
        Ok(hex_matches(&Self::digest_hex(input), encoded))
    }
}
