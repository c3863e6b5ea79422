use rand::CryptoRng;

use super::{hex_digest, hex_matches};
use crate::{
    algorithm::Algorithm,
    error::Error,
    format::{EncodedHash, Variant},
};

/// Unsalted MD5, stored as 32 hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5;

impl Md5 {
    #[must_use]
    pub fn digest_hex(input: &str) -> String {
        hex_digest::<::md5::Md5>(&[input.as_bytes()])
    }
}

impl Algorithm for Md5 {
    const VARIANT: Variant = Variant::LegacyMd5Raw;

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
