use base64::{prelude::BASE64_STANDARD, Engine};
use rand::CryptoRng;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use tracing::debug;

use super::Kdf;
use crate::{
    algorithm::Algorithm,
    config::Pbkdf2Config,
    eq::ConstantTimeEq,
    error::Error,
    format::{EncodedHash, Variant, PBKDF2_TAG},
    salt::generate_salt,
};

const SEPARATOR: char = '|';

/// Highest iteration count accepted when hashing or reading a stored hash.
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Longest derived key, in bytes, accepted when hashing or reading a stored hash.
pub const MAX_KEY_LENGTH: usize = 64;

/// HMAC digest used as the PBKDF2 pseudo-random function.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Prf {
    #[default]
    Sha256,
    Sha512,
}

/// Cost parameters for one derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub prf: Prf,
    pub iterations: u32,
}

impl Kdf for Params {
    const NAME: &'static str = "pbkdf2";

    fn derive_key(&self, password: &[u8], salt: &[u8], out: &mut [u8]) {
        match self.prf {
            Prf::Sha256 => ::pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, self.iterations, out),
            Prf::Sha512 => ::pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, self.iterations, out),
        }
    }
}

/// The fields of a stored `PBKDF2v1|prf|iterations|salt|key` hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbkdf2Hash<'a> {
    pub params: Params,
    pub salt: &'a str,
    pub key: Vec<u8>,
}

impl<'a> Pbkdf2Hash<'a> {
    /// Stored parameters are bounded by [`MAX_ITERATIONS`] and [`MAX_KEY_LENGTH`], so a
    /// corrupt hash cannot make [`Pbkdf2::compare`] arbitrarily expensive.
    ///
    /// # Errors
    /// If any field is missing, empty, unparsable or out of bounds.
    pub fn parse(encoded: &'a str) -> Result<Self, Error> {
        let fields: Vec<&str> = encoded.split(SEPARATOR).collect();
        let [tag, prf, iterations, salt, key] = fields[..] else {
            return Err(Error::malformed(Variant::Pbkdf2V1, "wrong number of fields"));
        };

        if tag != PBKDF2_TAG {
            return Err(Error::malformed(Variant::Pbkdf2V1, "missing tag"));
        }

        let prf = prf
            .parse::<Prf>()
            .map_err(|_| Error::malformed(Variant::Pbkdf2V1, "unknown prf"))?;

        let iterations: u32 = iterations.parse()?;
        if iterations == 0 {
            return Err(Error::malformed(Variant::Pbkdf2V1, "zero iterations"));
        }
        if iterations > MAX_ITERATIONS {
            return Err(Error::malformed(Variant::Pbkdf2V1, "too many iterations"));
        }

        if salt.is_empty() {
            return Err(Error::malformed(Variant::Pbkdf2V1, "empty salt"));
        }

        if key.len() > MAX_KEY_LENGTH.div_ceil(3) * 4 {
            return Err(Error::malformed(Variant::Pbkdf2V1, "key too long"));
        }
        let key = BASE64_STANDARD.decode(key)?;
        if key.is_empty() {
            return Err(Error::malformed(Variant::Pbkdf2V1, "empty key"));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(Error::malformed(Variant::Pbkdf2V1, "key too long"));
        }

        Ok(Self {
            params: Params { prf, iterations },
            salt,
            key,
        })
    }
}

/// PBKDF2 over HMAC, the current format.
#[derive(Debug, Clone, Default)]
pub struct Pbkdf2 {
    config: Pbkdf2Config,
}

impl Pbkdf2 {
    #[must_use]
    pub fn new(config: Pbkdf2Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Pbkdf2Config {
        &self.config
    }

    #[must_use]
    pub fn params(&self) -> Params {
        Params {
            prf: self.config.prf,
            iterations: self.config.iterations,
        }
    }

    /// Derive and encode with explicit salt and parameters.
    ///
    /// # Errors
    /// If the salt is empty or contains the field separator, or the key length or
    /// iteration count is zero or above its maximum.
    pub fn hash_with_params(
        input: &str,
        salt: &str,
        params: Params,
        key_length: usize,
    ) -> Result<EncodedHash, Error> {
        if salt.is_empty() || salt.contains(SEPARATOR) {
            return Err(Error::InvalidArgument(format!(
                "pbkdf2 salt must be non-empty and must not contain '{SEPARATOR}'"
            )));
        }
        if !(1..=MAX_KEY_LENGTH).contains(&key_length)
            || !(1..=MAX_ITERATIONS).contains(&params.iterations)
        {
            return Err(Error::InvalidArgument(format!(
                "pbkdf2 key length must be in 1..={MAX_KEY_LENGTH} and iterations in 1..={MAX_ITERATIONS}"
            )));
        }

        let mut key = vec![0u8; key_length];
        params.derive_key(input.as_bytes(), salt.as_bytes(), &mut key);

        Ok(EncodedHash::new(
            Self::VARIANT,
            format!(
                "{PBKDF2_TAG}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{salt}{SEPARATOR}{}",
                params.prf,
                params.iterations,
                BASE64_STANDARD.encode(&key)
            ),
        ))
    }
}

impl Algorithm for Pbkdf2 {
    const VARIANT: Variant = Variant::Pbkdf2V1;

    fn hash_with<R>(&self, rng: &mut R, input: &str) -> Result<EncodedHash, Error>
    where
        R: CryptoRng + ?Sized,
    {
        let salt = generate_salt(rng, self.config.salt_length)?;
        let params = self.params();

        debug!(
            kdf = Params::NAME,
            prf = %params.prf,
            iterations = params.iterations,
            "deriving key"
        );

        Self::hash_with_params(input, &salt, params, self.config.key_length)
    }

    fn compare(&self, input: &str, encoded: &str) -> Result<bool, Error> {
        let stored = Pbkdf2Hash::parse(encoded)?;

        let mut derived = vec![0u8; stored.key.len()];
        stored
            .params
            .derive_key(input.as_bytes(), stored.salt.as_bytes(), &mut derived);

        Ok(derived.as_slice().ct_eq(&stored.key))
    }

    /// A stored hash is stale when its prf, salt length or key length differ from the
    /// configured ones, or when it was derived with fewer iterations. A higher stored
    /// iteration count is left alone.
    fn requires_migration(&self, encoded: &str) -> Result<bool, Error> {
        let stored = Pbkdf2Hash::parse(encoded)?;

        Ok(stored.params.prf != self.config.prf
            || stored.params.iterations < self.config.iterations
            || stored.salt.len() != self.config.salt_length
            || stored.key.len() != self.config.key_length)
    }
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn fast() -> Pbkdf2 {
        Pbkdf2::new(Pbkdf2Config {
            iterations: 1000,
            ..Pbkdf2Config::default()
        })
    }

    #[test]
    fn test_sha256_vector() {
        let params = Params {
            prf: Prf::Sha256,
            iterations: 1,
        };
        let mut out = [0u8; 32];
        params.derive_key(b"password", b"salt", &mut out);
        assert_eq!(
            const_hex::encode(out),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn test_layout() -> Result<()> {
        let params = Params {
            prf: Prf::Sha256,
            iterations: 1,
        };
        let hash = Pbkdf2::hash_with_params("password", "salt", params, 32)?;

        let mut expected = [0u8; 32];
        params.derive_key(b"password", b"salt", &mut expected);

        assert_eq!(
            hash.as_str(),
            format!("PBKDF2v1|sha256|1|salt|{}", BASE64_STANDARD.encode(expected))
        );
        Ok(())
    }

    #[test]
    fn test_hash_and_compare() -> Result<()> {
        let pbkdf2 = fast();
        let hash = pbkdf2.hash_with(&mut StdRng::seed_from_u64(1), "hunter2")?;

        let parsed = Pbkdf2Hash::parse(hash.as_str())?;
        assert_eq!(parsed.params, pbkdf2.params());
        assert_eq!(parsed.salt.len(), pbkdf2.config().salt_length);
        assert_eq!(parsed.key.len(), pbkdf2.config().key_length);

        assert!(pbkdf2.compare("hunter2", hash.as_str())?);
        assert!(!pbkdf2.compare("hunter3", hash.as_str())?);
        assert!(!pbkdf2.requires_migration(hash.as_str())?);
        Ok(())
    }

    #[test]
    fn test_compare_uses_stored_params() -> Result<()> {
        let params = Params {
            prf: Prf::Sha512,
            iterations: 2,
        };
        let hash = Pbkdf2::hash_with_params("hunter2", "0123456789abcdef0123", params, 16)?;

        let pbkdf2 = fast();
        assert!(pbkdf2.compare("hunter2", hash.as_str())?);
        assert!(pbkdf2.requires_migration(hash.as_str())?);
        Ok(())
    }

    #[test]
    fn test_migration_policy() -> Result<()> {
        let pbkdf2 = fast();
        let config = pbkdf2.config().clone();
        let salt = "0".repeat(config.salt_length);

        let current = Params {
            prf: config.prf,
            iterations: config.iterations,
        };
        let hash = Pbkdf2::hash_with_params("pw", &salt, current, config.key_length)?;
        assert!(!pbkdf2.requires_migration(hash.as_str())?);

        let stronger = Params {
            iterations: config.iterations + 1,
            ..current
        };
        let hash = Pbkdf2::hash_with_params("pw", &salt, stronger, config.key_length)?;
        assert!(!pbkdf2.requires_migration(hash.as_str())?);

        let weaker = Params {
            iterations: config.iterations - 1,
            ..current
        };
        let hash = Pbkdf2::hash_with_params("pw", &salt, weaker, config.key_length)?;
        assert!(pbkdf2.requires_migration(hash.as_str())?);

        let hash = Pbkdf2::hash_with_params("pw", "0000", current, config.key_length)?;
        assert!(pbkdf2.requires_migration(hash.as_str())?);

        let hash = Pbkdf2::hash_with_params("pw", &salt, current, config.key_length + 1)?;
        assert!(pbkdf2.requires_migration(hash.as_str())?);
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            "PBKDF2v1$10000$abc123",
            "PBKDF2v1|sha256|10000|salt",
            "PBKDF2v1|md4|10000|salt|AAAA",
            "PBKDF2v1|sha256|many|salt|AAAA",
            "PBKDF2v1|sha256|0|salt|AAAA",
            "PBKDF2v1|sha256|10000||AAAA",
            "PBKDF2v1|sha256|10000|salt|!!!!",
            "PBKDF2v1|sha256|10000|salt|",
            "PBKDF2v1|sha256|10000|salt|AAAA|extra",
            "PBKDF2v2|sha256|10000|salt|AAAA",
        ];

        for case in cases {
            assert!(Pbkdf2Hash::parse(case).is_err(), "{case} should not parse");
        }
    }

    #[test]
    fn test_parse_rejects_unbounded_cost() {
        let at_limit = format!(
            "PBKDF2v1|sha256|{MAX_ITERATIONS}|salt|{}",
            BASE64_STANDARD.encode([0u8; MAX_KEY_LENGTH])
        );
        assert!(Pbkdf2Hash::parse(&at_limit).is_ok());

        let cases = [
            format!("PBKDF2v1|sha256|{}|salt|AAAA", u32::MAX),
            format!("PBKDF2v1|sha256|{}|salt|AAAA", MAX_ITERATIONS + 1),
            format!(
                "PBKDF2v1|sha256|10000|salt|{}",
                BASE64_STANDARD.encode([0u8; MAX_KEY_LENGTH + 1])
            ),
            format!(
                "PBKDF2v1|sha256|10000|salt|{}",
                BASE64_STANDARD.encode(vec![0u8; 300_000])
            ),
        ];

        for case in &cases {
            assert!(
                matches!(
                    Pbkdf2Hash::parse(case),
                    Err(Error::Malformed {
                        variant: Variant::Pbkdf2V1,
                        ..
                    })
                ),
                "{}-byte hash should be malformed",
                case.len()
            );
            assert!(fast().compare("pw", case).is_err());
        }
    }

    #[test]
    fn test_invalid_params() {
        let params = Params {
            prf: Prf::Sha256,
            iterations: 1,
        };
        assert!(Pbkdf2::hash_with_params("pw", "a|b", params, 32).is_err());
        assert!(Pbkdf2::hash_with_params("pw", "", params, 32).is_err());
        assert!(Pbkdf2::hash_with_params("pw", "salt", params, 0).is_err());
        assert!(Pbkdf2::hash_with_params("pw", "salt", params, MAX_KEY_LENGTH + 1).is_err());

        let params = Params {
            iterations: MAX_ITERATIONS + 1,
            ..params
        };
        assert!(Pbkdf2::hash_with_params("pw", "salt", params, 32).is_err());
    }
}
