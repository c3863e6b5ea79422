use rand::CryptoRng;

use crate::error::Error;

/// Longest salt that may be requested, in hex characters.
pub const MAX_SALT_LENGTH: usize = 40;

/// Generate `length` lowercase hex characters from `rng`.
///
/// # Errors
/// Returns `Error::InvalidArgument` if `length` is zero or above [`MAX_SALT_LENGTH`].
pub fn generate_salt<R>(rng: &mut R, length: usize) -> Result<String, Error>
where
    R: CryptoRng + ?Sized,
{
    if length == 0 || length > MAX_SALT_LENGTH {
        return Err(Error::InvalidArgument(format!(
            "salt length must be between 1 and {MAX_SALT_LENGTH}, got {length}"
        )));
    }

    let mut bytes = vec![0u8; length.div_ceil(2)];
    rng.fill_bytes(&mut bytes);

    let mut salt = const_hex::encode(bytes);
    salt.truncate(length);
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_length_and_charset() {
        let mut rng = rand::rng();
        for length in 1..=MAX_SALT_LENGTH {
            let salt = generate_salt(&mut rng, length).unwrap();
            assert_eq!(salt.len(), length);
            assert!(salt
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_consecutive_calls_differ() {
        let mut rng = rand::rng();
        let a = generate_salt(&mut rng, 16).unwrap();
        let b = generate_salt(&mut rng, 16).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let a = generate_salt(&mut StdRng::seed_from_u64(42), 20).unwrap();
        let b = generate_salt(&mut StdRng::seed_from_u64(42), 20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_length() {
        let mut rng = rand::rng();
        assert!(matches!(
            generate_salt(&mut rng, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            generate_salt(&mut rng, MAX_SALT_LENGTH + 1),
            Err(Error::InvalidArgument(_))
        ));
    }
}
