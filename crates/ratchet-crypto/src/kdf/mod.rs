pub mod pbkdf2;

/// A password-based key derivation function with its cost parameters fixed.
pub trait Kdf {
    const NAME: &'static str;

    /// Fill `out` with key material derived from `password` and `salt`.
    fn derive_key(&self, password: &[u8], salt: &[u8], out: &mut [u8]);
}
