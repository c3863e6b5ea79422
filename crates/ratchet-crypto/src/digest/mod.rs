//! Plain and salted message digests kept for hashes created by older releases.

use sha2::Digest;

use crate::eq::ConstantTimeEq;

pub mod md5;
pub mod sha1;
pub mod ssha1;

pub use self::{md5::Md5, sha1::Sha1, ssha1::SaltedSha1};

/// Lowercase hex digest over the concatenation of `parts`.
pub(crate) fn hex_digest<D: Digest>(parts: &[&[u8]]) -> String {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    const_hex::encode(hasher.finalize())
}

/// Compare a freshly computed lowercase hex digest with a stored one.
/// Stored digests are accepted in either case.
pub(crate) fn hex_matches(computed: &str, stored: &str) -> bool {
    computed.ct_eq(&stored.to_ascii_lowercase())
}
