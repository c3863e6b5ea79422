use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const PBKDF2_TAG: &str = "PBKDF2v1";
pub const SALTED_SHA1_TAG: &str = "SSHA1Xv1";

/// Every tag is exactly this many bytes; detection never looks further into the string.
pub const TAG_LEN: usize = 8;

pub const SHA1_HEX_LEN: usize = 40;
pub const MD5_HEX_LEN: usize = 32;

/// A known hash encoding family and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Variant {
    Pbkdf2V1,
    SaltedSha1V1,
    LegacySha1Raw,
    LegacyMd5Raw,
}

impl Variant {
    /// Prefix written in front of the payload. Legacy raw digests have none.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Variant::Pbkdf2V1 => PBKDF2_TAG,
            Variant::SaltedSha1V1 => SALTED_SHA1_TAG,
            Variant::LegacySha1Raw | Variant::LegacyMd5Raw => "",
        }
    }

    #[must_use]
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            Variant::LegacySha1Raw => Some(SHA1_HEX_LEN),
            Variant::LegacyMd5Raw => Some(MD5_HEX_LEN),
            Variant::Pbkdf2V1 | Variant::SaltedSha1V1 => None,
        }
    }

    /// Whether the encoding embeds a salt (and, for PBKDF2, an iteration count).
    #[must_use]
    pub const fn is_salted(self) -> bool {
        matches!(self, Variant::Pbkdf2V1 | Variant::SaltedSha1V1)
    }

    /// Only the current format may ever be considered up to date.
    #[must_use]
    pub const fn is_current(self) -> bool {
        matches!(self, Variant::Pbkdf2V1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Known(Variant),
    Unrecognized,
}

impl Classification {
    #[must_use]
    pub fn variant(self) -> Option<Variant> {
        match self {
            Classification::Known(variant) => Some(variant),
            Classification::Unrecognized => None,
        }
    }

    #[must_use]
    pub fn is_recognized(self) -> bool {
        matches!(self, Classification::Known(_))
    }
}

/// Recognise the format of a stored hash.
///
/// Rules apply in order and the first match wins:
/// 1. tag `PBKDF2v1`
/// 2. tag `SSHA1Xv1`
/// 3. 40 bytes long, legacy SHA-1
/// 4. 32 bytes long, legacy MD5
///
/// Anything else is [`Classification::Unrecognized`]. Never panics, for any input.
#[must_use]
pub fn classify(hash: &str) -> Classification {
    let tag = hash.as_bytes().get(..TAG_LEN);

    if tag == Some(PBKDF2_TAG.as_bytes()) {
        Classification::Known(Variant::Pbkdf2V1)
    } else if tag == Some(SALTED_SHA1_TAG.as_bytes()) {
        Classification::Known(Variant::SaltedSha1V1)
    } else if hash.len() == SHA1_HEX_LEN {
        Classification::Known(Variant::LegacySha1Raw)
    } else if hash.len() == MD5_HEX_LEN {
        Classification::Known(Variant::LegacyMd5Raw)
    } else {
        Classification::Unrecognized
    }
}

/// A stored hash together with the variant it classifies as.
///
/// Algorithms build these when hashing; strings from storage go through
/// [`EncodedHash::from_str`] / `TryFrom<String>`, which reject unrecognised formats.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedHash {
    variant: Variant,
    value: String,
}

impl EncodedHash {
    pub(crate) fn new(variant: Variant, value: String) -> Self {
        debug_assert_eq!(classify(&value), Classification::Known(variant));
        Self { variant, value }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }
}

// Stored hashes are credentials; keep them out of debug output.
impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("variant", &self.variant)
            .field("len", &self.value.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for EncodedHash {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl TryFrom<String> for EncodedHash {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match classify(&value) {
            Classification::Known(variant) => Ok(Self { variant, value }),
            Classification::Unrecognized => Err(Error::Unrecognized),
        }
    }
}

impl FromStr for EncodedHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<EncodedHash> for String {
    fn from(value: EncodedHash) -> Self {
        value.value
    }
}
