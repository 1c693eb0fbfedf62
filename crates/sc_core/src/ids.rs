//! crates/sc_core/src/ids.rs
//! Caller-supplied identifiers for candidates and voters.
//! The engine never mints ids on its own behalf: integers and strings are both
//! accepted on the wire and are held as text, so `7` and `"7"` name the same
//! candidate.

use core::fmt;
use core::str::FromStr;

use smol_str::SmolStr;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

const MAX_ID_LEN: usize = 128;

#[inline]
fn is_valid_id(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_ID_LEN && !s.bytes().any(|b| b == 0)
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

macro_rules! caller_id_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(SmolStr);

        impl $name {
            #[inline]
            pub fn new(s: &str) -> Result<Self, CoreError> {
                if is_valid_id(s) { Ok(Self(SmolStr::new(s))) } else { Err(CoreError::InvalidId) }
            }
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(n: u64) -> Self { Self(SmolStr::new(n.to_string())) }
        }

        #[cfg(feature = "serde")]
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                match RawId::deserialize(d)? {
                    RawId::Int(n) => Ok(Self(SmolStr::new(n.to_string()))),
                    RawId::Text(s) => Self::new(&s).map_err(D::Error::custom),
                }
            }
        }
    };
}

caller_id_newtype!(
    /// Candidate identifier as supplied by the caller.
    CandidateId
);

caller_id_newtype!(
    /// Voter identifier as supplied by the caller (or the voter's index in a
    /// synthetic population).
    VoterId
);
