//! crates/sc_core/src/entities.rs
//! Synthetic voters and candidates, plus the categorical demographic domains.
//! Entities are immutable once generated; nothing in the engine mutates them
//! after construction.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{CandidateId, VoterId};

/// Define a categorical domain with explicit wire tokens.
macro_rules! wire_enum {
    ($(#[$m:meta])* $name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$m])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self { $($name::$variant => $token),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

wire_enum!(Gender => { Male = "male", Female = "female" });

wire_enum!(Region => { Urban = "urban", Suburban = "suburban", Rural = "rural" });

wire_enum!(Income => { Low = "low", Middle = "middle", High = "high" });

wire_enum!(Education => {
    NoDiploma  = "none",
    HighSchool = "high_school",
    Bachelor   = "bachelor",
    Master     = "master",
    Phd        = "phd",
});

wire_enum!(Employment => {
    Employed     = "employed",
    Unemployed   = "unemployed",
    SelfEmployed = "self_employed",
    Retired      = "retired",
});

wire_enum!(FamilyStatus => {
    Single       = "single",
    WithChildren = "with_children",
    Retired      = "retired",
});

wire_enum!(Ethnicity => { Native = "native", Immigrant = "immigrant" });

wire_enum!(Religion => { Religious = "religious", NonReligious = "non_religious" });

impl Education {
    /// Master or doctorate.
    #[inline]
    pub fn is_advanced(self) -> bool {
        matches!(self, Education::Master | Education::Phd)
    }
}

/// One fully populated demographic record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Demographics {
    pub age: u32,
    pub gender: Gender,
    pub region: Region,
    pub income: Income,
    pub education: Education,
    pub employment_status: Employment,
    pub family_status: FamilyStatus,
    pub ethnicity_immigration: Ethnicity,
    pub religion: Religion,
}

impl Demographics {
    /// Attribute/value pairs under the names influence weights are keyed by.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("age", self.age.to_string()),
            ("gender", self.gender.as_str().to_string()),
            ("region", self.region.as_str().to_string()),
            ("income", self.income.as_str().to_string()),
            ("education", self.education.as_str().to_string()),
            ("employment_status", self.employment_status.as_str().to_string()),
            ("family_status", self.family_status.as_str().to_string()),
            ("ethnicity_immigration", self.ethnicity_immigration.as_str().to_string()),
            ("religion", self.religion.as_str().to_string()),
        ]
    }
}

/// Synthetic voter. `issue_priorities` sum to ≈1.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Voter {
    pub id: VoterId,
    pub demographics: Demographics,
    pub issue_priorities: BTreeMap<String, f64>,
    pub political_lean: f64,
    pub party_loyalty: f64,
    pub preferred_party: String,
    pub mood: f64,
    pub likelihood_to_vote: f64,
}

/// Candidate with policy positions in [0, 1] per issue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    pub party_lean: f64,
    pub policies: BTreeMap<String, f64>,
    pub charisma: f64,
    pub scandals: u32,
    pub campaign_funds: f64,
    pub experience: u32,
    pub popularity: f64,
}
