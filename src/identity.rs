//! Canonical user identifiers.

use std::{ops::Deref, str::FromStr};

use derive_more::Display;

use crate::error::Error;

/// Canonical Steam identifier: the digit-only portion of a validated
/// claimed identity url, e.g. `76561197960435530`.
///
/// Derefs and displays as the plain digit string, which is what callers
/// hand to session storage or to [`crate::player::get_player_summary`].
#[derive(Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("{value}")]
#[non_exhaustive]
pub struct SteamId {
    value: String,
}

impl SteamId {
    /// Extracts the identifier by stripping every non-digit character
    /// from a claimed identity url.
    ///
    /// Deterministic and idempotent. Callers must have matched the url
    /// against the provider identity pattern first; nothing else in the
    /// url carries digits, so what remains is exactly the id.
    pub(crate) fn extracted_from(claimed_id: &str) -> Self {
        Self {
            value: claimed_id.chars().filter(char::is_ascii_digit).collect(),
        }
    }
}

impl Deref for SteamId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl FromStr for SteamId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !(15..=25).contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidIdPattern);
        }

        Ok(Self { value: s.into() })
    }
}
