//! Client capability tiers.
//!
//! A tier is chosen from the identifying strings a client sends (user agent,
//! device description). Each tier owns a direct-play table and, optionally,
//! a transcode policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tc_core::{Error, Result};

use crate::planner::{TranscodePolicy, CONSOLE_POLICY};
use crate::playable::{PlayableRow, CONSOLE_ROWS};

/// Closed set of client capability tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientTier {
    /// Game console media extender.
    Console,
    /// Any other renderer.
    #[default]
    Common,
}

/// Case-sensitive substrings that select a tier.
const TIER_TOKENS: &[(&str, ClientTier)] = &[("Xbox", ClientTier::Console)];

impl ClientTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Common => "common",
        }
    }

    /// Rows any of which makes a source playable as-is.
    pub fn playable_rows(&self) -> &'static [PlayableRow] {
        match self {
            Self::Console => CONSOLE_ROWS,
            Self::Common => &[],
        }
    }

    /// How sources are transcoded for this tier, if at all.
    pub fn transcode_policy(&self) -> Option<&'static TranscodePolicy> {
        match self {
            Self::Console => Some(&CONSOLE_POLICY),
            // Common renderers are served the catalog description only.
            Self::Common => None,
        }
    }
}

impl fmt::Display for ClientTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "common" => Ok(Self::Common),
            other => Err(Error::Validation(format!("unknown client tier '{other}'"))),
        }
    }
}

/// Pick a tier from identifying strings.
///
/// The first string, in input order, containing a known token decides.
/// Without a match the tier is [`ClientTier::Common`].
pub fn resolve_client_tier<S: AsRef<str>>(strings: &[S]) -> ClientTier {
    strings
        .iter()
        .find_map(|s| {
            let s = s.as_ref();
            TIER_TOKENS
                .iter()
                .find(|(token, _)| s.contains(token))
                .map(|(_, tier)| *tier)
        })
        .unwrap_or_default()
}
