//! Steam account identifiers.
//!
//! Steam uses two encodings of the same account: the 64-bit community ID
//! (`loginusers.vdf`, `config.vdf`) and the 32-bit account ID (directory
//! names under `userdata/`). They differ by a fixed offset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SteamError;

/// Steam64 ID of account 0 in the public universe.
pub const STEAM64_BASE: u64 = 76_561_197_960_265_728;

/// A Steam account ID, stored in its Steam64 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(u64);

impl SteamId {
    pub fn from_steam64(id: u64) -> Self {
        Self(id)
    }

    pub fn from_steam32(id: u32) -> Self {
        Self(STEAM64_BASE + u64::from(id))
    }

    pub fn steam64(self) -> u64 {
        self.0
    }

    /// Returns the 32-bit account ID (the `userdata/` directory name).
    pub fn steam32(self) -> Result<u32, SteamError> {
        self.0
            .checked_sub(STEAM64_BASE)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| SteamError::InvalidSteamId(self.0.to_string()))
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts either encoding; values below [`STEAM64_BASE`] are Steam32.
impl FromStr for SteamId {
    type Err = SteamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: u64 = s
            .trim()
            .parse()
            .map_err(|_| SteamError::InvalidSteamId(s.to_owned()))?;
        if v >= STEAM64_BASE {
            Ok(Self(v))
        } else {
            u32::try_from(v)
                .map(Self::from_steam32)
                .map_err(|_| SteamError::InvalidSteamId(s.to_owned()))
        }
    }
}

/// Converts a Steam64 string to its Steam32 string.
pub fn steam64_to_steam32(steam64: &str) -> Result<String, SteamError> {
    let v: u64 = steam64
        .trim()
        .parse()
        .map_err(|_| SteamError::InvalidSteamId(steam64.to_owned()))?;
    Ok(SteamId::from_steam64(v).steam32()?.to_string())
}

/// Converts a Steam32 string to its Steam64 string.
pub fn steam32_to_steam64(steam32: &str) -> Result<String, SteamError> {
    let v: u32 = steam32
        .trim()
        .parse()
        .map_err(|_| SteamError::InvalidSteamId(steam32.to_owned()))?;
    Ok(SteamId::from_steam32(v).to_string())
}
