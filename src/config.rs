//! Bot Configuration
//!
//! Loads the bearer credential from a local text file and holds the
//! game tuning constants. The credential is read exactly once at
//! startup and is immutable for the process lifetime.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default credential file, one bearer token on a single line.
pub const DEFAULT_TOKEN_FILE: &str = "data.txt";

/// Hearts floor below which the sequencer buys one replenishment.
pub const MIN_HEARTS: u32 = 3;

/// Fixed backoff between failed cycles and failed authentications.
pub const RETRY_DELAY: Duration = Duration::from_secs(300);

/// Server-side session window length. Informational only; the skip rule
/// trusts `lastSessionEndTime`, never this constant.
pub const SESSION_DURATION: Duration = Duration::from_secs(2 * 60 * 60);

/// Read and trim the bearer token from `path`.
pub fn load_token(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read credential file {}", path.display()))?;

    let token = raw.trim().to_string();
    anyhow::ensure!(!token.is_empty(), "Credential file {} is empty", path.display());
    Ok(token)
}
