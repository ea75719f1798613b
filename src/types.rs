//! PawMiner - Type Definitions
//!
//! Shared types for the mining bot: server-authoritative snapshots,
//! mission records, and the `GameApi` trait every cycle component
//! talks through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::error::ApiError;

// ─── Player ──────────────────────────────────────────────────────

/// Server-authoritative player snapshot from `GET /game`.
///
/// Never mutated locally: every decision re-fetches a fresh copy, and all
/// timing arithmetic uses the server clock fields below, never anything
/// remembered across a restart.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    #[serde(default)]
    pub level: u32,
    /// Resource units accumulated per second.
    #[serde(default)]
    pub mining_speed: f64,
    /// Maximum accumulable amount before a claim is required.
    #[serde(default)]
    pub bag_cap: f64,
    #[serde(default)]
    pub hearts: u32,
    /// Buffer content as of `last_accumulate_time`.
    #[serde(default)]
    pub unclaimed_gold: f64,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_accumulate_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_session_start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_session_end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub upgrade_complete_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub balance: f64,
}

impl PlayerState {
    /// Whether the player is inside a server-tracked session at `now`.
    /// Requires both session timestamps; a missing one means no session.
    pub fn session_active(&self, now: DateTime<Utc>) -> bool {
        match (self.last_session_start_time, self.last_session_end_time) {
            (Some(_), Some(end)) => now < end,
            _ => false,
        }
    }

    /// Whether an upgrade is still running at `now`.
    pub fn upgrade_running(&self, now: DateTime<Utc>) -> bool {
        matches!(self.upgrade_complete_time, Some(done) if now < done)
    }
}

/// Parse an optional RFC 3339 timestamp, treating unparseable values as
/// absent so a bad server field degrades to "no timestamp" instead of
/// failing the whole snapshot.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Identity returned by the game login.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub user_id: String,
    pub username: String,
}

// ─── Missions ────────────────────────────────────────────────────

/// Mission id the server reserves for the "invite friends" task.
/// Only processed when the account has at least one referral.
pub const INVITE_MISSION_ID: i64 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    NotStarted,
    InProgress,
    Completed,
    Claimed,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mission {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub status: MissionStatus,
}

impl Mission {
    /// Lenient parse of a single mission list entry. Entries missing an
    /// `id` or `status` are dropped by the caller rather than failing the
    /// whole list.
    pub fn from_value(value: &serde_json::Value) -> Option<Mission> {
        let id = value.get("id")?.as_i64()?;
        let status: MissionStatus =
            serde_json::from_value(value.get("status")?.clone()).ok()?;
        let name = value
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("Unknown")
            .to_string();
        Some(Mission { id, name, status })
    }
}

// ─── Cycle results ───────────────────────────────────────────────

/// Outcome of claiming the accumulated gold.
#[derive(Clone, Debug)]
pub struct ClaimOutcome {
    pub claimed_gold: f64,
    pub balance: f64,
}

/// Leaderboard standing, reported at the end of each cycle.
#[derive(Clone, Debug)]
pub struct LeaderboardStanding {
    pub position: u64,
    pub total_gold: f64,
}

// ─── GameApi ─────────────────────────────────────────────────────

/// The full wallet + game API surface the bot drives. One method per
/// remote operation; implemented over HTTP by `api::client::HttpGameClient`
/// and by an in-memory mock in tests.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// `POST wallet /wallet/track` with `{type:"create"}`. Side-effect only.
    async fn track_wallet(&self) -> Result<(), ApiError>;

    /// `POST wallet /login`. Returns the wallet address.
    async fn wallet_login(&self) -> Result<String, ApiError>;

    /// `POST game /login`. 404 means the game account does not exist yet.
    async fn game_login(&self, wallet_address: &str) -> Result<PlayerProfile, ApiError>;

    /// `GET game /game`. Fresh player snapshot.
    async fn game_state(&self) -> Result<PlayerState, ApiError>;

    /// `POST game /player/buy-heart` with quantity 1. Returns the new
    /// heart count. A 500 here is a known transient fault.
    async fn buy_heart(&self) -> Result<u32, ApiError>;

    /// `POST game /player/start-session`. `PLAYER_ALREADY_IN_SESSION`
    /// is a conflict, not a failure.
    async fn start_session(&self, wallet_address: &str) -> Result<(), ApiError>;

    /// `POST game /player/upgrade`. `UPGRADE_IN_PROGRESS` is a conflict.
    async fn upgrade(&self, wallet_address: &str) -> Result<(), ApiError>;

    /// `GET game /missions`. A malformed (non-array) payload degrades to
    /// an empty list rather than an error.
    async fn missions(&self) -> Result<Vec<Mission>, ApiError>;

    /// `POST game /missions/verify`.
    async fn verify_mission(&self, mission_id: i64) -> Result<(), ApiError>;

    /// `POST game /missions/claim`. Returns the reward amount.
    async fn claim_mission(&self, mission_id: i64) -> Result<f64, ApiError>;

    /// `POST game /player/claim`. Claims the accumulated gold.
    async fn claim_gold(&self) -> Result<ClaimOutcome, ApiError>;

    /// `GET game /game/leaderboard`.
    async fn leaderboard(&self) -> Result<LeaderboardStanding, ApiError>;

    /// `GET wallet /referral/invited`. Total number of invited accounts.
    async fn referral_total(&self) -> Result<u64, ApiError>;
}
