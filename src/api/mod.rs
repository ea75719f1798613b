//! Wallet + Game API
//!
//! HTTP boundary for the two PawWallet service domains. `client` holds
//! the reqwest-backed `GameApi` implementation, `error` the boundary
//! error type.

pub mod client;
pub mod error;

/// Wallet-domain API base.
pub const BASE_WALLET: &str = "https://pan-wallet-api.pawwallet.app/api/v1";
/// Game-domain API base.
pub const BASE_GAME: &str = "https://robot-cat-game-api.pawwallet.app/api/v1";

// Wallet domain paths.
pub const WALLET_TRACK: &str = "/wallet/track";
pub const WALLET_LOGIN: &str = "/login";
pub const WALLET_REFERRAL: &str = "/referral/invited";

// Game domain paths.
pub const GAME_LOGIN: &str = "/login";
pub const GAME_STATE: &str = "/game";
pub const GAME_SESSION_START: &str = "/player/start-session";
pub const GAME_UPGRADE: &str = "/player/upgrade";
pub const GAME_CLAIM: &str = "/player/claim";
pub const GAME_MISSIONS: &str = "/missions";
pub const GAME_MISSION_VERIFY: &str = "/missions/verify";
pub const GAME_MISSION_CLAIM: &str = "/missions/claim";
pub const GAME_LEADERBOARD: &str = "/game/leaderboard";
pub const GAME_BUY_HEART: &str = "/player/buy-heart";

// Server conflict markers.
pub const MSG_ALREADY_IN_SESSION: &str = "PLAYER_ALREADY_IN_SESSION";
pub const MSG_UPGRADE_IN_PROGRESS: &str = "UPGRADE_IN_PROGRESS";
