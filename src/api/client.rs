//! HTTP Game Client
//!
//! reqwest-backed implementation of `GameApi` against the wallet and game
//! domains. One client, one immutable header set built at construction
//! (the bearer token is threaded in once and never mutated afterwards).
//! Loosely-shaped payloads are picked field-by-field out of
//! `serde_json::Value` rather than failing on the first surprise.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::types::{ClaimOutcome, GameApi, LeaderboardStanding, Mission, PlayerProfile, PlayerState};

use super::error::ApiError;
use super::{
    BASE_GAME, BASE_WALLET, GAME_BUY_HEART, GAME_CLAIM, GAME_LEADERBOARD, GAME_LOGIN,
    GAME_MISSIONS, GAME_MISSION_CLAIM, GAME_MISSION_VERIFY, GAME_SESSION_START, GAME_STATE,
    GAME_UPGRADE, WALLET_LOGIN, WALLET_REFERRAL, WALLET_TRACK,
};

const ORIGIN_URL: &str = "https://pan-wallet.pawwallet.app";
const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                  (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// HTTP client for the wallet + game APIs.
pub struct HttpGameClient {
    wallet_base: String,
    game_base: String,
    http: Client,
}

impl HttpGameClient {
    /// Build a client authenticated with `token` against the production
    /// API domains.
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_bases(token, BASE_WALLET, BASE_GAME)
    }

    /// Build a client against explicit base URLs.
    pub fn with_bases(token: &str, wallet_base: &str, game_base: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static(ORIGIN_URL));
        headers.insert(REFERER, HeaderValue::from_static("https://pan-wallet.pawwallet.app/"));
        headers.insert(USER_AGENT, HeaderValue::from_static(UA));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(token).map_err(|_| ApiError::Payload {
                path: "<auth token>".to_string(),
                detail: "token contains non-header characters".to_string(),
            })?,
        );

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            wallet_base: wallet_base.to_string(),
            game_base: game_base.to_string(),
            http,
        })
    }

    /// Send a request and unwrap the `{success, data, message}` envelope.
    /// Non-success statuses become `ApiError::Status` with the server's
    /// `message` field pulled out of the body when it has one.
    async fn request(
        &self,
        method: &'static str,
        base: &str,
        path: &str,
        body: Option<Value>,
        query: Option<&[(&str, &str)]>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", base, path);

        let mut builder = match method {
            "GET" => self.http.get(&url),
            _ => self.http.post(&url),
        };
        if let Some(q) = query {
            builder = builder.query(q);
        }
        if let Some(b) = body {
            builder = builder.json(&b);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(text);
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        Ok(resp.json().await?)
    }

    fn payload_error(path: &str, detail: &str) -> ApiError {
        ApiError::Payload {
            path: path.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Parse the `/missions` envelope. A `data` field that is not an array
/// (or entries missing their id/status) degrade with a warn instead of
/// failing the cycle.
pub fn parse_mission_list(envelope: &Value) -> Vec<Mission> {
    let entries = match envelope["data"].as_array() {
        Some(arr) => arr,
        None => {
            warn!(
                "Invalid missions response shape, treating as empty: {}",
                envelope
            );
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| {
            let mission = Mission::from_value(entry);
            if mission.is_none() {
                warn!("Skipping invalid mission entry: {}", entry);
            }
            mission
        })
        .collect()
}

#[async_trait]
impl GameApi for HttpGameClient {
    async fn track_wallet(&self) -> Result<(), ApiError> {
        self.request(
            "POST",
            &self.wallet_base,
            WALLET_TRACK,
            Some(serde_json::json!({ "type": "create" })),
            None,
        )
        .await?;
        Ok(())
    }

    async fn wallet_login(&self) -> Result<String, ApiError> {
        let result = self
            .request("POST", &self.wallet_base, WALLET_LOGIN, Some(serde_json::json!({})), None)
            .await?;

        result["data"]["walletAddress"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| Self::payload_error(WALLET_LOGIN, "missing data.walletAddress"))
    }

    async fn game_login(&self, wallet_address: &str) -> Result<PlayerProfile, ApiError> {
        let result = self
            .request(
                "POST",
                &self.game_base,
                GAME_LOGIN,
                Some(serde_json::json!({ "walletAddress": wallet_address })),
                None,
            )
            .await?;

        let player = &result["data"]["player"];
        Ok(PlayerProfile {
            user_id: player["userId"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| player["userId"].to_string()),
            username: player["username"].as_str().unwrap_or("").to_string(),
        })
    }

    async fn game_state(&self) -> Result<PlayerState, ApiError> {
        let result = self
            .request("GET", &self.game_base, GAME_STATE, None, None)
            .await?;

        serde_json::from_value(result["data"]["player"].clone())
            .map_err(|e| Self::payload_error(GAME_STATE, &format!("bad player snapshot: {}", e)))
    }

    async fn buy_heart(&self) -> Result<u32, ApiError> {
        let result = self
            .request(
                "POST",
                &self.game_base,
                GAME_BUY_HEART,
                Some(serde_json::json!({ "quantity": 1 })),
                None,
            )
            .await?;

        Ok(result["data"]["player"]["hearts"].as_u64().unwrap_or(0) as u32)
    }

    async fn start_session(&self, wallet_address: &str) -> Result<(), ApiError> {
        self.request(
            "POST",
            &self.game_base,
            GAME_SESSION_START,
            Some(serde_json::json!({ "walletAddress": wallet_address })),
            None,
        )
        .await?;
        Ok(())
    }

    async fn upgrade(&self, wallet_address: &str) -> Result<(), ApiError> {
        self.request(
            "POST",
            &self.game_base,
            GAME_UPGRADE,
            Some(serde_json::json!({ "walletAddress": wallet_address })),
            None,
        )
        .await?;
        Ok(())
    }

    async fn missions(&self) -> Result<Vec<Mission>, ApiError> {
        let result = self
            .request("GET", &self.game_base, GAME_MISSIONS, None, None)
            .await?;
        Ok(parse_mission_list(&result))
    }

    async fn verify_mission(&self, mission_id: i64) -> Result<(), ApiError> {
        self.request(
            "POST",
            &self.game_base,
            GAME_MISSION_VERIFY,
            Some(serde_json::json!({ "missionId": mission_id })),
            None,
        )
        .await?;
        Ok(())
    }

    async fn claim_mission(&self, mission_id: i64) -> Result<f64, ApiError> {
        let result = self
            .request(
                "POST",
                &self.game_base,
                GAME_MISSION_CLAIM,
                Some(serde_json::json!({ "missionId": mission_id, "code": "" })),
                None,
            )
            .await?;

        Ok(result["data"]["reward"].as_f64().unwrap_or(0.0))
    }

    async fn claim_gold(&self) -> Result<ClaimOutcome, ApiError> {
        let result = self
            .request(
                "POST",
                &self.game_base,
                GAME_CLAIM,
                Some(serde_json::json!({})),
                None,
            )
            .await?;

        Ok(ClaimOutcome {
            claimed_gold: result["data"]["claimedGold"].as_f64().unwrap_or(0.0),
            balance: result["data"]["player"]["balance"].as_f64().unwrap_or(0.0),
        })
    }

    async fn leaderboard(&self) -> Result<LeaderboardStanding, ApiError> {
        let result = self
            .request("GET", &self.game_base, GAME_LEADERBOARD, None, None)
            .await?;

        Ok(LeaderboardStanding {
            position: result["data"]["yourPosition"].as_u64().unwrap_or(0),
            total_gold: result["data"]["yourTotalGold"].as_f64().unwrap_or(0.0),
        })
    }

    async fn referral_total(&self) -> Result<u64, ApiError> {
        let result = self
            .request(
                "GET",
                &self.wallet_base,
                WALLET_REFERRAL,
                None,
                Some(&[("page", "1"), ("size", "100")]),
            )
            .await?;

        Ok(result["data"]["total"].as_u64().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MissionStatus;

    #[test]
    fn test_client_rejects_non_header_token() {
        let err = HttpGameClient::new("bad\ntoken");
        assert!(err.is_err());
    }

    #[test]
    fn test_client_builds_with_plain_token() {
        assert!(HttpGameClient::new("Bearer abc123").is_ok());
    }

    #[test]
    fn test_non_array_mission_payload_yields_empty_list() {
        let envelope = serde_json::json!({ "success": true, "data": { "oops": 1 } });
        assert!(parse_mission_list(&envelope).is_empty());

        let envelope = serde_json::json!({ "success": false });
        assert!(parse_mission_list(&envelope).is_empty());
    }

    #[test]
    fn test_mission_list_drops_invalid_entries() {
        let envelope = serde_json::json!({
            "success": true,
            "data": [
                { "id": 1, "name": "Follow on X", "status": "in_progress" },
                { "name": "no id or status" },
                { "id": 2, "status": "completed" }
            ]
        });

        let missions = parse_mission_list(&envelope);
        assert_eq!(missions.len(), 2);
        assert_eq!(missions[0].id, 1);
        assert_eq!(missions[0].status, MissionStatus::InProgress);
        assert_eq!(missions[1].id, 2);
    }
}
