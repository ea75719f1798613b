//! Progression Sequencer
//!
//! Advances the dependent game actions in fixed order: hearts ->
//! session -> upgrade. Each step re-fetches the server snapshot and
//! applies its skip rule against the server clock, so nothing is ever
//! decided from stale local state. Conflicts ("already in session",
//! "upgrade in progress") count as success; the heart-purchase 500 is
//! a transient fault that only costs this cycle's replenishment.

use chrono::Utc;
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::{MSG_ALREADY_IN_SESSION, MSG_UPGRADE_IN_PROGRESS};
use crate::config::MIN_HEARTS;
use crate::types::GameApi;

/// Run one sequencer pass. Any non-conflict, non-transient failure
/// aborts the pass and propagates.
pub async fn run(api: &dyn GameApi, wallet_address: &str) -> Result<(), ApiError> {
    ensure_hearts(api).await?;
    ensure_session(api, wallet_address).await?;
    ensure_upgrade(api, wallet_address).await?;
    Ok(())
}

/// Buy one heart if the count has dropped below the floor. A server 500
/// here means the shop is temporarily unavailable; skip replenishment
/// this cycle instead of failing.
pub async fn ensure_hearts(api: &dyn GameApi) -> Result<(), ApiError> {
    let state = api.game_state().await?;
    if state.hearts >= MIN_HEARTS {
        return Ok(());
    }

    match api.buy_heart().await {
        Ok(count) => info!("Purchased a heart, new count: {}", count),
        Err(e) if e.is_status(500) => {
            warn!("Heart purchase temporarily unavailable, skipping: {}", e);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Start a session unless the server already shows one running.
pub async fn ensure_session(api: &dyn GameApi, wallet_address: &str) -> Result<(), ApiError> {
    let state = api.game_state().await?;
    if state.session_active(Utc::now()) {
        if let Some(end) = state.last_session_end_time {
            info!("Session already active until {}, keeping it", end);
        }
        return Ok(());
    }

    match api.start_session(wallet_address).await {
        Ok(()) => info!("New session started for 2 hours"),
        Err(e) if e.has_message(MSG_ALREADY_IN_SESSION) => {
            info!("Server reports an active session, continuing with it");
            api.game_state().await?;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Request an upgrade unless one is already running.
pub async fn ensure_upgrade(api: &dyn GameApi, wallet_address: &str) -> Result<(), ApiError> {
    let state = api.game_state().await?;
    if state.upgrade_running(Utc::now()) {
        if let Some(done) = state.upgrade_complete_time {
            info!("Upgrade already in progress, completing at {}", done);
        }
        return Ok(());
    }

    match api.upgrade(wallet_address).await {
        Ok(()) => info!("Player upgrade started"),
        Err(e) if e.has_message(MSG_UPGRADE_IN_PROGRESS) => {
            info!("Upgrade already in progress, continuing with current state");
            api.game_state().await?;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::testing::{base_state, MockApi};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_low_hearts_triggers_purchase() {
        let mut state = base_state();
        state.hearts = 1;
        let mock = MockApi::with_state(state);

        ensure_hearts(&mock).await.unwrap();
        assert_eq!(mock.count("buy_heart"), 1);
    }

    #[tokio::test]
    async fn test_enough_hearts_skips_purchase() {
        let mock = MockApi::new();
        ensure_hearts(&mock).await.unwrap();
        assert_eq!(mock.count("buy_heart"), 0);
    }

    #[tokio::test]
    async fn test_heart_purchase_500_is_swallowed() {
        let mut state = base_state();
        state.hearts = 0;
        let mock = MockApi::with_state(state);
        mock.fail_next("buy_heart", 500, "INTERNAL_SERVER_ERROR");

        ensure_hearts(&mock).await.unwrap();
    }

    #[tokio::test]
    async fn test_heart_purchase_other_error_propagates() {
        let mut state = base_state();
        state.hearts = 0;
        let mock = MockApi::with_state(state);
        mock.fail_next("buy_heart", 400, "BAD_REQUEST");

        assert!(ensure_hearts(&mock).await.is_err());
    }

    #[tokio::test]
    async fn test_active_session_skips_start() {
        let mut state = base_state();
        state.last_session_start_time = Some(Utc::now() - Duration::minutes(10));
        state.last_session_end_time = Some(Utc::now() + Duration::hours(1));
        let mock = MockApi::with_state(state);

        ensure_session(&mock, "0xWALLET").await.unwrap();
        assert_eq!(mock.count("start_session"), 0);
    }

    #[tokio::test]
    async fn test_expired_session_starts_new_one() {
        let mut state = base_state();
        state.last_session_start_time = Some(Utc::now() - Duration::hours(3));
        state.last_session_end_time = Some(Utc::now() - Duration::hours(1));
        let mock = MockApi::with_state(state);

        ensure_session(&mock, "0xWALLET").await.unwrap();
        assert_eq!(mock.count("start_session"), 1);
    }

    #[tokio::test]
    async fn test_session_conflict_refetches_and_succeeds() {
        let mock = MockApi::new();
        mock.fail_next("start_session", 409, "PLAYER_ALREADY_IN_SESSION");

        ensure_session(&mock, "0xWALLET").await.unwrap();
        // Skip-check fetch plus the post-conflict refresh.
        assert_eq!(mock.count("game_state"), 2);
    }

    #[tokio::test]
    async fn test_upgrade_in_future_skips_request() {
        let mut state = base_state();
        state.upgrade_complete_time = Some(Utc::now() + Duration::minutes(30));
        let mock = MockApi::with_state(state);

        ensure_upgrade(&mock, "0xWALLET").await.unwrap();
        assert_eq!(mock.count("upgrade"), 0);
    }

    #[tokio::test]
    async fn test_upgrade_conflict_is_not_an_error() {
        let mock = MockApi::new();
        mock.fail_next("upgrade", 409, "UPGRADE_IN_PROGRESS");

        ensure_upgrade(&mock, "0xWALLET").await.unwrap();
        assert_eq!(mock.count("upgrade"), 1);
    }

    #[tokio::test]
    async fn test_session_hard_failure_propagates() {
        let mock = MockApi::new();
        mock.fail_next("start_session", 500, "SOMETHING_ELSE");

        assert!(ensure_session(&mock, "0xWALLET").await.is_err());
    }

    #[tokio::test]
    async fn test_full_pass_runs_all_steps_in_order() {
        let mut state = base_state();
        state.hearts = 0;
        let mock = MockApi::with_state(state);

        run(&mock, "0xWALLET").await.unwrap();

        let calls = mock.calls.lock().unwrap().clone();
        let buy = calls.iter().position(|c| c == "buy_heart").unwrap();
        let session = calls.iter().position(|c| c == "start_session").unwrap();
        let upgrade = calls.iter().position(|c| c == "upgrade").unwrap();
        assert!(buy < session && session < upgrade);
    }
}
