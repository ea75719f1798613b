//! Automation Cycle
//!
//! One full cycle is: fresh state report -> progression sequencer ->
//! mission pipeline -> accumulation wait -> gold claim -> leaderboard
//! report. The supervisor runs cycles forever; everything in here is
//! strictly sequential and talks to the server through `GameApi`.

pub mod missions;
pub mod scheduler;
pub mod sequencer;
pub mod supervisor;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::types::GameApi;

/// Run one full automation cycle.
///
/// Any hard failure aborts the cycle and propagates to the supervisor;
/// the mission pipeline degrades internally and never fails the cycle.
pub async fn run_cycle(api: &dyn GameApi, wallet_address: &str) -> Result<()> {
    let state = api
        .game_state()
        .await
        .context("Failed to fetch game state")?;
    info!("Current level: {}", state.level);
    info!("Mining speed: {}", state.mining_speed);
    info!("Bag capacity: {}", state.bag_cap);
    info!("Hearts: {}", state.hearts);

    sequencer::run(api, wallet_address)
        .await
        .context("Progression sequencer failed")?;

    missions::process(api).await;

    // Re-fetch: the sequencer and missions may have changed speed or cap.
    let state = api
        .game_state()
        .await
        .context("Failed to fetch game state before accumulation wait")?;

    let now = Utc::now();
    let wait_secs = scheduler::seconds_until_full(&state, now);
    info!(
        "Current gold: {:.2}/{} RCAT",
        scheduler::projected_gold(&state, now),
        state.bag_cap
    );
    info!("Mining for: {} minutes", wait_secs / 60);

    scheduler::countdown(wait_secs).await;

    let outcome = api.claim_gold().await.context("Failed to claim gold")?;
    info!("Claimed gold: {} RCAT", outcome.claimed_gold);
    info!("New balance: {} RCAT", outcome.balance);

    let standing = api
        .leaderboard()
        .await
        .context("Failed to fetch leaderboard")?;
    info!("Your position: {}", standing.position);
    info!("Your total gold: {} RCAT", standing.total_gold);

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::MockApi;
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_full_cycle_claims_and_reports() {
        let mock = MockApi::new();
        run_cycle(&mock, "0xWALLET").await.unwrap();

        assert_eq!(mock.count("claim_gold"), 1);
        assert_eq!(mock.count("leaderboard"), 1);
        // Sequencer and the final wait each refresh the snapshot.
        assert!(mock.count("game_state") >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_propagates_claim_failure() {
        let mock = MockApi::new();
        mock.fail_next("claim_gold", 500, "boom");

        let err = run_cycle(&mock, "0xWALLET").await.unwrap_err();
        assert!(format!("{:#}", err).contains("claim gold"));
        assert_eq!(mock.count("leaderboard"), 0);
    }
}
