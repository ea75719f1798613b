//! Accumulation Scheduler
//!
//! Computes how long to wait until the bag is projected full, then runs
//! a 1 Hz countdown against a monotonic deadline. The projection uses
//! only server clock fields; the countdown uses `tokio::time::Instant`
//! so the tick display cannot drift against the deadline arithmetic.

use std::io::Write;

use chrono::{DateTime, Utc};
use colored::Colorize;
use tokio::time::{interval, Duration, Instant};

use crate::types::PlayerState;

/// Gold projected to be in the bag at `now`: accumulation since the last
/// server-recorded accumulate time, on top of the recorded unclaimed amount.
pub fn projected_gold(state: &PlayerState, now: DateTime<Utc>) -> f64 {
    let elapsed_secs = state
        .last_accumulate_time
        .map(|t| ((now - t).num_milliseconds().max(0) as f64) / 1000.0)
        .unwrap_or(0.0);
    elapsed_secs * state.mining_speed + state.unclaimed_gold
}

/// Seconds until the bag is projected full, never less than 1.
///
/// A bag already at or over capacity still waits the minimum tick: the
/// projection may be stale, and the claim re-verifies against the server
/// either way.
pub fn seconds_until_full(state: &PlayerState, now: DateTime<Utc>) -> u64 {
    if state.mining_speed <= 0.0 {
        return 1;
    }
    let remaining = state.bag_cap - projected_gold(state, now);
    let secs = (remaining / state.mining_speed).ceil();
    if secs < 1.0 {
        1
    } else {
        secs as u64
    }
}

/// Whole seconds left before `deadline`, rounded up.
pub fn remaining_seconds(deadline: Instant, now: Instant) -> u64 {
    let millis = deadline.saturating_duration_since(now).as_millis();
    millis.div_ceil(1000) as u64
}

/// `M:SS` countdown display.
pub fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Tick down `total_secs` at a fixed 1-second cadence, redrawing the
/// remaining time in place. Always runs to the deadline; there is no
/// cancellation path.
pub async fn countdown(total_secs: u64) {
    let deadline = Instant::now() + Duration::from_secs(total_secs);
    let mut ticker = interval(Duration::from_secs(1));
    let mut stdout = std::io::stdout();

    loop {
        ticker.tick().await;
        let remaining = remaining_seconds(deadline, Instant::now());
        if remaining == 0 {
            println!();
            break;
        }
        print!(
            "\rMining time remaining: {}  ",
            format_remaining(remaining).cyan()
        );
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::testing::base_state;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_worked_example_from_server_rates() {
        // bagCap=1000, speed=0.5, unclaimed=100, last accumulate 200s ago
        // -> projected 200, remaining 800, wait ceil(800/0.5) = 1600.
        let now = Utc::now();
        let mut state = base_state();
        state.bag_cap = 1000.0;
        state.mining_speed = 0.5;
        state.unclaimed_gold = 100.0;
        state.last_accumulate_time = Some(now - ChronoDuration::seconds(200));

        assert_eq!(projected_gold(&state, now), 200.0);
        assert_eq!(seconds_until_full(&state, now), 1600);
    }

    #[test]
    fn test_full_bag_still_waits_minimum_tick() {
        let now = Utc::now();
        let mut state = base_state();
        state.bag_cap = 100.0;
        state.mining_speed = 1.0;
        state.unclaimed_gold = 250.0;
        state.last_accumulate_time = Some(now);

        assert_eq!(seconds_until_full(&state, now), 1);
    }

    #[test]
    fn test_zero_mining_speed_waits_minimum_tick() {
        let now = Utc::now();
        let mut state = base_state();
        state.mining_speed = 0.0;
        assert_eq!(seconds_until_full(&state, now), 1);
    }

    #[test]
    fn test_missing_accumulate_time_counts_no_elapsed_mining() {
        let now = Utc::now();
        let mut state = base_state();
        state.last_accumulate_time = None;
        state.bag_cap = 60.0;
        state.mining_speed = 2.0;
        state.unclaimed_gold = 10.0;

        assert_eq!(projected_gold(&state, now), 10.0);
        assert_eq!(seconds_until_full(&state, now), 25);
    }

    #[test]
    fn test_fractional_wait_rounds_up() {
        let now = Utc::now();
        let mut state = base_state();
        state.bag_cap = 10.0;
        state.mining_speed = 3.0;
        state.unclaimed_gold = 0.0;
        state.last_accumulate_time = Some(now);

        // 10 / 3 = 3.33 -> 4
        assert_eq!(seconds_until_full(&state, now), 4);
    }

    #[test]
    fn test_remaining_seconds_rounds_up() {
        let now = Instant::now();
        assert_eq!(remaining_seconds(now + Duration::from_millis(1), now), 1);
        assert_eq!(remaining_seconds(now + Duration::from_millis(1000), now), 1);
        assert_eq!(remaining_seconds(now + Duration::from_millis(1001), now), 2);
        assert_eq!(remaining_seconds(now, now), 0);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "0:00");
        assert_eq!(format_remaining(59), "0:59");
        assert_eq!(format_remaining(60), "1:00");
        assert_eq!(format_remaining(1600), "26:40");
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_runs_to_deadline() {
        let start = Instant::now();
        countdown(3).await;
        assert!(Instant::now() - start >= Duration::from_secs(3));
    }
}
