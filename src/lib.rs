//! PawMiner -- Robot-Cat Mining Bot
//!
//! An unattended automation agent for the PawWallet mining game.
//! Authenticates with a bearer token, advances progression (hearts,
//! sessions, upgrades, missions), waits out the bag-fill time computed
//! from server rates, claims the gold, and repeats forever.

pub mod api;
pub mod banner;
pub mod config;
pub mod cycle;
pub mod types;
