//! Resilience Supervisor
//!
//! Keeps the bot alive forever. Modeled as an explicit two-state machine:
//! `Authenticating` establishes the wallet + game session (self-healing a
//! missing game account by creating a wallet, bounded to one retry), and
//! `Running` executes full cycles. Failures never terminate the process:
//! a cycle failure retries the cycle after a fixed backoff, while an
//! authentication-class failure (or a 401/403 mid-cycle) drops back to
//! `Authenticating`.

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::api::error::ApiError;
use crate::config::RETRY_DELAY;
use crate::types::{GameApi, PlayerProfile};

/// Credentials established by a successful authentication.
#[derive(Clone, Debug)]
pub struct SessionInfo {
    pub wallet_address: String,
    pub profile: PlayerProfile,
}

enum Phase {
    Authenticating,
    Running(SessionInfo),
}

/// Run the supervisor loop. Never returns under normal operation.
pub async fn run_forever(api: &dyn GameApi) {
    let mut phase = Phase::Authenticating;

    loop {
        phase = match phase {
            Phase::Authenticating => match authenticate(api).await {
                Ok(session) => {
                    info!(
                        "Game logged in as: {} (ID: {})",
                        session.profile.username, session.profile.user_id
                    );
                    Phase::Running(session)
                }
                Err(e) => {
                    error!("Authentication failed: {:#}", e);
                    warn!("Retrying authentication in 5 minutes...");
                    sleep(RETRY_DELAY).await;
                    Phase::Authenticating
                }
            },
            Phase::Running(session) => {
                match super::run_cycle(api, &session.wallet_address).await {
                    Ok(()) => Phase::Running(session),
                    Err(e) => {
                        error!("Mining cycle failed: {:#}", e);
                        let needs_reauth = e
                            .downcast_ref::<ApiError>()
                            .is_some_and(ApiError::is_auth_failure);
                        sleep(RETRY_DELAY).await;
                        if needs_reauth {
                            warn!("Credential rejected, re-authenticating...");
                            Phase::Authenticating
                        } else {
                            warn!("Retrying cycle in 5 minutes...");
                            Phase::Running(session)
                        }
                    }
                }
            }
        };
    }
}

/// Log in to the wallet API, then the game API.
///
/// A 404 from the game login means the game account does not exist yet:
/// create a wallet, log in again, and retry the game login exactly once.
pub async fn authenticate(api: &dyn GameApi) -> Result<SessionInfo> {
    let mut wallet_address = api.wallet_login().await.context("Wallet login failed")?;
    let mut retried = false;

    loop {
        match api.game_login(&wallet_address).await {
            Ok(profile) => {
                return Ok(SessionInfo {
                    wallet_address,
                    profile,
                })
            }
            Err(e) if e.is_status(404) && !retried => {
                warn!("Game account not found, creating new wallet...");
                api.track_wallet().await.context("Wallet creation failed")?;
                wallet_address = api
                    .wallet_login()
                    .await
                    .context("Wallet login after creation failed")?;
                info!("New wallet created: {}", wallet_address);
                retried = true;
            }
            Err(e) => return Err(e).context("Game login failed"),
        }
    }
}
