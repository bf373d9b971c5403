//! Order status polling.
//!
//! Fixed number of attempts, fixed interval, stop on `completed`. A failed
//! status lookup is logged and counts as an attempt.

use std::time::Duration;

use encifher_client::{DefiApi, OrderStatus, OrderStatusParams};
use encifher_config::TimingConfig;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 40,
            interval: Duration::from_secs(3),
        }
    }
}

impl From<&TimingConfig> for PollConfig {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            max_attempts: timing.poll_max_attempts,
            interval: timing.poll_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    /// Status lookups made, failed ones included
    pub attempts: u32,
    pub completed: bool,
    /// Last status the SDK reported, if any lookup succeeded
    pub last_status: Option<OrderStatus>,
}

/// Poll `order_id` until it completes or the attempts run out.
///
/// Never fails: exhausting the attempts returns the last non-terminal status.
/// Sleeps only between attempts, so completing on attempt `k` costs `k - 1`
/// intervals.
pub async fn poll_order_status<A: DefiApi>(
    api: &A,
    order_id: &str,
    config: &PollConfig,
) -> PollOutcome {
    let params = OrderStatusParams {
        order_status_identifier: order_id.to_string(),
    };
    let mut last_status = None;

    for attempt in 1..=config.max_attempts {
        match api.get_order_status(&params).await {
            Ok(status) => {
                info!("Attempt {}, status fetched: {}", attempt, status.status);
                if status.is_completed() {
                    info!("Order {} completed", order_id);
                    return PollOutcome {
                        attempts: attempt,
                        completed: true,
                        last_status: Some(status),
                    };
                }
                last_status = Some(status);
            }
            Err(e) => warn!("Attempt {}, status fetch error: {}", attempt, e),
        }

        if attempt < config.max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    warn!(
        "Order {} not completed after {} attempts",
        order_id, config.max_attempts
    );
    PollOutcome {
        attempts: config.max_attempts,
        completed: false,
        last_status,
    }
}
