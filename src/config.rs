use std::time::Duration;

pub const DEFAULT_SETTLEMENT_DELAY: Duration = Duration::from_millis(1200);

/// Tunables for a purchase session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Simulated latency before each payment transition and before a
    /// sufficient cash insertion is handed to payment processing.
    pub settlement_delay: Duration,
}

impl SessionConfig {
    pub fn with_delay_millis(millis: u64) -> Self {
        Self {
            settlement_delay: Duration::from_millis(millis),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settlement_delay: DEFAULT_SETTLEMENT_DELAY,
        }
    }
}
