/// Overall schedule-to-close ceiling attached to every generated activity.
pub const SCHEDULE_TO_CLOSE_TIMEOUT_SECS: u64 = 300;

/// Backoff metadata attached to a generated operation for the executing runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub initial_interval_secs: u64,
    pub maximum_interval_secs: u64,
    pub backoff_coefficient: f64,
    pub maximum_attempts: u32,
}

impl RetryPolicy {
    pub const fn new(
        initial_interval_secs: u64,
        maximum_interval_secs: u64,
        backoff_coefficient: f64,
        maximum_attempts: u32,
    ) -> Self {
        Self {
            initial_interval_secs,
            maximum_interval_secs,
            backoff_coefficient,
            maximum_attempts,
        }
    }

    /// General-purpose preset. Never selected by the parser.
    pub const fn standard() -> Self {
        Self::new(1, 100, 2.0, 3)
    }

    /// Preset for operations that can be repeated without side effects.
    pub const fn idempotent_safe() -> Self {
        Self::new(1, 300, 2.0, 5)
    }

    /// Preset for operations where a repeat may duplicate side effects.
    pub const fn non_idempotent() -> Self {
        Self::new(2, 60, 1.5, 2)
    }

    /// The policy for an operation, chosen from its idempotency alone.
    pub const fn for_idempotency(idempotent: bool) -> Self {
        if idempotent {
            Self::idempotent_safe()
        } else {
            Self::non_idempotent()
        }
    }
}
