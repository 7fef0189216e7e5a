/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: u32,
    pub is_complete: bool,
}

/// Countdown of the current question at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub elapsed_secs: f64,
    /// `max(0, limit - elapsed)` truncated to whole seconds.
    pub remaining_secs: u32,
    /// Used share of the limit, `0.0..=1.0`, for a progress bar.
    pub fraction: f64,
    pub is_expired: bool,
}
