//! Detection options and configuration.

/// Default minimum length of a blank run, matching the roughly 15 lines an
/// Enter-filled page needs before it spills onto the next one.
pub const DEFAULT_MIN_BLANK_RUN: usize = 15;

/// Options for empty-page detection.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Whether to look for runs of empty paragraphs inside pages with content
    pub blank_runs: bool,

    /// Minimum number of consecutive empty paragraphs forming a blank run
    pub min_blank_run: usize,
}

impl DetectOptions {
    /// Create new detection options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable blank-run detection.
    pub fn with_blank_runs(mut self, enabled: bool) -> Self {
        self.blank_runs = enabled;
        self
    }

    /// Set the minimum blank run length. Values below 1 are raised to 1.
    pub fn with_min_blank_run(mut self, min: usize) -> Self {
        self.min_blank_run = min.max(1);
        self
    }
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            blank_runs: false,
            min_blank_run: DEFAULT_MIN_BLANK_RUN,
        }
    }
}
