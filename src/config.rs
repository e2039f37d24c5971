/// Tunables of a [`NearTree`](crate::NearTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Defer the subtree rejection test from push time to visit time.
    /// Results are unchanged; only the node visit count grows.
    pub no_pre_prune: bool,
    /// Seed for the random completion order and the estimators' sampling.
    pub seed: u64,
    /// Maximum number of probes the estimators draw from the tree.
    pub sample_size: usize,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Config {
            no_pre_prune: false,
            seed: 0,
            sample_size: 100,
        }
    }

    #[must_use]
    pub fn with_no_pre_prune(mut self, no_pre_prune: bool) -> Self {
        self.no_pre_prune = no_pre_prune;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// A sample size of zero is treated as one.
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size.max(1);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
