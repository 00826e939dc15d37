#[derive(Debug, Clone)]
pub struct Options {
    // Learning:
    pub learnt_size_limit: usize,
    pub resolution_limit: usize,
    // Restart:
    pub restart_interval: usize,
    pub restart_budget: usize,
    // Randomness (`None` seeds from the wall clock):
    pub seed: Option<u64>,
}

pub const DEFAULT_OPTIONS: Options = Options {
    // Learning:
    learnt_size_limit: 6,
    resolution_limit: 30,
    // Restart:
    restart_interval: 100,
    restart_budget: 500,
    seed: None,
};

impl Default for Options {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}
