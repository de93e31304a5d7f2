//! Layout configuration.

/// Column layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on the number of overflow columns a single measure pass may create.
    ///
    /// Content that never stops overflowing into an unbounded width (or columns that take up no
    /// width at all) would otherwise grow the chain forever.
    pub max_columns: usize,
}

impl Config {
    pub const DEFAULT_MAX_COLUMNS: usize = 256;

    pub fn with_max_columns(mut self, max_columns: usize) -> Config {
        self.max_columns = max_columns;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_columns: Config::DEFAULT_MAX_COLUMNS,
        }
    }
}
