/// Parser settings.
/// ```
/// # use pull_xml::{Config, Parser};
/// let parser = Parser::with_config(Config::default().with_error_context(64));
/// assert!(parser.error().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How many of the most recent input bytes an error report quotes.
    pub error_context: usize,
}

impl Config {
    pub const DEFAULT_ERROR_CONTEXT: usize = 32;

    pub fn with_error_context(mut self, bytes: usize) -> Self {
        self.error_context = bytes;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            error_context: Self::DEFAULT_ERROR_CONTEXT,
        }
    }
}
