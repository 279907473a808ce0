use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// How long the server waits for open connections to finish once the
    /// shutdown signal fires.
    ///
    /// Default: 10 seconds
    pub(crate) shutdown_timeout: Duration,

    /// Emit an access-log line for every request at `info` level.
    ///
    /// Default: true
    pub(crate) log_requests: bool,
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the graceful shutdown timeout.
    ///
    /// Default: 10 seconds
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Enable or disable per-request access logging.
    ///
    /// Default: true
    pub fn log_requests(mut self, enable: bool) -> Self {
        self.log_requests = enable;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(10),
            log_requests: true,
        }
    }
}
