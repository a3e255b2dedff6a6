use log::{debug, info, warn};

/// Thin wrapper over the process-wide `log` facade.
///
/// The facade is the swappable sink: which logger implementation receives
/// these records is decided once at process startup, never by a pipeline
/// stage.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
