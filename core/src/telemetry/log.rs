use log::{debug, info, warn};

/// Component-tagged logger so controller and orchestrator output can be
/// filtered separately with `RUST_LOG`.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!(target: "equipcore", "[{}] {}", self.component, message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: "equipcore", "[{}] {}", self.component, message);
    }

    pub fn trace_detail(&self, message: &str) {
        debug!(target: "equipcore", "[{}] {}", self.component, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("core")
    }
}
