//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ConfigLoader;
use crate::runner::{AdvanceSource, PayrollRunner};

/// Shared application state.
///
/// Holds the loaded configuration and the single payroll runner. The runner
/// lock serializes every mutation, so concurrent finalize requests for one
/// month commit each employee's deduction once.
#[derive(Clone)]
pub struct AppState {
    /// The loaded payroll configuration.
    config: Arc<ConfigLoader>,
    /// The roster, attendance, ledger and runs.
    runner: Arc<Mutex<PayrollRunner>>,
}

impl AppState {
    /// Creates a new application state with a runner using the loaded policy.
    pub fn new(config: ConfigLoader, advances: AdvanceSource) -> Self {
        let runner = PayrollRunner::new(config.policy().clone(), advances);
        Self {
            config: Arc::new(config),
            runner: Arc::new(Mutex::new(runner)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared payroll runner.
    pub fn runner(&self) -> &Mutex<PayrollRunner> {
        &self.runner
    }
}
