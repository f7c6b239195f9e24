//! In-memory adapters for tests and embedding applications that want to
//! inspect reported failures after the fact.

use std::sync::Arc;

use anyhow::{Error, Result};
use parking_lot::Mutex;

use crate::errors::ErrorReporter;

/// Records every captured error message in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryErrorReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages captured so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl ErrorReporter for MemoryErrorReporter {
    fn capture(&self, error: &Error) -> Result<()> {
        tracing::debug!(target: "relaycode.commons", %error, "captured error");
        self.messages.lock().push(error.to_string());
        Ok(())
    }
}
