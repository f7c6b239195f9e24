use anyhow::{Error, Result};

/// Receives non-fatal failures that should be shown to the user or recorded.
///
/// Implementations must not fail the caller's operation; a reporter that
/// cannot deliver a message returns the error for the caller to ignore.
pub trait ErrorReporter: Send + Sync {
    /// Capture the provided error for later inspection.
    fn capture(&self, error: &Error) -> Result<()>;

    /// Convenience helper to capture a plain message.
    fn capture_message(&self, message: &str) -> Result<()> {
        self.capture(&Error::msg(message.to_owned()))
    }
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for &R {
    fn capture(&self, error: &Error) -> Result<()> {
        (**self).capture(error)
    }

    fn capture_message(&self, message: &str) -> Result<()> {
        (**self).capture_message(message)
    }
}

/// Error reporting implementation that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopErrorReporter;

impl ErrorReporter for NoopErrorReporter {
    fn capture(&self, _error: &Error) -> Result<()> {
        Ok(())
    }
}

/// Prints every captured error on its own line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutErrorReporter;

impl ErrorReporter for StdoutErrorReporter {
    fn capture(&self, error: &Error) -> Result<()> {
        println!("{error}");
        Ok(())
    }
}
