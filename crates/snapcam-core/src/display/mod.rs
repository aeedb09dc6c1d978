//! On-screen rendering seam.

use crate::{CoreResult, Frame, SessionStatus};

/// Renders frames for the operator.
pub trait Display {
    /// Show `frame` along with the current session status.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError`; the loop logs it and keeps running.
    fn show(&mut self, frame: &Frame, status: &SessionStatus) -> CoreResult<()>;

    /// Release the display surface. Calling it again is a no-op.
    fn release(&mut self);
}

/// Display that renders nothing, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn show(&mut self, _frame: &Frame, _status: &SessionStatus) -> CoreResult<()> {
        Ok(())
    }

    fn release(&mut self) {}
}
