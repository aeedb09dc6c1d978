//! Operator command input seam.

use crate::{CoreResult, SessionCommand};

/// Polls for at most one operator command per loop cycle.
pub trait CommandSource {
    /// Non-blocking poll (short timeout). `None` when no mapped key was pressed.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the input device fails.
    fn poll(&mut self) -> CoreResult<Option<SessionCommand>>;
}
