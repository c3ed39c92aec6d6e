use tracing::error;

use crate::{ErrorHandler, PanelError};

/// The default error handler.
///
/// Logs the error and moves on.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn call(&self, err: PanelError) {
        error!("{}", err)
    }
}
