//! Miscellaneous utilities.

/// Logging helpers.
pub mod log;

#[doc(inline)]
pub use self::log::DefaultErrorHandler;
