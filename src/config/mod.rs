//! Types and helpers for configuring the decorations.

mod config;

#[doc(inline)]
pub use config::*;
