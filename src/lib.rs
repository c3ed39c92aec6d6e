//! # Toarupanel - reactive panel decorations
//!
//! Toarupanel provides the controllers that decide _when_ the decorations
//! of a shell panel are created, shown, hidden and destroyed. It ships two
//! of them:
//!
//! - [`ActivitiesButton`], which shows or hides the pre-existing activities
//!   indicator depending on a user preference and the state of the shell.
//! - [`WindowButtons`], which owns a group of minimize/maximize/close buttons,
//!   loads their stylesheet, and dispatches clicks to the focused window.
//!
//! ## Design
//!
//! Like the rest of Toaru, this crate is coupled together by traits. The
//! controllers never reach for global state: everything they need from the
//! host (the panel widget toolkit, the window tracker, the overview, the
//! settings store, the theme context) is described by a capability trait in
//! the [`platform`] module, and injected at construction as a
//! reference-counted [`Host`].
//!
//! Both controllers implement the [`Decoration`] trait, which provides the
//! shared lifecycle: a decoration is either `Inactive` or `Active`, is driven
//! by a [`PreferenceMode`] read from the settings store, and while active
//! holds exactly one subscription per event source it declares.
//!
//! ### Event delivery
//!
//! All of this runs on the host's event loop, single-threaded. When a
//! controller connects to a signal, the host hands back a [`HandlerId`].
//! The host later delivers the event by calling [`Decoration::notify`] with
//! that id. Ids that were disconnected are ignored, so a late delivery can
//! never reach a deactivated controller.
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use toarupanel::platform::dummy::DummyHost;
//! use toarupanel::{ActivitiesButton, Decoration, PanelConfig};
//!
//! let host = Rc::new(DummyHost::new());
//! let config = Rc::new(PanelConfig::default());
//!
//! let mut activities = ActivitiesButton::new(Rc::clone(&host), config);
//!
//! for id in host.set_setting("hide-activities-button", "always") {
//!     activities.notify(id);
//! }
//! ```

#![warn(
    missing_debug_implementations,
    missing_docs
)]

pub mod config;
pub mod controller;
pub mod core;
pub mod decorations;
pub mod platform;
pub mod util;

pub use crate::core::types;
#[doc(inline)]
pub use crate::config::PanelConfig;
#[doc(inline)]
pub use crate::controller::{Decoration, Lifecycle, State};
#[doc(inline)]
pub use crate::core::types::{HandlerId, PreferenceMode};
#[doc(inline)]
pub use crate::decorations::{ActivitiesButton, WindowButtons};
#[doc(inline)]
pub use crate::platform::Host;

use std::io;

use thiserror::Error;

/// Everything that could possibly go wrong at the boundaries of a decoration.
///
/// None of these are fatal: the controllers absorb them, hand them to an
/// [`ErrorHandler`], and carry on with a safe default.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PanelError {
    /// A preference held a value that is not a known mode.
    #[error("Unknown mode '{value}' for key {key}")]
    UnknownMode {
        /// The settings key that was read.
        key: String,
        /// The raw value found under the key.
        value: String,
    },

    /// A theme name that cannot name a theme directory.
    #[error("Invalid theme name: {0}")]
    InvalidTheme(String),

    /// One or more configuration invariants was not upheld.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An error while reading the filesystem.
    #[error("I/O error: {0}")]
    Io(String),

    /// An error not covered by toarupanel.
    #[error("Error: {0}")]
    OtherError(String),
}

impl From<io::Error> for PanelError {
    fn from(e: io::Error) -> PanelError {
        PanelError::Io(e.to_string())
    }
}

/// The general result type used by toarupanel.
pub type Result<T> = ::core::result::Result<T, PanelError>;

/// An error handler that can be used to handle a [`PanelError`].
///
/// Typically this would be a standard logging function that writes
/// to a file or stdout, but it can be anything.
pub trait ErrorHandler {
    /// Calls the error handler.
    fn call(&self, err: PanelError);
}
