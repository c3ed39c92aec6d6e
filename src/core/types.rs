//! Basic core types used throughout this crate at a high level.

use std::fmt;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The user-configured mode of a decoration.
///
/// This is the only form a decoration preference takes past the settings
/// boundary: raw strings are parsed into a `PreferenceMode` as soon as they
/// are read, and anything unrecognised is rejected there.
///
/// Parsing is case-insensitive, and accepts the legacy per-decoration values
/// (`maximized`, `both`, `tiled` and `auto`) as aliases of `Conditional`.
///
/// ```rust
/// use toarupanel::PreferenceMode;
///
/// assert_eq!("Always".parse::<PreferenceMode>().unwrap(), PreferenceMode::Always);
/// assert_eq!("both".parse::<PreferenceMode>().unwrap(), PreferenceMode::Conditional);
/// assert!("sometimes".parse::<PreferenceMode>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
    Display, AsRefStr, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum PreferenceMode {
    /// The decoration is switched off entirely.
    #[default]
    Never,
    /// The decoration applies unconditionally.
    Always,
    /// The decoration applies depending on the state of the shell.
    #[strum(
        to_string = "conditional",
        serialize = "maximized",
        serialize = "both",
        serialize = "tiled",
        serialize = "auto"
    )]
    Conditional,
}

impl PreferenceMode {
    /// Whether a decoration in this mode should be active.
    #[inline]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Never)
    }
}

/// A side of the panel.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Side {
    Left,
    Right,
}

/// An action a window button performs on the focused window.
///
/// The string form of an action is also the style class given
/// to its button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum WindowAction {
    /// Minimize the window.
    Minimize,
    /// Toggle full maximization of the window.
    Maximize,
    /// Ask the window to close.
    Close,
}

bitflags::bitflags! {
    /// The axes a window is maximized along.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MaximizeFlags: u8 {
        /// Maximized horizontally.
        const HORIZONTAL = 1 << 0;
        /// Maximized vertically.
        const VERTICAL   = 1 << 1;
        /// Maximized along both axes.
        const BOTH       = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl MaximizeFlags {
    /// Maximized along exactly one axis, as a tiled window is.
    #[inline]
    pub fn is_tiled(self) -> bool {
        self == Self::HORIZONTAL || self == Self::VERTICAL
    }

    /// Maximized along both axes.
    #[inline]
    pub fn is_full(self) -> bool {
        self == Self::BOTH
    }
}

/// The type of a window, as reported by the window manager.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowType {
    #[default]
    Normal,
    Desktop,
    Dock,
    Dialog,
    ModalDialog,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Other,
}

/// The running state of an application.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppState {
    Stopped,
    Starting,
    Running,
}

/// The application currently targeted by the app-menu indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// The application's identifier.
    pub id: String,
    /// Its running state.
    pub state: AppState,
}

impl AppInfo {
    /// Creates a new `AppInfo`.
    pub fn new<S: Into<String>>(id: S, state: AppState) -> Self {
        Self { id: id.into(), state }
    }

    /// Whether the application is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == AppState::Running
    }
}

/// A pre-existing element of the panel.
///
/// These belong to the host. Decorations may show and hide them,
/// but never create or destroy them.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Indicator {
    Activities,
}

/// An opaque handle binding one event source to one handler.
///
/// Issued by the host when a controller connects to a signal or
/// a settings key, and handed back to the controller on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An opaque handle to a button created through a [`Container`][1].
///
/// [1]: crate::platform::Container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonId(pub u64);
