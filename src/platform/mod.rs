//! Traits describing what a decoration needs from its host shell.
//!
//! The decorations in this crate do not render anything, track windows, or
//! store preferences themselves. Everything they need from the outside world
//! is described by a capability trait in this module, and provided by the
//! host they are constructed with.
//!
//! ## Capabilities
//!
//! - [`SignalSource`]: connecting to and disconnecting from shell signals.
//! - [`Shell`]: the focused window and application, and the overview.
//! - [`SettingsStore`]: persisted user preferences.
//! - [`Panel`] and [`Container`]: the panel widget toolkit.
//! - [`ThemeContext`]: loading and unloading stylesheets.
//!
//! A type implementing all of them is a [`Host`].
//!
//! ## Ownership
//!
//! Every method here takes `&self`. The host's objects are shared between
//! both decorations and the rest of the shell, so implementors are expected
//! to be reference counted, with interior mutability where needed (for
//! example [`std::rc::Rc`] and [`std::cell::RefCell`]). The same holds for
//! [`ShellWindow`], which is a cheap handle onto a window owned by the
//! window manager.

use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;

use strum_macros::{Display, EnumIter};

use crate::core::types::{
    AppInfo, ButtonId, HandlerId, Indicator, MaximizeFlags, Side, WindowAction, WindowType,
};

/// An in-memory host, for testing.
pub mod dummy;

/// The host object a [`Signal`] is emitted by.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Source {
    WindowTracker,
    AppSystem,
    Overview,
    Display,
    WindowManager,
    WmPreferences,
}

/// A shell event a decoration can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Signal {
    /// The focused application changed.
    FocusAppChanged,
    /// An application changed its running state.
    AppStateChanged,
    /// The overview started showing.
    OverviewShowing,
    /// The overview started hiding.
    OverviewHiding,
    /// The focused window changed.
    FocusWindowChanged,
    /// A window was maximized, unmaximized, or otherwise resized.
    WindowSizeChanged,
    /// A window was destroyed.
    WindowDestroyed,
    /// The window manager's button layout preference changed.
    ButtonLayoutChanged,
}

impl Signal {
    /// The object that emits this signal.
    pub fn source(self) -> Source {
        use Signal::*;

        match self {
            FocusAppChanged => Source::WindowTracker,
            AppStateChanged => Source::AppSystem,
            OverviewShowing | OverviewHiding => Source::Overview,
            FocusWindowChanged => Source::Display,
            WindowSizeChanged | WindowDestroyed => Source::WindowManager,
            ButtonLayoutChanged => Source::WmPreferences,
        }
    }
}

/// A type that emits shell signals.
pub trait SignalSource {
    /// Connects to `signal`, returning a handle for the connection.
    ///
    /// Every delivery of the signal to this connection is made by passing
    /// the returned handle to [`Decoration::notify`][1].
    ///
    /// [1]: crate::controller::Decoration::notify
    fn connect(&self, signal: Signal) -> HandlerId;

    /// Disconnects a handle returned by `connect`.
    ///
    /// After this returns, the handle must not be delivered again.
    fn disconnect(&self, id: HandlerId);
}

/// A store of persisted user preferences.
pub trait SettingsStore {
    /// Returns the string stored under `key`, if any.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Connects to changes of `key`.
    ///
    /// Settings connections are permanent for the life of a decoration.
    fn connect_changed(&self, key: &str) -> HandlerId;
}

/// A handle onto a top-level window managed by the window manager.
pub trait ShellWindow: Debug + Clone {
    /// The identifier used to refer to the window.
    type Id: Debug + Copy + PartialEq + Eq + Hash;

    /// Returns the window's associated ID.
    fn id(&self) -> Self::Id;

    /// The window's type.
    fn window_type(&self) -> WindowType;

    /// Whether the window asks not to be shown in the taskbar.
    fn skip_taskbar(&self) -> bool;

    /// The axes the window is currently maximized along.
    fn maximized(&self) -> MaximizeFlags;

    /// Whether the window is minimized.
    fn minimized(&self) -> bool;

    /// Whether the window is on the primary monitor.
    fn is_on_primary_monitor(&self) -> bool;

    /// Minimizes the window.
    fn minimize(&self);

    /// Maximizes the window along `flags`.
    fn maximize(&self, flags: MaximizeFlags);

    /// Unmaximizes the window along `flags`.
    fn unmaximize(&self, flags: MaximizeFlags);

    /// Asks the window to close.
    fn delete(&self, timestamp: u32);
}

/// The shell state the decorations observe.
pub trait Shell: SignalSource {
    /// The window handle type used by the shell.
    type Window: ShellWindow;

    /// The currently focused window, if any.
    fn focus_window(&self) -> Option<Self::Window>;

    /// The application targeted by the app-menu indicator, if any.
    fn target_app(&self) -> Option<AppInfo>;

    /// Whether the overview is visible, or about to be.
    fn overview_visible(&self) -> bool;

    /// Whether the panel is running in its desktop-style variant.
    fn desktop_mode(&self) -> bool;

    /// The timestamp of the event currently being processed.
    fn current_time(&self) -> u32;
}

/// A widget holding a group of buttons on the panel.
pub trait Container: Debug {
    /// Appends a button for `action`, returning its handle.
    ///
    /// The host reports clicks on the button by passing the handle to
    /// [`WindowButtons::on_button_click`][1].
    ///
    /// [1]: crate::decorations::WindowButtons::on_button_click
    fn add_button(&self, action: WindowAction, style_class: &str) -> ButtonId;

    /// Shows the container.
    fn show(&self);

    /// Hides the container.
    fn hide(&self);

    /// Whether the container is shown.
    fn is_visible(&self) -> bool;

    /// Removes the container and its children from the panel and
    /// releases them.
    fn destroy(self);
}

/// The panel the decorations live in.
pub trait Panel {
    /// The container widget type used by the panel.
    type Container: Container;

    /// Whether `indicator` is present in the current panel layout.
    fn has_indicator(&self, indicator: Indicator) -> bool;

    /// Shows a pre-existing indicator.
    fn show_indicator(&self, indicator: Indicator);

    /// Hides a pre-existing indicator.
    fn hide_indicator(&self, indicator: Indicator);

    /// Creates a new, hidden container that is not yet on the panel.
    fn new_container(&self, style_class: &str) -> Self::Container;

    /// Inserts a container into the panel.
    ///
    /// On the left, the container goes just before the app-menu indicator.
    /// On the right, it is appended.
    fn insert_container(&self, container: &Self::Container, side: Side);
}

/// The stylesheet context of the host.
///
/// Stylesheets are identified by their path.
pub trait ThemeContext {
    /// Whether a stylesheet exists at `path`.
    ///
    /// Checks the filesystem by default.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Loads the stylesheet at `path`.
    fn load_stylesheet(&self, path: &Path);

    /// Unloads a previously loaded stylesheet.
    fn unload_stylesheet(&self, path: &Path);

    /// Reloads the global style context so that stylesheet changes
    /// take visual effect.
    fn reload(&self);
}

/// Everything a decoration needs from its host.
///
/// This is implemented for every type that implements all the
/// capability traits.
pub trait Host: Shell + Panel + SettingsStore + ThemeContext {}

impl<T> Host for T where T: Shell + Panel + SettingsStore + ThemeContext {}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    #[test]
    fn test_signal_sources() {
        assert_eq!(Signal::OverviewShowing.source(), Source::Overview);
        assert_eq!(Signal::WindowDestroyed.source(), Source::WindowManager);
        assert_eq!(Signal::ButtonLayoutChanged.source(), Source::WmPreferences);

        let from_overview = Signal::iter()
            .filter(|s| s.source() == Source::Overview)
            .count();
        assert_eq!(from_overview, 2);
    }
}
