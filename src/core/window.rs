//! Predicates over the focused window.
//!
//! Whether the window buttons are shown depends on two questions asked
//! about the focused window: is it a window the buttons should act on at
//! all, and is it maximized in the way the current mode asks for. Both are
//! answered by a [`WindowPolicy`].

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::types::{MaximizeFlags, PreferenceMode, WindowType};
use crate::platform::ShellWindow;

/// Which maximization states count as "maximized".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum MaximizeMatch {
    /// Maximized along both axes.
    #[default]
    Full,
    /// Maximized along exactly one axis.
    Tiled,
    /// Maximized along at least one axis.
    Either,
}

impl MaximizeMatch {
    /// Tests whether the flags satisfy this match.
    pub fn matches(self, flags: MaximizeFlags) -> bool {
        match self {
            Self::Full => flags.is_full(),
            Self::Tiled => flags.is_tiled(),
            Self::Either => !flags.is_empty(),
        }
    }
}

/// The maximization a window needs, per [`PreferenceMode`].
///
/// Modes with no explicit entry use the default match, which is
/// [`MaximizeMatch::Full`] unless changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaximizePolicy {
    default: MaximizeMatch,
    per_mode: HashMap<PreferenceMode, MaximizeMatch>,
    primary_monitor_only: bool,
}

impl MaximizePolicy {
    /// Creates a policy matching `default` for every mode.
    pub fn new(default: MaximizeMatch) -> Self {
        Self {
            default,
            per_mode: HashMap::new(),
            primary_monitor_only: false,
        }
    }

    /// Sets the match used for a single mode.
    pub fn with_mode(mut self, mode: PreferenceMode, m: MaximizeMatch) -> Self {
        self.per_mode.insert(mode, m);
        self
    }

    /// Sets whether only windows on the primary monitor count.
    pub fn primary_monitor_only(mut self, only: bool) -> Self {
        self.primary_monitor_only = only;
        self
    }

    /// The match used for `mode`.
    pub fn match_for(&self, mode: PreferenceMode) -> MaximizeMatch {
        self.per_mode.get(&mode).copied().unwrap_or(self.default)
    }

    /// Whether windows off the primary monitor are ignored.
    pub fn requires_primary_monitor(&self) -> bool {
        self.primary_monitor_only
    }
}

/// Decides which windows the window buttons act on, and when
/// they count as maximized.
pub trait WindowPolicy<W: ShellWindow> {
    /// Whether `window` is a normal, manageable window.
    fn is_valid(&self, window: &W) -> bool;

    /// Whether `window` is maximized for the purposes of `mode`.
    fn is_maximized(&self, window: &W, mode: PreferenceMode) -> bool;
}

/// The default [`WindowPolicy`].
///
/// Normal windows, dialogs and utility windows are valid, unless they ask
/// to be skipped by the taskbar. Maximization is decided by a
/// [`MaximizePolicy`].
#[derive(Debug, Clone, Default)]
pub struct StandardPolicy {
    maximize: MaximizePolicy,
}

impl StandardPolicy {
    /// Creates a new `StandardPolicy`.
    pub fn new(maximize: MaximizePolicy) -> Self {
        Self { maximize }
    }
}

impl<W: ShellWindow> WindowPolicy<W> for StandardPolicy {
    fn is_valid(&self, window: &W) -> bool {
        use WindowType::*;

        let managed = matches!(
            window.window_type(),
            Normal | Dialog | ModalDialog | Utility
        );

        managed && !window.skip_taskbar()
    }

    fn is_maximized(&self, window: &W, mode: PreferenceMode) -> bool {
        if self.maximize.requires_primary_monitor() && !window.is_on_primary_monitor() {
            return false
        }

        self.maximize.match_for(mode).matches(window.maximized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::platform::dummy::DummyWindow;

    #[test]
    fn test_maximize_match() {
        let h = MaximizeFlags::HORIZONTAL;
        let both = MaximizeFlags::BOTH;
        let none = MaximizeFlags::empty();

        assert!(MaximizeMatch::Full.matches(both));
        assert!(!MaximizeMatch::Full.matches(h));
        assert!(MaximizeMatch::Tiled.matches(h));
        assert!(!MaximizeMatch::Tiled.matches(both));
        assert!(MaximizeMatch::Either.matches(h));
        assert!(MaximizeMatch::Either.matches(both));
        assert!(!MaximizeMatch::Either.matches(none));
    }

    #[test]
    fn test_validity() {
        let policy = StandardPolicy::default();

        let normal = DummyWindow::new(1);
        let dock = DummyWindow::new(2).with_type(WindowType::Dock);
        let hidden = DummyWindow::new(3).with_skip_taskbar(true);
        let dialog = DummyWindow::new(4).with_type(WindowType::ModalDialog);

        assert!(policy.is_valid(&normal));
        assert!(!policy.is_valid(&dock));
        assert!(!policy.is_valid(&hidden));
        assert!(policy.is_valid(&dialog));
    }

    #[test]
    fn test_default_requires_full_maximization() {
        let policy = StandardPolicy::default();
        let window = DummyWindow::new(1).with_maximized(MaximizeFlags::VERTICAL);

        assert!(!policy.is_maximized(&window, PreferenceMode::Conditional));

        window.set_maximized(MaximizeFlags::BOTH);
        assert!(policy.is_maximized(&window, PreferenceMode::Conditional));
    }

    #[test]
    fn test_per_mode_policy() {
        let policy = StandardPolicy::new(
            MaximizePolicy::new(MaximizeMatch::Full)
                .with_mode(PreferenceMode::Always, MaximizeMatch::Either),
        );
        let window = DummyWindow::new(1).with_maximized(MaximizeFlags::HORIZONTAL);

        assert!(policy.is_maximized(&window, PreferenceMode::Always));
        assert!(!policy.is_maximized(&window, PreferenceMode::Conditional));
    }

    #[test]
    fn test_primary_monitor_only() {
        let policy = StandardPolicy::new(MaximizePolicy::default().primary_monitor_only(true));
        let window = DummyWindow::new(1)
            .with_maximized(MaximizeFlags::BOTH)
            .with_primary_monitor(false);

        assert!(!policy.is_maximized(&window, PreferenceMode::Conditional));
    }
}
