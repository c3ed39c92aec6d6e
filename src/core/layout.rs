//! Window button layouts.
//!
//! A button layout is read from the window manager's preferences as a
//! string of the form `"appmenu:minimize,maximize,close"`, where the part
//! before the colon lists the items on the left of the titlebar, and the
//! part after it lists those on the right. Only the window actions are of
//! interest to the panel; everything else (`appmenu`, `icon`, `spacer`...)
//! is skipped.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::core::types::{Side, WindowAction};
use crate::platform::SettingsStore;

/// A single button in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonDescriptor {
    /// What the button does.
    pub action: WindowAction,
    /// The side of the titlebar it was configured on.
    pub side: Side,
}

impl ButtonDescriptor {
    /// Creates a new `ButtonDescriptor`.
    pub fn new(action: WindowAction, side: Side) -> Self {
        Self { action, side }
    }
}

/// An ordered, side-annotated list of window buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonLayout {
    /// Where the button group goes on the panel.
    pub position: Side,
    /// The buttons, in display order.
    pub buttons: Vec<ButtonDescriptor>,
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self::empty()
    }
}

impl ButtonLayout {
    /// A layout with no buttons configured.
    pub fn empty() -> Self {
        Self {
            position: Side::Right,
            buttons: Vec::new(),
        }
    }

    /// Creates a layout with all the given actions on one side.
    pub fn new<I>(position: Side, actions: I) -> Self
    where
        I: IntoIterator<Item = WindowAction>,
    {
        Self {
            position,
            buttons: actions
                .into_iter()
                .map(|action| ButtonDescriptor::new(action, position))
                .collect(),
        }
    }

    /// Parses a raw layout string.
    ///
    /// The buttons are taken from the left half if it holds any window
    /// actions, otherwise from the right half. Items that are not window
    /// actions are skipped, so a string with no actions in it at all
    /// yields an empty layout.
    ///
    /// ```rust
    /// use toarupanel::core::layout::ButtonLayout;
    /// use toarupanel::types::{Side, WindowAction::*};
    ///
    /// let layout = ButtonLayout::parse("appmenu:minimize,maximize,close");
    /// assert_eq!(layout, ButtonLayout::new(Side::Right, [Minimize, Maximize, Close]));
    ///
    /// let layout = ButtonLayout::parse("close,minimize:appmenu");
    /// assert_eq!(layout, ButtonLayout::new(Side::Left, [Close, Minimize]));
    ///
    /// assert!(ButtonLayout::parse("appmenu:").is_empty());
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut halves = raw.splitn(2, ':');
        let left = actions_in(halves.next().unwrap_or_default());
        let right = actions_in(halves.next().unwrap_or_default());

        let layout = if !left.is_empty() {
            Self::new(Side::Left, left)
        } else if !right.is_empty() {
            Self::new(Side::Right, right)
        } else {
            Self::empty()
        };

        trace!("parsed button layout '{}' into {:?}", raw, layout);
        layout
    }

    /// Whether there are no buttons in the layout.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// The number of buttons in the layout.
    #[inline]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// The actions of the buttons, in order.
    pub fn actions(&self) -> impl Iterator<Item = WindowAction> + '_ {
        self.buttons.iter().map(|b| b.action)
    }
}

fn actions_in(half: &str) -> Vec<WindowAction> {
    half.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| match item.parse::<WindowAction>() {
            Ok(action) => Some(action),
            Err(_) => {
                debug!("skipping layout item '{}'", item);
                None
            }
        })
        .collect()
}

/// A type that can supply the current window button layout.
pub trait LayoutParser {
    /// Returns the currently configured buttons and their position.
    ///
    /// An empty layout means no buttons are configured.
    fn window_buttons(&self) -> ButtonLayout;
}

/// A [`LayoutParser`] that reads the raw layout string from a
/// [`SettingsStore`].
#[derive(Debug)]
pub struct SettingsLayoutParser<S: SettingsStore> {
    settings: Rc<S>,
    key: String,
}

impl<S: SettingsStore> SettingsLayoutParser<S> {
    /// Creates a new parser reading from `key` in `settings`.
    pub fn new<K: Into<String>>(settings: Rc<S>, key: K) -> Self {
        Self {
            settings,
            key: key.into(),
        }
    }
}

impl<S: SettingsStore> LayoutParser for SettingsLayoutParser<S> {
    fn window_buttons(&self) -> ButtonLayout {
        match self.settings.get_string(&self.key) {
            Some(raw) => ButtonLayout::parse(&raw),
            None => {
                debug!("no button layout under key {}", self.key);
                ButtonLayout::empty()
            }
        }
    }
}
