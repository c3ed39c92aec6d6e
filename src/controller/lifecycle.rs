use custom_debug_derive::Debug;
use tracing::{debug, trace};

use crate::core::subscription::SubscriptionSet;
use crate::core::types::{HandlerId, PreferenceMode};
use crate::platform::{SettingsStore, Signal, SignalSource};
use crate::util::DefaultErrorHandler;
use crate::ErrorHandler;

/// The state of a decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// The decoration is switched off and holds no signal subscriptions.
    #[default]
    Inactive,
    /// The decoration is switched on and subscribed to all its signals.
    Active,
}

/// A preference a decoration watches for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// The decoration's [`PreferenceMode`].
    Mode,
    /// The decoration's theme.
    Theme,
}

/// The bookkeeping behind a decoration's lifecycle.
///
/// Holds the decoration's state and current mode, the signal subscriptions
/// that only exist while it is active, and the settings subscriptions that
/// exist for as long as it does.
#[derive(Debug)]
pub struct Lifecycle {
    state: State,
    mode: PreferenceMode,
    signals: SubscriptionSet<Signal>,
    settings: SubscriptionSet<Setting>,
    #[debug(skip)]
    errors: Box<dyn ErrorHandler>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Creates a new, inactive `Lifecycle` that logs its errors.
    pub fn new() -> Self {
        Self::with_error_handler(DefaultErrorHandler)
    }

    /// Creates a new, inactive `Lifecycle` with the given error handler.
    pub fn with_error_handler<E: ErrorHandler + 'static>(errors: E) -> Self {
        Self {
            state: State::Inactive,
            mode: PreferenceMode::Never,
            signals: SubscriptionSet::new(),
            settings: SubscriptionSet::new(),
            errors: Box::new(errors),
        }
    }

    /// The current state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the decoration is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    /// The mode last read from the settings.
    #[inline]
    pub fn mode(&self) -> PreferenceMode {
        self.mode
    }

    /// The error handler.
    pub fn errors(&self) -> &dyn ErrorHandler {
        self.errors.as_ref()
    }

    /// The live signal subscriptions.
    pub fn signals(&self) -> &SubscriptionSet<Signal> {
        &self.signals
    }

    /// The permanent settings subscriptions.
    pub fn settings(&self) -> &SubscriptionSet<Setting> {
        &self.settings
    }

    pub(crate) fn set_state(&mut self, state: State) {
        trace!("lifecycle {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Records a new mode, returning the previous one.
    pub(crate) fn set_mode(&mut self, mode: PreferenceMode) -> PreferenceMode {
        std::mem::replace(&mut self.mode, mode)
    }

    /// Connects to the settings keys, once.
    pub(crate) fn watch<S>(&mut self, store: &S, keys: &[(Setting, &str)])
    where
        S: SettingsStore + ?Sized,
    {
        let settings: Vec<Setting> = keys.iter().map(|(s, _)| *s).collect();
        self.settings.subscribe_all(&settings, |setting| {
            let key = keys
                .iter()
                .find(|(s, _)| *s == setting)
                .map(|(_, k)| *k)
                .unwrap_or_default();
            debug!("watching setting {}", key);
            store.connect_changed(key)
        });
    }

    pub(crate) fn subscribe<S>(&mut self, source: &S, signals: &[Signal])
    where
        S: SignalSource + ?Sized,
    {
        self.signals.subscribe_all(signals, |signal| {
            debug!("connecting to {} on {}", signal, signal.source());
            source.connect(signal)
        });
    }

    pub(crate) fn unsubscribe<S>(&mut self, source: &S)
    where
        S: SignalSource + ?Sized,
    {
        self.signals.unsubscribe_all(|id| source.disconnect(id));
    }

    /// Resolves a delivered handle.
    pub(crate) fn route(&self, id: HandlerId) -> Option<Route> {
        if let Some(setting) = self.settings.lookup(id) {
            return Some(Route::Setting(setting))
        }
        self.signals.lookup(id).map(Route::Signal)
    }
}

/// Where a delivered handle leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Setting(Setting),
    Signal(Signal),
}
