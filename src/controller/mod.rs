//! The lifecycle shared by every decoration.
//!
//! A decoration is driven by a [`PreferenceMode`] stored in the settings.
//! It starts out [`Inactive`](State::Inactive), and moves between its two
//! states as the preference changes:
//!
//! ```text
//! Inactive --(mode != Never)--> Active --(mode == Never)--> Inactive
//! ```
//!
//! While active, a decoration is subscribed to every [`Signal`] it declares,
//! exactly once. While inactive, it is subscribed to none. Its subscription
//! to its own mode preference is made once at construction and lives as
//! long as the decoration does.
//!
//! The [`Decoration`] trait provides this lifecycle. Implementors supply the
//! hooks that differ between decorations (what to set up, how to compute
//! visibility, which signals to listen to), and get `toggle`, `activate`,
//! `deactivate` and `notify` for free.

mod lifecycle;

pub use lifecycle::{Lifecycle, Setting, State};
pub(crate) use lifecycle::Route;

use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::config::PanelConfig;
use crate::core::types::{HandlerId, PreferenceMode};
use crate::platform::{Host, SettingsStore, Signal};
use crate::PanelError;

/// A panel decoration with a preference-driven lifecycle.
pub trait Decoration {
    /// The host the decoration runs in.
    type Host: Host;

    /// A short name for the decoration, used in logs.
    fn name(&self) -> &'static str;

    /// The host the decoration runs in.
    fn host(&self) -> &Rc<Self::Host>;

    /// The configuration shared by the decorations.
    fn config(&self) -> &PanelConfig;

    /// The decoration's lifecycle bookkeeping.
    fn lifecycle(&self) -> &Lifecycle;

    /// The decoration's lifecycle bookkeeping, mutably.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// The settings key holding the decoration's mode.
    fn mode_key(&self) -> &str;

    /// The signals the decoration listens to while active.
    fn signals(&self) -> &'static [Signal];

    /// Decoration-specific setup, run on activation before the
    /// initial visibility is computed.
    fn on_activate(&mut self) {}

    /// Decoration-specific teardown, run on deactivation after all
    /// signals have been disconnected.
    fn on_deactivate(&mut self) {}

    /// Puts the decoration back in its default, shown state.
    fn show_default(&mut self) {}

    /// Recomputes whether the decoration is shown, and applies it.
    fn update_visibility(&mut self);

    /// Handles a signal the decoration subscribed to.
    fn on_signal(&mut self, signal: Signal);

    /// Handles a change to a watched setting.
    fn on_setting(&mut self, setting: Setting) {
        if let Setting::Mode = setting {
            self.toggle()
        }
    }

    /// Whether the decoration is active.
    fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }

    /// The mode last read from the settings.
    fn mode(&self) -> PreferenceMode {
        self.lifecycle().mode()
    }

    /// The number of live signal subscriptions.
    fn subscription_count(&self) -> usize {
        self.lifecycle().signals().len()
    }

    /// Reads the decoration's mode from the settings.
    ///
    /// A missing key or an unknown value yields the configured
    /// fallback mode. Unknown values are also reported to the
    /// error handler.
    fn read_mode(&self) -> PreferenceMode {
        let key = self.mode_key();
        let fallback = self.config().fallback_mode();

        let Some(raw) = self.host().get_string(key) else {
            debug!("{} is unset, assuming {}", key, fallback);
            return fallback
        };

        raw.parse().unwrap_or_else(|_| {
            self.lifecycle().errors().call(PanelError::UnknownMode {
                key: key.into(),
                value: raw,
            });
            fallback
        })
    }

    /// Reads the mode, and activates or deactivates the decoration
    /// to match it.
    ///
    /// Calling this repeatedly with the same mode has no further effect.
    /// If the decoration is already active and the mode changed between
    /// two enabled values, the visibility is recomputed for the new mode.
    #[instrument(level = "debug", skip_all, fields(decoration = self.name()))]
    fn toggle(&mut self) {
        let mode = self.read_mode();
        let previous = self.lifecycle_mut().set_mode(mode);
        debug!("mode is {}", mode);

        if !mode.is_enabled() {
            self.deactivate();
        } else if !self.is_active() {
            self.activate();
        } else if previous != mode {
            self.update_visibility();
        }
    }

    /// Activates the decoration.
    ///
    /// No-op if the decoration is already active.
    #[instrument(level = "debug", skip_all, fields(decoration = self.name()))]
    fn activate(&mut self) {
        if self.is_active() {
            trace!("already active");
            return
        }

        self.lifecycle_mut().set_state(State::Active);
        self.on_activate();
        self.update_visibility();

        let host = Rc::clone(self.host());
        let signals = self.signals();
        self.lifecycle_mut().subscribe(host.as_ref(), signals);
    }

    /// Deactivates the decoration, leaving it in its default state.
    ///
    /// No-op if the decoration is already inactive.
    #[instrument(level = "debug", skip_all, fields(decoration = self.name()))]
    fn deactivate(&mut self) {
        if !self.is_active() {
            trace!("already inactive");
            return
        }

        self.show_default();

        let host = Rc::clone(self.host());
        self.lifecycle_mut().unsubscribe(host.as_ref());
        self.on_deactivate();
        self.lifecycle_mut().set_state(State::Inactive);
    }

    /// Delivers a handle previously returned by the host on connection.
    ///
    /// Returns whether the handle was live. Handles that were disconnected,
    /// or were never issued to this decoration, are ignored.
    fn notify(&mut self, id: HandlerId) -> bool {
        match self.lifecycle().route(id) {
            Some(Route::Setting(setting)) => {
                trace!("{} delivered setting {:?}", id, setting);
                self.on_setting(setting);
                true
            }
            Some(Route::Signal(signal)) => {
                trace!("{} delivered signal {}", id, signal);
                self.on_signal(signal);
                true
            }
            None => {
                trace!("ignoring stale handle {}", id);
                false
            }
        }
    }
}
