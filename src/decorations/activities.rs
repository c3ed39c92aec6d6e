//! The activities indicator decoration.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::PanelConfig;
use crate::controller::{Decoration, Lifecycle, Setting};
use crate::core::types::{Indicator, PreferenceMode};
use crate::platform::{Host, Signal};
use crate::ErrorHandler;

const SIGNALS: &[Signal] = &[
    Signal::FocusAppChanged,
    Signal::AppStateChanged,
    Signal::OverviewShowing,
    Signal::OverviewHiding,
];

/// Shows and hides the panel's activities indicator.
///
/// The indicator belongs to the host, so this decoration only ever shows or
/// hides it. When active, the indicator is hidden if:
///
/// - the mode is [`Always`](PreferenceMode::Always), or
/// - the app menu has a target and the overview is not visible.
///
/// If neither holds and the panel runs in its desktop-style variant, the
/// rule is inverted: the indicator is hidden unless the app menu has a
/// target or the overview is visible.
///
/// Deactivating the decoration shows the indicator again.
pub struct ActivitiesButton<H: Host> {
    host: Rc<H>,
    config: Rc<PanelConfig>,
    lifecycle: Lifecycle,
}

impl<H: Host> fmt::Debug for ActivitiesButton<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivitiesButton")
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl<H: Host> ActivitiesButton<H> {
    /// Creates a new `ActivitiesButton`, and toggles it according to
    /// the current preference.
    pub fn new(host: Rc<H>, config: Rc<PanelConfig>) -> Self {
        Self::with_lifecycle(host, config, Lifecycle::new())
    }

    /// Creates a new `ActivitiesButton` that reports errors to `errors`.
    pub fn with_error_handler<E>(host: Rc<H>, config: Rc<PanelConfig>, errors: E) -> Self
    where
        E: ErrorHandler + 'static,
    {
        Self::with_lifecycle(host, config, Lifecycle::with_error_handler(errors))
    }

    fn with_lifecycle(host: Rc<H>, config: Rc<PanelConfig>, lifecycle: Lifecycle) -> Self {
        let mut ret = Self {
            host,
            config,
            lifecycle,
        };

        ret.lifecycle.watch(ret.host.as_ref(), &[(Setting::Mode, ret.config.activities_key())]);
        ret.toggle();
        ret
    }

    /// Whether the indicator should be hidden right now.
    pub fn should_hide(&self) -> bool {
        let overview = self.host.overview_visible();
        let target = self.host.target_app().is_some();

        let mut hidden = self.mode() == PreferenceMode::Always || (target && !overview);

        if !hidden && self.host.desktop_mode() {
            hidden = !target && !overview;
        }

        hidden
    }

    /// Recomputes the indicator's visibility and applies it.
    pub fn recompute_visibility(&mut self) {
        if !self.host.has_indicator(Indicator::Activities) {
            trace!("no activities indicator on the panel");
            return
        }

        if self.should_hide() {
            debug!("hiding activities indicator");
            self.host.hide_indicator(Indicator::Activities);
        } else {
            debug!("showing activities indicator");
            self.host.show_indicator(Indicator::Activities);
        }
    }
}

impl<H: Host> Decoration for ActivitiesButton<H> {
    type Host = H;

    fn name(&self) -> &'static str {
        "activities"
    }

    fn host(&self) -> &Rc<H> {
        &self.host
    }

    fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn mode_key(&self) -> &str {
        self.config.activities_key()
    }

    fn signals(&self) -> &'static [Signal] {
        SIGNALS
    }

    fn show_default(&mut self) {
        if self.host.has_indicator(Indicator::Activities) {
            self.host.show_indicator(Indicator::Activities);
        }
    }

    fn update_visibility(&mut self) {
        self.recompute_visibility()
    }

    fn on_signal(&mut self, _: Signal) {
        self.recompute_visibility()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::core::types::{AppInfo, AppState};
    use crate::platform::dummy::{Call, DummyHost, ErrorLog};
    use crate::PanelError;

    const KEY: &str = "hide-activities-button";

    fn setup(mode: &str) -> (Rc<DummyHost>, ActivitiesButton<DummyHost>) {
        let host = Rc::new(DummyHost::new());
        host.set_setting(KEY, mode);
        let button = ActivitiesButton::new(Rc::clone(&host), Rc::new(PanelConfig::default()));
        (host, button)
    }

    fn change_mode(host: &DummyHost, button: &mut ActivitiesButton<DummyHost>, mode: &str) {
        for id in host.set_setting(KEY, mode) {
            button.notify(id);
        }
    }

    fn emit(host: &DummyHost, button: &mut ActivitiesButton<DummyHost>, signal: Signal) {
        for id in host.emit(signal) {
            button.notify(id);
        }
    }

    fn firefox() -> Option<AppInfo> {
        Some(AppInfo::new("firefox", AppState::Running))
    }

    #[test]
    fn test_never_stays_inactive() {
        let (host, button) = setup("never");

        assert!(!button.is_active());
        assert_eq!(button.subscription_count(), 0);
        assert_eq!(host.connection_count(), 0);
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(true));
    }

    #[test]
    fn test_activation_subscribes_once() {
        let (host, mut button) = setup("conditional");

        assert!(button.is_active());
        assert_eq!(button.subscription_count(), SIGNALS.len());

        button.toggle();
        button.activate();
        change_mode(&host, &mut button, "conditional");

        assert_eq!(button.subscription_count(), SIGNALS.len());
        assert_eq!(host.connection_count(), SIGNALS.len());
    }

    #[test]
    fn test_always_hides_regardless_of_state() {
        let (host, mut button) = setup("always");

        for (app, overview) in [(None, false), (None, true), (firefox(), false), (firefox(), true)] {
            host.set_target_app(app);
            host.set_overview(overview);
            button.recompute_visibility();

            assert_eq!(host.indicator_visible(Indicator::Activities), Some(false));
        }
    }

    #[test]
    fn test_conditional_follows_app_menu_and_overview() {
        let (host, mut button) = setup("conditional");
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(true));

        host.set_target_app(firefox());
        emit(&host, &mut button, Signal::FocusAppChanged);
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(false));

        host.set_overview(true);
        emit(&host, &mut button, Signal::OverviewShowing);
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(true));

        host.set_overview(false);
        host.set_target_app(None);
        emit(&host, &mut button, Signal::OverviewHiding);
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(true));
    }

    #[test]
    fn test_desktop_mode_inverts_rule() {
        let (host, mut button) = setup("conditional");
        host.set_desktop_mode(true);

        button.recompute_visibility();
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(false));

        host.set_overview(true);
        button.recompute_visibility();
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(true));
    }

    #[test]
    fn test_round_trip_restores_indicator() {
        let (host, mut button) = setup("always");
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(false));

        change_mode(&host, &mut button, "never");

        assert!(!button.is_active());
        assert_eq!(button.subscription_count(), 0);
        assert_eq!(host.connection_count(), 0);
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(true));
    }

    #[test]
    fn test_deactivation_disconnects_in_order() {
        let (host, mut button) = setup("conditional");
        let connected: Vec<_> = button.lifecycle().signals().iter().map(|s| s.id).collect();
        host.take_calls();

        button.deactivate();

        let disconnected: Vec<_> = host
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Disconnect(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(disconnected, connected);
    }

    #[test]
    fn test_no_delivery_after_deactivation() {
        let (host, mut button) = setup("conditional");
        let stale = host.emit(Signal::OverviewShowing);

        change_mode(&host, &mut button, "never");
        host.take_calls();

        for id in stale {
            assert!(!button.notify(id));
        }
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_mode_change_while_active_recomputes() {
        let (host, mut button) = setup("conditional");
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(true));

        change_mode(&host, &mut button, "always");

        assert_eq!(button.mode(), PreferenceMode::Always);
        assert_eq!(host.indicator_visible(Indicator::Activities), Some(false));
        assert_eq!(button.subscription_count(), SIGNALS.len());
    }

    #[test]
    fn test_missing_indicator_is_noop() {
        let host = Rc::new(DummyHost::new());
        host.remove_indicator(Indicator::Activities);
        host.set_setting(KEY, "always");

        let mut button = ActivitiesButton::new(Rc::clone(&host), Rc::new(PanelConfig::default()));
        button.deactivate();

        let touched = host.calls().into_iter().any(|c| {
            matches!(c, Call::ShowIndicator(_) | Call::HideIndicator(_))
        });
        assert!(!touched);
    }

    #[test]
    fn test_unknown_mode_falls_back() {
        let (host, button) = setup("sometimes");

        assert_eq!(button.mode(), PreferenceMode::Never);
        assert!(!button.is_active());
        assert_eq!(host.connection_count(), 0);
    }

    #[test]
    fn test_unknown_mode_is_reported() {
        let host = Rc::new(DummyHost::new());
        host.set_setting(KEY, "sometimes");
        let errors = ErrorLog::new();

        let mut button = ActivitiesButton::with_error_handler(
            Rc::clone(&host),
            Rc::new(PanelConfig::default()),
            errors.clone(),
        );

        assert!(!button.is_active());
        let reported = errors.take();
        assert_eq!(reported.len(), 1);
        assert!(matches!(
            &reported[0],
            PanelError::UnknownMode { key, value } if key == KEY && value == "sometimes"
        ));

        change_mode(&host, &mut button, "always");
        assert!(button.is_active());
        assert!(errors.is_empty());
    }
}
