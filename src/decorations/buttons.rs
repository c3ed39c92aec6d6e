//! The window buttons decoration.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::config::PanelConfig;
use crate::controller::{Decoration, Lifecycle, Setting};
use crate::core::layout::{ButtonDescriptor, ButtonLayout, LayoutParser, SettingsLayoutParser};
use crate::core::types::{ButtonId, MaximizeFlags, PreferenceMode, Side, WindowAction};
use crate::core::window::{StandardPolicy, WindowPolicy};
use crate::platform::{Container, Host, Panel, ShellWindow, Signal};
use crate::ErrorHandler;

use super::theme::{ThemeHandle, ThemeSlot};

const SIGNALS: &[Signal] = &[
    Signal::ButtonLayoutChanged,
    Signal::FocusWindowChanged,
    Signal::OverviewShowing,
    Signal::OverviewHiding,
    Signal::WindowSizeChanged,
    Signal::WindowDestroyed,
];

/// A group of window buttons on the panel.
///
/// Owns its container widget, and the table mapping each of its buttons
/// to the action it performs. A group is never patched in place: when the
/// layout changes it is destroyed and built again.
#[derive(Debug)]
pub struct ButtonGroup<C: Container> {
    position: Side,
    buttons: Vec<ButtonDescriptor>,
    container: C,
    dispatch: HashMap<ButtonId, WindowAction>,
}

impl<C: Container> ButtonGroup<C> {
    /// Builds a group for `layout` and inserts it into `panel`, hidden.
    ///
    /// Returns `None` if the layout has no buttons.
    pub fn build<P>(panel: &P, layout: ButtonLayout, config: &PanelConfig) -> Option<Self>
    where
        P: Panel<Container = C> + ?Sized,
    {
        if layout.is_empty() {
            return None
        }

        let container = panel.new_container(config.container_style());
        container.hide();

        let dispatch = layout
            .buttons
            .iter()
            .map(|button| {
                let class = format!("{} {}", config.button_style(), button.action);
                (container.add_button(button.action, &class), button.action)
            })
            .collect();

        panel.insert_container(&container, layout.position);

        Some(Self {
            position: layout.position,
            buttons: layout.buttons,
            container,
            dispatch,
        })
    }

    /// The action performed by a button of this group.
    pub fn action(&self, id: ButtonId) -> Option<WindowAction> {
        self.dispatch.get(&id).copied()
    }

    /// Where the group sits on the panel.
    pub fn position(&self) -> Side {
        self.position
    }

    /// The buttons in the group, in order.
    pub fn buttons(&self) -> &[ButtonDescriptor] {
        &self.buttons
    }

    /// Whether the group is shown.
    pub fn is_visible(&self) -> bool {
        self.container.is_visible()
    }

    /// Shows or hides the group.
    pub fn set_visible(&self, visible: bool) {
        if visible {
            self.container.show()
        } else {
            self.container.hide()
        }
    }

    /// Removes the group from the panel and releases it.
    pub fn destroy(self) {
        self.container.destroy()
    }
}

/// Performs `action` on `window`.
///
/// - `Minimize` minimizes the window, unless it already is.
/// - `Maximize` unmaximizes a window maximized along both axes, and fully
///   maximizes any other window.
/// - `Close` asks the window to close, stamped with `timestamp`.
pub fn perform_action<W: ShellWindow>(action: WindowAction, window: &W, timestamp: u32) {
    debug!("performing {} on window {:?}", action, window.id());

    match action {
        WindowAction::Minimize => {
            if !window.minimized() {
                window.minimize()
            }
        }
        WindowAction::Maximize => {
            if window.maximized() == MaximizeFlags::BOTH {
                window.unmaximize(MaximizeFlags::BOTH)
            } else {
                window.maximize(MaximizeFlags::BOTH)
            }
        }
        WindowAction::Close => window.delete(timestamp),
    }
}

/// Shows minimize/maximize/close buttons for the focused window on the panel.
///
/// While active, the decoration owns a [`ButtonGroup`] built from the
/// current button layout, and the stylesheet of the configured theme. The
/// group is shown when:
///
/// - the overview is hidden, the focused window is valid, and either the
///   mode is [`Always`](PreferenceMode::Always) or the window is maximized
///   as the [`WindowPolicy`] requires for the mode, or
/// - failing a valid focused window, a running app is focused outside
///   the overview.
pub struct WindowButtons<H: Host> {
    host: Rc<H>,
    config: Rc<PanelConfig>,
    lifecycle: Lifecycle,
    parser: Box<dyn LayoutParser>,
    policy: Box<dyn WindowPolicy<H::Window>>,
    group: Option<ButtonGroup<H::Container>>,
    theme: ThemeSlot,
}

impl<H: Host> fmt::Debug for WindowButtons<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowButtons")
            .field("lifecycle", &self.lifecycle)
            .field("group", &self.group)
            .field("theme", &self.theme)
            .finish()
    }
}

impl<H: Host + 'static> WindowButtons<H> {
    /// Creates a new `WindowButtons`, and toggles it according to
    /// the current preference.
    ///
    /// The layout is read from the settings store, and windows are
    /// judged by a [`StandardPolicy`].
    pub fn new(host: Rc<H>, config: Rc<PanelConfig>) -> Self {
        let parser = SettingsLayoutParser::new(Rc::clone(&host), config.layout_key());
        let policy = StandardPolicy::new(config.maximize().clone());

        Self::with_parts(host, config, Box::new(parser), Box::new(policy), Lifecycle::new())
    }

    /// Creates a new `WindowButtons` that reports errors to `errors`.
    pub fn with_error_handler<E>(host: Rc<H>, config: Rc<PanelConfig>, errors: E) -> Self
    where
        E: ErrorHandler + 'static,
    {
        let parser = SettingsLayoutParser::new(Rc::clone(&host), config.layout_key());
        let policy = StandardPolicy::new(config.maximize().clone());
        let lifecycle = Lifecycle::with_error_handler(errors);

        Self::with_parts(host, config, Box::new(parser), Box::new(policy), lifecycle)
    }
}

impl<H: Host> WindowButtons<H> {
    /// Creates a new `WindowButtons` from its parts, and toggles it
    /// according to the current preference.
    pub fn with_parts(
        host: Rc<H>,
        config: Rc<PanelConfig>,
        parser: Box<dyn LayoutParser>,
        policy: Box<dyn WindowPolicy<H::Window>>,
        lifecycle: Lifecycle,
    ) -> Self {
        let mut ret = Self {
            host,
            config,
            lifecycle,
            parser,
            policy,
            group: None,
            theme: ThemeSlot::new(),
        };

        ret.lifecycle.watch(ret.host.as_ref(), &[
            (Setting::Mode, ret.config.buttons_key()),
            (Setting::Theme, ret.config.theme_key()),
        ]);
        ret.toggle();
        ret
    }

    /// The button group, if one exists.
    pub fn group(&self) -> Option<&ButtonGroup<H::Container>> {
        self.group.as_ref()
    }

    /// The loaded theme, if any.
    pub fn theme(&self) -> Option<&ThemeHandle> {
        self.theme.current()
    }

    /// Builds the button group from the current layout.
    ///
    /// No-op if a group already exists or the layout has no buttons.
    pub fn create_buttons(&mut self) {
        if self.group.is_some() {
            trace!("button group already exists");
            return
        }

        let layout = self.parser.window_buttons();
        self.group = ButtonGroup::build(self.host.as_ref(), layout, &self.config);

        match &self.group {
            Some(group) => info!(
                "created {} window buttons on the {}",
                group.buttons().len(),
                group.position()
            ),
            None => debug!("no window buttons configured"),
        }
    }

    /// Destroys the button group. No-op if there is none.
    pub fn destroy_buttons(&mut self) {
        if let Some(group) = self.group.take() {
            debug!("destroying window buttons");
            group.destroy();
        }
    }

    /// Rebuilds an existing button group from the current layout.
    pub fn update_buttons(&mut self) {
        if self.group.is_some() {
            self.destroy_buttons();
            self.create_buttons();
            self.recompute_visibility();
        }
    }

    /// Swaps the loaded theme for the one currently configured, and
    /// reloads the host's styles.
    ///
    /// Ignored while inactive; the theme is picked up on activation.
    pub fn update_theme(&mut self) {
        if !self.is_active() {
            trace!("inactive, not updating theme");
            return
        }

        self.theme.unload(self.host.as_ref());
        self.load_theme();
        self.host.reload();
    }

    fn load_theme(&mut self) {
        let Some(name) = self.host.get_string(self.config.theme_key()) else {
            debug!("no window buttons theme configured");
            self.theme.unload(self.host.as_ref());
            return
        };

        if let Err(e) = self.theme.load(self.host.as_ref(), &self.config, &name) {
            self.lifecycle.errors().call(e);
        }
    }

    /// Handles a click on one of the group's buttons.
    ///
    /// No-op if the button is not part of the current group, or if no
    /// window is focused.
    pub fn on_button_click(&self, id: ButtonId) {
        let Some(action) = self.group.as_ref().and_then(|g| g.action(id)) else {
            trace!("click on unknown button {:?}", id);
            return
        };

        let Some(window) = self.host.focus_window() else {
            trace!("no focused window for {}", action);
            return
        };

        perform_action(action, &window, self.host.current_time());
    }

    /// Whether the button group should be shown right now.
    ///
    /// Returns `None` if there is no group.
    pub fn should_show(&self) -> Option<bool> {
        self.group.as_ref()?;

        let window = self.host.focus_window();
        let overview = self.host.overview_visible();
        let running = self.host.target_app().is_some_and(|app| app.is_running());

        let mut visible = running && !overview;

        if let Some(window) = window.filter(|w| !overview && self.policy.is_valid(w)) {
            let mode = self.mode();
            let maximized = self.policy.is_maximized(&window, mode);
            let always = mode == PreferenceMode::Always;

            visible = always || maximized;
        }

        Some(visible)
    }

    /// Recomputes the button group's visibility and applies it.
    ///
    /// No-op if there is no group.
    pub fn recompute_visibility(&mut self) {
        let Some(visible) = self.should_show() else {
            return
        };

        if let Some(group) = &self.group {
            trace!("window buttons visible: {}", visible);
            group.set_visible(visible);
        }
    }
}

impl<H: Host> Decoration for WindowButtons<H> {
    type Host = H;

    fn name(&self) -> &'static str {
        "window-buttons"
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
        self.config.buttons_key()
    }

    fn signals(&self) -> &'static [Signal] {
        SIGNALS
    }

    fn on_activate(&mut self) {
        self.create_buttons();
        self.load_theme();
    }

    fn on_deactivate(&mut self) {
        self.destroy_buttons();
        self.theme.unload(self.host.as_ref());
    }

    fn update_visibility(&mut self) {
        self.recompute_visibility()
    }

    fn on_signal(&mut self, signal: Signal) {
        match signal {
            Signal::ButtonLayoutChanged => self.update_buttons(),
            _ => self.recompute_visibility(),
        }
    }

    fn on_setting(&mut self, setting: Setting) {
        match setting {
            Setting::Mode => self.toggle(),
            Setting::Theme => self.update_theme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::config::no_checks;
    use crate::core::types::{AppInfo, AppState, WindowAction::*, WindowType};
    use crate::platform::dummy::{Call, DummyHost, ErrorLog};
    use crate::PanelError;

    const MODE: &str = "show-window-buttons";
    const THEME: &str = "window-buttons-theme";
    const LAYOUT: &str = "button-layout";

    type Buttons = WindowButtons<DummyHost>;

    fn config() -> Rc<PanelConfig> {
        Rc::new(
            PanelConfig::builder()
                .themes_dir("/themes")
                .finish(no_checks)
                .unwrap(),
        )
    }

    fn host(mode: &str) -> Rc<DummyHost> {
        let host = Rc::new(DummyHost::new());
        host.set_setting(MODE, mode);
        host.set_setting(LAYOUT, "appmenu:minimize,maximize,close");
        host
    }

    fn setup(mode: &str) -> (Rc<DummyHost>, Buttons) {
        let host = host(mode);
        let buttons = WindowButtons::new(Rc::clone(&host), config());
        (host, buttons)
    }

    fn emit(host: &DummyHost, buttons: &mut Buttons, signal: Signal) {
        for id in host.emit(signal) {
            buttons.notify(id);
        }
    }

    fn set(host: &DummyHost, buttons: &mut Buttons, key: &str, value: &str) {
        for id in host.set_setting(key, value) {
            buttons.notify(id);
        }
    }

    fn visible(buttons: &Buttons) -> Option<bool> {
        buttons.group().map(|g| g.is_visible())
    }

    fn button_for(buttons: &Buttons, action: WindowAction) -> ButtonId {
        let host = buttons.host();
        let containers = host.containers();
        let (_, state) = containers.iter().next().expect("no container");
        state
            .buttons
            .iter()
            .find(|(_, a, _)| *a == action)
            .map(|(id, _, _)| *id)
            .expect("no such button")
    }

    #[test]
    fn test_activation_builds_group() {
        let (host, buttons) = setup("conditional");

        assert!(buttons.is_active());
        assert_eq!(buttons.subscription_count(), SIGNALS.len());

        let group = buttons.group().expect("no group");
        assert_eq!(group.position(), Side::Right);
        assert_eq!(group.buttons().len(), 3);
        assert!(!group.is_visible());

        let containers = host.containers();
        let (_, state) = containers.iter().next().unwrap();
        assert_eq!(state.style_class, "window-buttons-box");
        assert_eq!(state.side, Some(Side::Right));
        assert_eq!(state.buttons[1].2, "window-button maximize");
    }

    #[test]
    fn test_empty_layout_builds_nothing() {
        let host = host("conditional");
        host.set_setting(LAYOUT, "appmenu:");
        let mut buttons = WindowButtons::new(Rc::clone(&host), config());

        assert!(buttons.is_active());
        assert!(buttons.group().is_none());

        host.take_calls();
        host.set_focus_window(Some(host.new_window(1).with_maximized(MaximizeFlags::BOTH)));
        buttons.recompute_visibility();

        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_shown_for_maximized_window() {
        let (host, mut buttons) = setup("conditional");
        let window = host.new_window(1).with_maximized(MaximizeFlags::BOTH);

        host.set_focus_window(Some(window.clone()));
        emit(&host, &mut buttons, Signal::FocusWindowChanged);
        assert_eq!(visible(&buttons), Some(true));

        window.set_maximized(MaximizeFlags::empty());
        emit(&host, &mut buttons, Signal::WindowSizeChanged);
        assert_eq!(visible(&buttons), Some(false));

        window.set_maximized(MaximizeFlags::VERTICAL);
        emit(&host, &mut buttons, Signal::WindowSizeChanged);
        assert_eq!(visible(&buttons), Some(false));
    }

    #[test]
    fn test_hidden_in_overview() {
        let (host, mut buttons) = setup("always");
        host.set_focus_window(Some(host.new_window(1)));
        host.set_target_app(Some(AppInfo::new("gedit", AppState::Running)));

        emit(&host, &mut buttons, Signal::FocusWindowChanged);
        assert_eq!(visible(&buttons), Some(true));

        host.set_overview(true);
        emit(&host, &mut buttons, Signal::OverviewShowing);
        assert_eq!(visible(&buttons), Some(false));
    }

    #[test]
    fn test_running_app_without_valid_window() {
        let (host, mut buttons) = setup("conditional");
        host.set_focus_window(Some(host.new_window(1).with_type(WindowType::Desktop)));
        host.set_target_app(Some(AppInfo::new("nautilus", AppState::Running)));

        emit(&host, &mut buttons, Signal::FocusWindowChanged);
        assert_eq!(visible(&buttons), Some(true));

        host.set_target_app(Some(AppInfo::new("nautilus", AppState::Starting)));
        emit(&host, &mut buttons, Signal::WindowDestroyed);
        assert_eq!(visible(&buttons), Some(false));
    }

    #[test]
    fn test_maximize_click_toggles() {
        let (host, buttons) = setup("conditional");
        let window = host.new_window(7).with_maximized(MaximizeFlags::BOTH);
        host.set_focus_window(Some(window.clone()));
        let maximize = button_for(&buttons, Maximize);
        host.take_calls();

        buttons.on_button_click(maximize);
        assert_eq!(host.take_calls(), vec![Call::Unmaximize(7, MaximizeFlags::BOTH)]);

        window.set_maximized(MaximizeFlags::HORIZONTAL);
        buttons.on_button_click(maximize);
        assert_eq!(host.take_calls(), vec![Call::Maximize(7, MaximizeFlags::BOTH)]);
    }

    #[test]
    fn test_minimize_click_skips_minimized() {
        let (host, buttons) = setup("conditional");
        let window = host.new_window(3);
        host.set_focus_window(Some(window.clone()));
        let minimize = button_for(&buttons, Minimize);
        host.take_calls();

        buttons.on_button_click(minimize);
        assert_eq!(host.take_calls(), vec![Call::Minimize(3)]);

        buttons.on_button_click(minimize);
        assert!(host.take_calls().is_empty());
    }

    #[test]
    fn test_close_click_uses_current_time() {
        let (host, buttons) = setup("conditional");
        let window = host.new_window(5);
        host.set_focus_window(Some(window.clone()));
        host.set_time(1234);
        let close = button_for(&buttons, Close);

        buttons.on_button_click(close);

        assert!(window.is_closed());
        assert!(host.calls().contains(&Call::Delete(5, 1234)));
    }

    #[test]
    fn test_click_without_focus_is_noop() {
        let (host, buttons) = setup("conditional");
        let close = button_for(&buttons, Close);
        host.take_calls();

        buttons.on_button_click(close);
        buttons.on_button_click(ButtonId(9999));

        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_layout_change_rebuilds_once() {
        let (host, mut buttons) = setup("conditional");
        host.take_calls();

        host.set_setting(LAYOUT, "close,minimize:appmenu");
        emit(&host, &mut buttons, Signal::ButtonLayoutChanged);

        let calls = host.calls();
        let destroyed = calls.iter().filter(|c| matches!(c, Call::DestroyContainer(_))).count();
        let created = calls.iter().filter(|c| matches!(c, Call::NewContainer(_))).count();
        assert_eq!((destroyed, created), (1, 1));

        let destroy_at = calls.iter().position(|c| matches!(c, Call::DestroyContainer(_)));
        let create_at = calls.iter().position(|c| matches!(c, Call::NewContainer(_)));
        assert!(destroy_at < create_at);

        let group = buttons.group().unwrap();
        assert_eq!(group.position(), Side::Left);
        assert_eq!(
            group.buttons().iter().map(|b| b.action).collect::<Vec<_>>(),
            [Close, Minimize]
        );
        assert_eq!(host.containers().len(), 1);
    }

    #[test]
    fn test_stale_click_after_rebuild() {
        let (host, mut buttons) = setup("conditional");
        host.set_focus_window(Some(host.new_window(1)));
        let old_close = button_for(&buttons, Close);

        emit(&host, &mut buttons, Signal::ButtonLayoutChanged);
        host.take_calls();

        buttons.on_button_click(old_close);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_theme_switch() {
        let host = host("conditional");
        host.set_setting(THEME, "arc");
        host.add_stylesheet("/themes/arc/stylesheet.css");
        host.add_stylesheet("/themes/zen/stylesheet.css");

        let mut buttons = WindowButtons::new(Rc::clone(&host), config());
        assert_eq!(buttons.theme().map(|t| t.name()), Some("arc"));
        host.take_calls();

        set(&host, &mut buttons, THEME, "zen");

        assert_eq!(host.take_calls(), vec![
            Call::UnloadStylesheet("/themes/arc/stylesheet.css".into()),
            Call::LoadStylesheet("/themes/zen/stylesheet.css".into()),
            Call::ReloadTheme,
        ]);
        assert_eq!(buttons.theme().map(|t| t.name()), Some("zen"));

        set(&host, &mut buttons, THEME, "missing");

        assert_eq!(host.take_calls(), vec![
            Call::UnloadStylesheet("/themes/zen/stylesheet.css".into()),
            Call::ReloadTheme,
        ]);
        assert!(buttons.theme().is_none());
        assert!(host.loaded_stylesheets().is_empty());
    }

    #[test]
    fn test_invalid_theme_name_is_reported() {
        let host = host("conditional");
        host.set_setting(THEME, "arc");
        host.add_stylesheet("/themes/arc/stylesheet.css");
        host.add_stylesheet("/etc/stylesheet.css");

        let errors = ErrorLog::new();
        let mut buttons =
            WindowButtons::with_error_handler(Rc::clone(&host), config(), errors.clone());
        assert!(errors.is_empty());
        host.take_calls();

        set(&host, &mut buttons, THEME, "../etc");

        let calls = host.take_calls();
        assert!(!calls.iter().any(|c| matches!(c, Call::LoadStylesheet(_))));
        assert!(calls.contains(&Call::UnloadStylesheet("/themes/arc/stylesheet.css".into())));
        assert!(buttons.theme().is_none());
        assert!(host.loaded_stylesheets().is_empty());

        let reported = errors.take();
        assert_eq!(reported.len(), 1);
        assert!(matches!(&reported[0], PanelError::InvalidTheme(name) if name == "../etc"));
    }

    #[test]
    fn test_theme_change_while_inactive_is_ignored() {
        let (host, mut buttons) = setup("never");
        host.add_stylesheet("/themes/arc/stylesheet.css");

        set(&host, &mut buttons, THEME, "arc");
        assert!(buttons.theme().is_none());

        set(&host, &mut buttons, MODE, "always");
        assert_eq!(buttons.theme().map(|t| t.name()), Some("arc"));
    }

    #[test]
    fn test_round_trip_releases_everything() {
        let (host, mut buttons) = setup("conditional");
        host.add_stylesheet("/themes/arc/stylesheet.css");
        set(&host, &mut buttons, THEME, "arc");

        set(&host, &mut buttons, MODE, "never");

        assert!(!buttons.is_active());
        assert!(buttons.group().is_none());
        assert!(buttons.theme().is_none());
        assert_eq!(buttons.subscription_count(), 0);
        assert_eq!(host.connection_count(), 0);
        assert!(host.containers().is_empty());
        assert!(host.loaded_stylesheets().is_empty());
    }

    #[test]
    fn test_repeated_toggles_are_idempotent() {
        let (host, mut buttons) = setup("conditional");

        for mode in ["conditional", "always", "conditional", "never", "never", "always"] {
            set(&host, &mut buttons, MODE, mode);
            buttons.toggle();

            let expected = if mode == "never" { 0 } else { SIGNALS.len() };
            assert_eq!(buttons.subscription_count(), expected);
            assert_eq!(host.connection_count(), expected);
            assert!(host.containers().len() <= 1);
        }
    }
}
