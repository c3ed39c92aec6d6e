//! A dummy host that implements every capability trait in memory.
//!
//! `DummyHost` does not talk to any real shell. It keeps the state a
//! decoration observes (focus, overview, settings, panel widgets) in plain
//! cells, lets you change that state from the outside, and records every
//! capability call a decoration makes as a [`Call`], in order.
//!
//! Event delivery is left to the caller: [`DummyHost::emit`] and
//! [`DummyHost::set_setting`] return the handles currently connected to the
//! event, which should then be passed to [`Decoration::notify`][1].
//!
//! [1]: crate::controller::Decoration::notify

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{Container, Panel, SettingsStore, Shell, ShellWindow, Signal, SignalSource, ThemeContext};
use crate::{ErrorHandler, PanelError};
use crate::core::types::{
    AppInfo, ButtonId, HandlerId, Indicator, MaximizeFlags, Side, WindowAction, WindowType,
};

/// A single capability call made against a [`DummyHost`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect(Signal, HandlerId),
    Disconnect(HandlerId),
    ConnectSetting(String, HandlerId),
    ShowIndicator(Indicator),
    HideIndicator(Indicator),
    NewContainer(u64),
    AddButton(u64, WindowAction),
    InsertContainer(u64, Side),
    ShowContainer(u64),
    HideContainer(u64),
    DestroyContainer(u64),
    LoadStylesheet(PathBuf),
    UnloadStylesheet(PathBuf),
    ReloadTheme,
    Minimize(u32),
    Maximize(u32, MaximizeFlags),
    Unmaximize(u32, MaximizeFlags),
    Delete(u32, u32),
}

type CallLog = Rc<RefCell<Vec<Call>>>;

/// The state of a container created through a [`DummyHost`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerState {
    /// The style class it was created with.
    pub style_class: String,
    /// Whether it is shown.
    pub visible: bool,
    /// Where it was inserted, if it was.
    pub side: Option<Side>,
    /// Its buttons, in order.
    pub buttons: Vec<(ButtonId, WindowAction, String)>,
}

type Containers = Rc<RefCell<BTreeMap<u64, ContainerState>>>;

#[derive(Debug, Clone)]
struct WindowData {
    window_type: WindowType,
    skip_taskbar: bool,
    maximized: MaximizeFlags,
    minimized: bool,
    primary: bool,
    closed: bool,
}

/// A window handle backed by shared in-memory state.
///
/// Clones of a `DummyWindow` refer to the same window.
#[derive(Debug, Clone)]
pub struct DummyWindow {
    id: u32,
    data: Rc<RefCell<WindowData>>,
    log: CallLog,
}

impl DummyWindow {
    /// Creates a normal, unmaximized window that records its calls privately.
    pub fn new(id: u32) -> Self {
        Self::with_log(id, Rc::new(RefCell::new(Vec::new())))
    }

    fn with_log(id: u32, log: CallLog) -> Self {
        Self {
            id,
            data: Rc::new(RefCell::new(WindowData {
                window_type: WindowType::Normal,
                skip_taskbar: false,
                maximized: MaximizeFlags::empty(),
                minimized: false,
                primary: true,
                closed: false,
            })),
            log,
        }
    }

    /// Sets the window type.
    pub fn with_type(self, window_type: WindowType) -> Self {
        self.data.borrow_mut().window_type = window_type;
        self
    }

    /// Sets whether the window skips the taskbar.
    pub fn with_skip_taskbar(self, skip: bool) -> Self {
        self.data.borrow_mut().skip_taskbar = skip;
        self
    }

    /// Sets the window's maximization.
    pub fn with_maximized(self, flags: MaximizeFlags) -> Self {
        self.set_maximized(flags);
        self
    }

    /// Sets whether the window is minimized.
    pub fn with_minimized(self, minimized: bool) -> Self {
        self.data.borrow_mut().minimized = minimized;
        self
    }

    /// Sets whether the window is on the primary monitor.
    pub fn with_primary_monitor(self, primary: bool) -> Self {
        self.data.borrow_mut().primary = primary;
        self
    }

    /// Changes the window's maximization in place, as the user would.
    pub fn set_maximized(&self, flags: MaximizeFlags) {
        self.data.borrow_mut().maximized = flags;
    }

    /// Whether `delete` has been called on the window.
    pub fn is_closed(&self) -> bool {
        self.data.borrow().closed
    }
}

impl ShellWindow for DummyWindow {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn window_type(&self) -> WindowType {
        self.data.borrow().window_type
    }

    fn skip_taskbar(&self) -> bool {
        self.data.borrow().skip_taskbar
    }

    fn maximized(&self) -> MaximizeFlags {
        self.data.borrow().maximized
    }

    fn minimized(&self) -> bool {
        self.data.borrow().minimized
    }

    fn is_on_primary_monitor(&self) -> bool {
        self.data.borrow().primary
    }

    fn minimize(&self) {
        self.log.borrow_mut().push(Call::Minimize(self.id));
        self.data.borrow_mut().minimized = true;
    }

    fn maximize(&self, flags: MaximizeFlags) {
        self.log.borrow_mut().push(Call::Maximize(self.id, flags));
        self.data.borrow_mut().maximized.insert(flags);
    }

    fn unmaximize(&self, flags: MaximizeFlags) {
        self.log.borrow_mut().push(Call::Unmaximize(self.id, flags));
        self.data.borrow_mut().maximized.remove(flags);
    }

    fn delete(&self, timestamp: u32) {
        self.log.borrow_mut().push(Call::Delete(self.id, timestamp));
        self.data.borrow_mut().closed = true;
    }
}

/// A container created by a [`DummyHost`].
#[derive(Debug)]
pub struct DummyContainer {
    id: u64,
    containers: Containers,
    next_button: Rc<Cell<u64>>,
    log: CallLog,
}

impl Container for DummyContainer {
    fn add_button(&self, action: WindowAction, style_class: &str) -> ButtonId {
        let id = ButtonId(self.next_button.get());
        self.next_button.set(id.0 + 1);

        self.log.borrow_mut().push(Call::AddButton(self.id, action));
        if let Some(state) = self.containers.borrow_mut().get_mut(&self.id) {
            state.buttons.push((id, action, style_class.into()));
        }
        id
    }

    fn show(&self) {
        self.log.borrow_mut().push(Call::ShowContainer(self.id));
        if let Some(state) = self.containers.borrow_mut().get_mut(&self.id) {
            state.visible = true;
        }
    }

    fn hide(&self) {
        self.log.borrow_mut().push(Call::HideContainer(self.id));
        if let Some(state) = self.containers.borrow_mut().get_mut(&self.id) {
            state.visible = false;
        }
    }

    fn is_visible(&self) -> bool {
        self.containers
            .borrow()
            .get(&self.id)
            .map(|s| s.visible)
            .unwrap_or(false)
    }

    fn destroy(self) {
        self.log.borrow_mut().push(Call::DestroyContainer(self.id));
        self.containers.borrow_mut().remove(&self.id);
    }
}

/// An [`ErrorHandler`] that keeps every error it is handed.
///
/// Clones share the same log, so one can be given to a decoration
/// and the other kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    errors: Rc<RefCell<Vec<PanelError>>>,
}

impl ErrorLog {
    /// Creates an empty `ErrorLog`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns the errors handled so far.
    pub fn take(&self) -> Vec<PanelError> {
        self.errors.borrow_mut().drain(..).collect()
    }

    /// The number of errors handled so far.
    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Whether no error has been handled yet.
    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }
}

impl ErrorHandler for ErrorLog {
    fn call(&self, err: PanelError) {
        self.errors.borrow_mut().push(err);
    }
}

/// An in-memory [`Host`][1] for testing.
///
/// A fresh `DummyHost` has the activities indicator present and shown, no focused
/// window or app, the overview hidden, and no settings.
///
/// [1]: crate::platform::Host
#[derive(Debug)]
pub struct DummyHost {
    log: CallLog,
    next_handler: Cell<u64>,
    next_container: Cell<u64>,
    next_button: Rc<Cell<u64>>,
    signals: RefCell<Vec<(HandlerId, Signal)>>,
    settings: RefCell<HashMap<String, String>>,
    setting_handlers: RefCell<Vec<(HandlerId, String)>>,
    focus_window: RefCell<Option<DummyWindow>>,
    target_app: RefCell<Option<AppInfo>>,
    overview: Cell<bool>,
    desktop_mode: Cell<bool>,
    time: Cell<u32>,
    indicators: RefCell<HashMap<Indicator, bool>>,
    containers: Containers,
    stylesheets: RefCell<HashSet<PathBuf>>,
    loaded: RefCell<Vec<PathBuf>>,
}

impl Default for DummyHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyHost {
    /// Creates a new `DummyHost`.
    pub fn new() -> Self {
        let mut indicators = HashMap::new();
        indicators.insert(Indicator::Activities, true);

        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            next_handler: Cell::new(1),
            next_container: Cell::new(1),
            next_button: Rc::new(Cell::new(1)),
            signals: RefCell::new(Vec::new()),
            settings: RefCell::new(HashMap::new()),
            setting_handlers: RefCell::new(Vec::new()),
            focus_window: RefCell::new(None),
            target_app: RefCell::new(None),
            overview: Cell::new(false),
            desktop_mode: Cell::new(false),
            time: Cell::new(0),
            indicators: RefCell::new(indicators),
            containers: Rc::new(RefCell::new(BTreeMap::new())),
            stylesheets: RefCell::new(HashSet::new()),
            loaded: RefCell::new(Vec::new()),
        }
    }

    fn next_handler(&self) -> HandlerId {
        let id = HandlerId(self.next_handler.get());
        self.next_handler.set(id.0 + 1);
        id
    }

    //* event delivery

    /// Returns the handles currently connected to `signal`, in
    /// connection order.
    pub fn emit(&self, signal: Signal) -> Vec<HandlerId> {
        self.signals
            .borrow()
            .iter()
            .filter(|(_, s)| *s == signal)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Stores a setting, returning the handles connected to its key.
    pub fn set_setting<K, V>(&self, key: K, value: V) -> Vec<HandlerId>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        self.settings.borrow_mut().insert(key.clone(), value.into());

        self.setting_handlers
            .borrow()
            .iter()
            .filter(|(_, k)| *k == key)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Removes a setting.
    pub fn remove_setting(&self, key: &str) {
        self.settings.borrow_mut().remove(key);
    }

    //* shell state

    /// Creates a window whose calls are recorded by this host.
    pub fn new_window(&self, id: u32) -> DummyWindow {
        DummyWindow::with_log(id, Rc::clone(&self.log))
    }

    /// Sets the focused window.
    pub fn set_focus_window(&self, window: Option<DummyWindow>) {
        *self.focus_window.borrow_mut() = window;
    }

    /// Sets the app targeted by the app menu.
    pub fn set_target_app(&self, app: Option<AppInfo>) {
        *self.target_app.borrow_mut() = app;
    }

    /// Sets whether the overview is visible.
    pub fn set_overview(&self, visible: bool) {
        self.overview.set(visible);
    }

    /// Sets whether the panel runs in desktop mode.
    pub fn set_desktop_mode(&self, desktop: bool) {
        self.desktop_mode.set(desktop);
    }

    /// Sets the current event timestamp.
    pub fn set_time(&self, time: u32) {
        self.time.set(time);
    }

    /// Removes an indicator from the panel layout.
    pub fn remove_indicator(&self, indicator: Indicator) {
        self.indicators.borrow_mut().remove(&indicator);
    }

    /// Whether an indicator is shown, or `None` if it is absent.
    pub fn indicator_visible(&self, indicator: Indicator) -> Option<bool> {
        self.indicators.borrow().get(&indicator).copied()
    }

    //* themes

    /// Marks a stylesheet path as existing.
    pub fn add_stylesheet<P: Into<PathBuf>>(&self, path: P) {
        self.stylesheets.borrow_mut().insert(path.into());
    }

    /// The stylesheets currently loaded.
    pub fn loaded_stylesheets(&self) -> Vec<PathBuf> {
        self.loaded.borrow().clone()
    }

    //* introspection

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    /// Drains and returns all calls made so far.
    pub fn take_calls(&self) -> Vec<Call> {
        self.log.borrow_mut().drain(..).collect()
    }

    /// The number of live signal connections.
    pub fn connection_count(&self) -> usize {
        self.signals.borrow().len()
    }

    /// The containers currently alive, keyed by their id.
    pub fn containers(&self) -> BTreeMap<u64, ContainerState> {
        self.containers.borrow().clone()
    }
}

impl SignalSource for DummyHost {
    fn connect(&self, signal: Signal) -> HandlerId {
        let id = self.next_handler();
        self.signals.borrow_mut().push((id, signal));
        self.log.borrow_mut().push(Call::Connect(signal, id));
        id
    }

    fn disconnect(&self, id: HandlerId) {
        self.signals.borrow_mut().retain(|(h, _)| *h != id);
        self.log.borrow_mut().push(Call::Disconnect(id));
    }
}

impl SettingsStore for DummyHost {
    fn get_string(&self, key: &str) -> Option<String> {
        self.settings.borrow().get(key).cloned()
    }

    fn connect_changed(&self, key: &str) -> HandlerId {
        let id = self.next_handler();
        self.setting_handlers.borrow_mut().push((id, key.into()));
        self.log.borrow_mut().push(Call::ConnectSetting(key.into(), id));
        id
    }
}

impl Shell for DummyHost {
    type Window = DummyWindow;

    fn focus_window(&self) -> Option<DummyWindow> {
        self.focus_window.borrow().clone()
    }

    fn target_app(&self) -> Option<AppInfo> {
        self.target_app.borrow().clone()
    }

    fn overview_visible(&self) -> bool {
        self.overview.get()
    }

    fn desktop_mode(&self) -> bool {
        self.desktop_mode.get()
    }

    fn current_time(&self) -> u32 {
        self.time.get()
    }
}

impl Panel for DummyHost {
    type Container = DummyContainer;

    fn has_indicator(&self, indicator: Indicator) -> bool {
        self.indicators.borrow().contains_key(&indicator)
    }

    fn show_indicator(&self, indicator: Indicator) {
        self.log.borrow_mut().push(Call::ShowIndicator(indicator));
        if let Some(visible) = self.indicators.borrow_mut().get_mut(&indicator) {
            *visible = true;
        }
    }

    fn hide_indicator(&self, indicator: Indicator) {
        self.log.borrow_mut().push(Call::HideIndicator(indicator));
        if let Some(visible) = self.indicators.borrow_mut().get_mut(&indicator) {
            *visible = false;
        }
    }

    fn new_container(&self, style_class: &str) -> DummyContainer {
        let id = self.next_container.get();
        self.next_container.set(id + 1);

        self.log.borrow_mut().push(Call::NewContainer(id));
        self.containers.borrow_mut().insert(id, ContainerState {
            style_class: style_class.into(),
            ..Default::default()
        });

        DummyContainer {
            id,
            containers: Rc::clone(&self.containers),
            next_button: Rc::clone(&self.next_button),
            log: Rc::clone(&self.log),
        }
    }

    fn insert_container(&self, container: &DummyContainer, side: Side) {
        self.log.borrow_mut().push(Call::InsertContainer(container.id, side));
        if let Some(state) = self.containers.borrow_mut().get_mut(&container.id) {
            state.side = Some(side);
        }
    }
}

impl ThemeContext for DummyHost {
    fn exists(&self, path: &Path) -> bool {
        self.stylesheets.borrow().contains(path)
    }

    fn load_stylesheet(&self, path: &Path) {
        self.log.borrow_mut().push(Call::LoadStylesheet(path.into()));
        self.loaded.borrow_mut().push(path.into());
    }

    fn unload_stylesheet(&self, path: &Path) {
        self.log.borrow_mut().push(Call::UnloadStylesheet(path.into()));
        self.loaded.borrow_mut().retain(|p| p != path);
    }

    fn reload(&self) {
        self.log.borrow_mut().push(Call::ReloadTheme);
    }
}
