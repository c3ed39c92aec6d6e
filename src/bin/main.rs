//! A scripted session against the in-memory host.
//!
//! This drives both decorations through the events a real shell would send
//! them, and logs everything they do along the way. Set `RUST_LOG` to
//! change the verbosity, e.g. `RUST_LOG=toarupanel=trace`.

use std::error::Error;
use std::rc::Rc;

use tracing::info;
use tracing_subscriber::{fmt as logger, fmt::format::FmtSpan, EnvFilter};

use toarupanel::config::{no_checks, PanelConfig};
use toarupanel::platform::dummy::DummyHost;
use toarupanel::platform::Signal;
use toarupanel::types::{AppInfo, AppState, MaximizeFlags, WindowAction};
use toarupanel::{ActivitiesButton, Decoration, HandlerId, WindowButtons};

const THEMES_DIR: &str = "/usr/share/toarupanel/themes";

/// Delivers every handle in `ids` to `decoration`.
fn deliver<D: Decoration>(decoration: &mut D, ids: Vec<HandlerId>) {
    for id in ids {
        decoration.notify(id);
    }
}

pub fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // set up the logger
    logger::fmt()
        // only log enter and exit
        .with_span_events(FmtSpan::ACTIVE)
        // honour RUST_LOG, defaulting to DEBUG
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        // don't use timestamps
        .without_time()
        // don't show source filename
        .with_file(false)
        // don't show source code line
        .with_line_number(false)
        // register as global
        .try_init()?;

    //* 1: Set up the host and its initial preferences
    let host = Rc::new(DummyHost::new());
    host.set_setting("hide-activities-button", "conditional");
    host.set_setting("show-window-buttons", "conditional");
    host.set_setting("window-buttons-theme", "default");
    host.set_setting("button-layout", "appmenu:minimize,maximize,close");
    host.add_stylesheet(format!("{}/default/stylesheet.css", THEMES_DIR));
    host.add_stylesheet(format!("{}/dark/stylesheet.css", THEMES_DIR));

    //* 2: Build the config and the decorations
    let config = Rc::new(
        PanelConfig::builder()
            .themes_dir(THEMES_DIR)
            .finish(no_checks)?,
    );

    let mut activities = ActivitiesButton::new(Rc::clone(&host), Rc::clone(&config));
    let mut buttons = WindowButtons::new(Rc::clone(&host), Rc::clone(&config));

    //* 3: Focus a maximized window
    let window = host.new_window(1).with_maximized(MaximizeFlags::BOTH);
    host.set_focus_window(Some(window));
    host.set_target_app(Some(AppInfo::new("org.gnome.TextEditor", AppState::Running)));

    deliver(&mut activities, host.emit(Signal::FocusAppChanged));
    deliver(&mut buttons, host.emit(Signal::FocusWindowChanged));

    info!(
        "window buttons visible: {}",
        buttons.group().map(|g| g.is_visible()).unwrap_or(false)
    );

    //* 4: Click the maximize button, restoring the window
    if let Some(id) = host
        .containers()
        .values()
        .flat_map(|c| c.buttons.iter())
        .find(|(_, action, _)| *action == WindowAction::Maximize)
        .map(|(id, _, _)| *id)
    {
        buttons.on_button_click(id);
        deliver(&mut buttons, host.emit(Signal::WindowSizeChanged));
    }

    info!(
        "window buttons visible: {}",
        buttons.group().map(|g| g.is_visible()).unwrap_or(false)
    );

    //* 5: Open the overview
    host.set_overview(true);
    deliver(&mut activities, host.emit(Signal::OverviewShowing));
    deliver(&mut buttons, host.emit(Signal::OverviewShowing));
    host.set_overview(false);
    deliver(&mut activities, host.emit(Signal::OverviewHiding));
    deliver(&mut buttons, host.emit(Signal::OverviewHiding));

    //* 6: Change the theme and the layout
    let ids = host.set_setting("window-buttons-theme", "dark");
    deliver(&mut buttons, ids);

    host.set_setting("button-layout", "close,maximize:appmenu");
    deliver(&mut buttons, host.emit(Signal::ButtonLayoutChanged));

    //* 7: Switch everything off
    let ids = host.set_setting("hide-activities-button", "never");
    deliver(&mut activities, ids);
    let ids = host.set_setting("show-window-buttons", "never");
    deliver(&mut buttons, ids);

    info!(
        "session over: {} capability calls, {} live connections",
        host.calls().len(),
        host.connection_count()
    );

    Ok(())
}
