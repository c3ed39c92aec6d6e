//! Types for configuring the decorations.
//!
//! This module contains [`PanelConfig`], the configuration object shared by
//! every decoration. It names the settings keys the decorations read, where
//! window button themes are found, and how windows are judged maximized.
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::types::PreferenceMode;
use crate::core::window::MaximizePolicy;
use crate::{PanelError::*, Result};

/// The central configuration object.
///
/// `PanelConfig` provides a `validate` method that ensures it is valid and
/// can be used by a decoration. While this checks the predefined invariants
/// on the config, it can also run user-defined code to ensure that
/// user-defined invariants are also upheld.
///
/// # Construction
///
/// To build a `PanelConfig`, use the [`PanelConfigBuilder`] type.
///
/// # Example
///
/// ```rust
/// use toarupanel::config::{PanelConfig, no_checks};
///
/// let config = PanelConfig::builder()
///     .themes_dir("/usr/share/toarupanel/themes")
///     .finish(no_checks)
///     .expect("invalid config");
///
/// assert_eq!(config.buttons_key(), "show-window-buttons");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PanelConfig {
    /// The key holding the activities indicator mode.
    pub(crate) activities_key: String,
    /// The key holding the window buttons mode.
    pub(crate) buttons_key: String,
    /// The key holding the window buttons theme name.
    pub(crate) theme_key: String,
    /// The key holding the window manager's button layout.
    pub(crate) layout_key: String,
    /// The directory holding one subdirectory per theme.
    pub(crate) themes_dir: PathBuf,
    /// The stylesheet file name inside a theme directory.
    pub(crate) stylesheet: String,
    /// Style class of the window buttons container.
    pub(crate) container_style: String,
    /// Base style class of each window button.
    pub(crate) button_style: String,
    /// The mode assumed when a mode preference cannot be parsed.
    pub(crate) fallback_mode: PreferenceMode,
    /// How windows are judged maximized.
    pub(crate) maximize: MaximizePolicy,
}

/// A function that simply returns Ok. Pass this into validate if you have no
/// user-defined checks to run.
pub const fn no_checks(_: &PanelConfig) -> Result<()> {
    Ok(())
}

impl Default for PanelConfig {
    fn default() -> PanelConfig {
        PanelConfig {
            activities_key: "hide-activities-button".into(),
            buttons_key: "show-window-buttons".into(),
            theme_key: "window-buttons-theme".into(),
            layout_key: "button-layout".into(),
            themes_dir: PathBuf::from("themes"),
            stylesheet: "stylesheet.css".into(),
            container_style: "window-buttons-box".into(),
            button_style: "window-button".into(),
            fallback_mode: PreferenceMode::Never,
            maximize: MaximizePolicy::default(),
        }
    }
}

impl PanelConfig {
    /// Returns a [`PanelConfigBuilder`] to build your config with the
    /// 'builder' idiom.
    pub fn builder() -> PanelConfigBuilder {
        PanelConfigBuilder::new()
    }

    /// Checks the configuration to verify that all invariants are upheld.
    ///
    /// If you have no code you want to insert, pass in [`no_checks`] as a
    /// function pointer.
    pub fn validate<F>(&self, checks: F) -> Result<()>
    where
        F: FnOnce(&PanelConfig) -> Result<()>,
    {
        let keys = [
            ("activities_key", &self.activities_key),
            ("buttons_key", &self.buttons_key),
            ("theme_key", &self.theme_key),
            ("layout_key", &self.layout_key),
        ];
        for (name, key) in keys {
            if key.is_empty() {
                return Err(InvalidConfig(format!("{} is empty", name)));
            }
        }
        if self.buttons_key == self.theme_key {
            return Err(InvalidConfig("buttons_key and theme_key are the same key".into()));
        }
        if self.stylesheet.is_empty() {
            return Err(InvalidConfig("stylesheet is empty".into()));
        }
        checks(self)?;
        Ok(())
    }

    /// The settings key holding the activities indicator mode.
    pub fn activities_key(&self) -> &str {
        &self.activities_key
    }

    /// The settings key holding the window buttons mode.
    pub fn buttons_key(&self) -> &str {
        &self.buttons_key
    }

    /// The settings key holding the window buttons theme name.
    pub fn theme_key(&self) -> &str {
        &self.theme_key
    }

    /// The settings key holding the window manager's button layout.
    pub fn layout_key(&self) -> &str {
        &self.layout_key
    }

    /// The directory holding one subdirectory per theme.
    ///
    /// A relative path is resolved against the working directory of the
    /// process, not against where the host is installed. The default,
    /// `themes`, is relative.
    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    /// The stylesheet file name inside a theme directory.
    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// Style class of the window buttons container.
    pub fn container_style(&self) -> &str {
        &self.container_style
    }

    /// Base style class of each window button.
    pub fn button_style(&self) -> &str {
        &self.button_style
    }

    /// The mode assumed when a mode preference cannot be parsed.
    pub fn fallback_mode(&self) -> PreferenceMode {
        self.fallback_mode
    }

    /// How windows are judged maximized.
    pub fn maximize(&self) -> &MaximizePolicy {
        &self.maximize
    }
}

/// A helper type to construct a [`PanelConfig`].
#[derive(Debug, Default)]
pub struct PanelConfigBuilder {
    inner: PanelConfig,
}

impl PanelConfigBuilder {
    /// Creates a new `PanelConfigBuilder`.
    pub fn new() -> Self {
        Self {
            inner: PanelConfig::default(),
        }
    }

    /// Sets the key holding the activities indicator mode.
    pub fn activities_key<S: Into<String>>(mut self, key: S) -> Self {
        self.inner.activities_key = key.into();
        self
    }

    /// Sets the key holding the window buttons mode.
    pub fn buttons_key<S: Into<String>>(mut self, key: S) -> Self {
        self.inner.buttons_key = key.into();
        self
    }

    /// Sets the key holding the window buttons theme name.
    pub fn theme_key<S: Into<String>>(mut self, key: S) -> Self {
        self.inner.theme_key = key.into();
        self
    }

    /// Sets the key holding the button layout.
    pub fn layout_key<S: Into<String>>(mut self, key: S) -> Self {
        self.inner.layout_key = key.into();
        self
    }

    /// Sets the directory themes are looked up in.
    ///
    /// Hosts should pass an absolute path under their install directory,
    /// since relative paths resolve against the working directory.
    pub fn themes_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.inner.themes_dir = dir.into();
        self
    }

    /// Sets the stylesheet file name inside a theme directory.
    pub fn stylesheet<S: Into<String>>(mut self, name: S) -> Self {
        self.inner.stylesheet = name.into();
        self
    }

    /// Sets the style classes of the container and its buttons.
    pub fn style_classes<S: Into<String>>(mut self, container: S, button: S) -> Self {
        self.inner.container_style = container.into();
        self.inner.button_style = button.into();
        self
    }

    /// Sets the mode assumed when a mode preference cannot be parsed.
    pub fn fallback_mode(mut self, mode: PreferenceMode) -> Self {
        self.inner.fallback_mode = mode;
        self
    }

    /// Sets how windows are judged maximized.
    pub fn maximize(mut self, policy: MaximizePolicy) -> Self {
        self.inner.maximize = policy;
        self
    }

    /// Finishes config construction, validates it and returns
    /// a completed config if validation is successful.
    ///
    /// You can supply an additional `check` to run
    /// additional code to validate your config.
    pub fn finish<F>(self, check: F) -> Result<PanelConfig>
    where
        F: FnOnce(&PanelConfig) -> Result<()>,
    {
        let config = self.inner;
        config.validate(check)?;
        Ok(config)
    }
}
