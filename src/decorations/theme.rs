//! Window button themes.
//!
//! A theme is a directory under the configured themes directory holding a
//! single stylesheet. At most one theme is loaded per decoration at a time.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::config::PanelConfig;
use crate::platform::ThemeContext;
use crate::{PanelError, Result};

/// A loaded theme stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeHandle {
    name: String,
    path: PathBuf,
}

impl ThemeHandle {
    /// The theme's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path of the loaded stylesheet.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolves the stylesheet path of the theme called `name`.
///
/// Names must be a single, plain path component, so that a theme can never
/// resolve to a file outside the themes directory.
pub fn stylesheet_path(config: &PanelConfig, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(config
            .themes_dir()
            .join(name)
            .join(config.stylesheet())),
        _ => Err(PanelError::InvalidTheme(name.into())),
    }
}

/// Lists the themes installed in `dir`, sorted by name.
///
/// A theme is any subdirectory that holds a file called `stylesheet`.
pub fn available_themes<P: AsRef<Path>>(dir: P, stylesheet: &str) -> Result<Vec<String>> {
    let mut themes = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || !entry.path().join(stylesheet).is_file() {
            continue
        }
        match entry.file_name().into_string() {
            Ok(name) => themes.push(name),
            Err(name) => warn!("skipping theme with non-UTF-8 name {:?}", name),
        }
    }

    themes.sort();
    Ok(themes)
}

/// Holds at most one loaded theme.
#[derive(Debug, Clone, Default)]
pub struct ThemeSlot {
    current: Option<ThemeHandle>,
}

impl ThemeSlot {
    /// Creates an empty `ThemeSlot`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded theme, if any.
    pub fn current(&self) -> Option<&ThemeHandle> {
        self.current.as_ref()
    }

    /// Loads the theme called `name`, unloading any theme loaded before it.
    ///
    /// Returns whether a stylesheet was loaded. If the theme's stylesheet
    /// does not exist, nothing is loaded and the slot is left empty.
    pub fn load<T>(&mut self, ctx: &T, config: &PanelConfig, name: &str) -> Result<bool>
    where
        T: ThemeContext + ?Sized,
    {
        self.unload(ctx);

        let path = stylesheet_path(config, name)?;
        if !ctx.exists(&path) {
            debug!("no stylesheet at {}, not loading theme {}", path.display(), name);
            return Ok(false)
        }

        debug!("loading theme {} from {}", name, path.display());
        ctx.load_stylesheet(&path);
        self.current = Some(ThemeHandle {
            name: name.into(),
            path,
        });
        Ok(true)
    }

    /// Unloads the loaded theme. No-op if there is none.
    pub fn unload<T>(&mut self, ctx: &T)
    where
        T: ThemeContext + ?Sized,
    {
        if let Some(theme) = self.current.take() {
            debug!("unloading theme {}", theme.name);
            ctx.unload_stylesheet(&theme.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::no_checks;
    use crate::platform::dummy::{Call, DummyHost};

    fn config() -> PanelConfig {
        PanelConfig::builder()
            .themes_dir("/themes")
            .finish(no_checks)
            .unwrap()
    }

    #[test]
    fn test_stylesheet_path() {
        let config = config();

        assert_eq!(
            stylesheet_path(&config, "arc").unwrap(),
            PathBuf::from("/themes/arc/stylesheet.css")
        );
        assert!(stylesheet_path(&config, "").is_err());
        assert!(stylesheet_path(&config, "..").is_err());
        assert!(stylesheet_path(&config, "../etc").is_err());
        assert!(stylesheet_path(&config, "/etc").is_err());
    }

    #[test]
    fn test_default_themes_dir_is_relative() {
        let path = stylesheet_path(&PanelConfig::default(), "arc").unwrap();

        assert!(path.is_relative());
        assert_eq!(path, Path::new("themes/arc/stylesheet.css"));
    }

    #[test]
    fn test_load_replaces_previous() {
        let host = DummyHost::new();
        let config = config();
        host.add_stylesheet("/themes/arc/stylesheet.css");
        host.add_stylesheet("/themes/adwaita/stylesheet.css");

        let mut slot = ThemeSlot::new();
        assert!(slot.load(&host, &config, "arc").unwrap());
        assert!(slot.load(&host, &config, "adwaita").unwrap());

        assert_eq!(slot.current().map(|t| t.name()), Some("adwaita"));
        assert_eq!(host.calls(), vec![
            Call::LoadStylesheet("/themes/arc/stylesheet.css".into()),
            Call::UnloadStylesheet("/themes/arc/stylesheet.css".into()),
            Call::LoadStylesheet("/themes/adwaita/stylesheet.css".into()),
        ]);
    }

    #[test]
    fn test_missing_theme_leaves_slot_empty() {
        let host = DummyHost::new();
        let config = config();
        host.add_stylesheet("/themes/arc/stylesheet.css");

        let mut slot = ThemeSlot::new();
        slot.load(&host, &config, "arc").unwrap();

        assert!(!slot.load(&host, &config, "missing").unwrap());
        assert!(slot.current().is_none());
        assert!(host.loaded_stylesheets().is_empty());

        slot.unload(&host);
        assert_eq!(host.calls().len(), 2);
    }

    #[test]
    fn test_available_themes() {
        let dir = std::env::temp_dir().join(format!("toarupanel-themes-{}", std::process::id()));
        for theme in ["zen", "arc", "empty"] {
            fs::create_dir_all(dir.join(theme)).unwrap();
        }
        fs::write(dir.join("zen").join("stylesheet.css"), "").unwrap();
        fs::write(dir.join("arc").join("stylesheet.css"), "").unwrap();
        fs::write(dir.join("stray.css"), "").unwrap();

        let themes = available_themes(&dir, "stylesheet.css");
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(themes.unwrap(), ["arc", "zen"]);
    }

    #[test]
    fn test_available_themes_missing_dir() {
        let err = available_themes("/nonexistent/toarupanel/themes", "stylesheet.css");
        assert!(matches!(err, Err(PanelError::Io(_))));
    }
}
