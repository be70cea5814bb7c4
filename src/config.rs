//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/archview/archview.toml`
//! 3. Local config: `<graph_dir>/.archview.toml`
//! 4. Environment variables: `ARCHVIEW_*` prefix

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::NodeCategory;
use crate::util::path::expand_env_vars;

/// Viewport geometry used for fitting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportSettings {
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Padding around the whole graph for fit-all, in pixels
    pub padding: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            padding: 50.0,
        }
    }
}

/// Which parts of the graph a view shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewSettings {
    /// Categories shown; everything else is reduced away
    pub visible_types: Vec<NodeCategory>,
    /// Drop nodes left without edges after reduction
    pub strip_orphans: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            visible_types: NodeCategory::ALL.to_vec(),
            strip_orphans: true,
        }
    }
}

/// Raw view settings for intermediate parsing (Option to detect "not specified").
///
/// Categories stay strings so local config can negate with `!Category`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawViewSettings {
    pub visible_types: Option<Vec<String>>,
    pub strip_orphans: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawViewportSettings {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub graph_file: Option<PathBuf>,
    pub viewport: RawViewportSettings,
    pub view: RawViewSettings,
}

impl ViewSettings {
    /// Merge category lists with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding category
    /// - Result is de-duplicated and sorted
    ///
    /// # Examples
    /// ```ignore
    /// merge_types(&[Api, Event], &["UseCase"])        // → [Api, UseCase, Event]
    /// merge_types(&[Api, Event], &["!Event", "UI"])   // → [Api, Ui]
    /// ```
    pub fn merge_types(
        base: &[NodeCategory],
        overlay: &[String],
    ) -> Result<Vec<NodeCategory>, ApplicationError> {
        let mut result: BTreeSet<NodeCategory> = base.iter().copied().collect();

        for item in overlay {
            if let Some(negated) = item.strip_prefix('!') {
                result.remove(&negated.parse::<NodeCategory>()?);
            } else {
                result.insert(item.parse::<NodeCategory>()?);
            }
        }

        Ok(result.into_iter().collect())
    }

    /// Merge overlay onto self: scalars replace, categories union.
    pub fn merge(&self, overlay: &RawViewSettings) -> Result<Self, ApplicationError> {
        Ok(Self {
            visible_types: match &overlay.visible_types {
                Some(o) => Self::merge_types(&self.visible_types, o)?,
                None => self.visible_types.clone(),
            },
            strip_orphans: overlay.strip_orphans.unwrap_or(self.strip_orphans),
        })
    }

    /// Apply global config onto defaults.
    ///
    /// Unlike `merge()`, a category list in global config REPLACES the
    /// default list. Negations are meaningless here and rejected.
    pub fn apply_global(&self, global: &RawViewSettings) -> Result<Self, ApplicationError> {
        Ok(Self {
            visible_types: match &global.visible_types {
                Some(types) => parse_types(types)?,
                None => self.visible_types.clone(),
            },
            strip_orphans: global.strip_orphans.unwrap_or(self.strip_orphans),
        })
    }
}

impl ViewportSettings {
    fn merge(&self, overlay: &RawViewportSettings) -> Self {
        Self {
            width: overlay.width.unwrap_or(self.width),
            height: overlay.height.unwrap_or(self.height),
            padding: overlay.padding.unwrap_or(self.padding),
        }
    }
}

fn parse_types(types: &[String]) -> Result<Vec<NodeCategory>, ApplicationError> {
    let parsed = types
        .iter()
        .map(|t| t.parse::<NodeCategory>())
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(parsed.into_iter().collect())
}

/// Unified configuration for archview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Graph document used when a command gets no explicit path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_file: Option<PathBuf>,
    /// Viewport geometry
    pub viewport: ViewportSettings,
    /// View filter
    pub view: ViewSettings,
}

/// Get the XDG config directory for archview.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "archview").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("archview.toml"))
}

/// Get the path to the local config file in a graph directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".archview.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(graph_file) = &self.graph_file {
            let expanded = expand_env_vars(graph_file.to_string_lossy().as_ref());
            self.graph_file = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base) with union semantics for categories.
    fn merge_with(&self, overlay: &RawSettings) -> Result<Self, ApplicationError> {
        Ok(Self {
            graph_file: overlay.graph_file.clone().or_else(|| self.graph_file.clone()),
            viewport: self.viewport.merge(&overlay.viewport),
            view: self.view.merge(&overlay.view)?,
        })
    }

    /// Apply global config onto defaults with REPLACE semantics for categories.
    fn apply_global(&self, global: &RawSettings) -> Result<Self, ApplicationError> {
        Ok(Self {
            graph_file: global.graph_file.clone().or_else(|| self.graph_file.clone()),
            viewport: self.viewport.merge(&global.viewport),
            view: self.view.apply_global(&global.view)?,
        })
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.archview.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config (category list REPLACES defaults)
    /// 3. Local config (category list UNIONS with global, `!Category` removes)
    /// 4. Environment variables: `ARCHVIEW_*` prefix (REPLACES)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw)?;
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw)?;
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply ARCHVIEW_* environment variables as explicit overrides.
    ///
    /// `ARCHVIEW_VIEWPORT__WIDTH=1920`, `ARCHVIEW_VIEW__VISIBLE_TYPES=API,Event`
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("ARCHVIEW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("view.visible_types"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("graph_file") {
            settings.graph_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_float("viewport.width") {
            settings.viewport.width = val;
        }
        if let Ok(val) = config.get_float("viewport.height") {
            settings.viewport.height = val;
        }
        if let Ok(val) = config.get_float("viewport.padding") {
            settings.viewport.padding = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("view.visible_types") {
            settings.view.visible_types = parse_types(&val)?;
        }
        if let Ok(val) = config.get_bool("view.strip_orphans") {
            settings.view.strip_orphans = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# archview configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/archview/archview.toml  (defines your baseline)
#   Local:  <graph_dir>/.archview.toml        (per-graph adjustments)
#   Env:    ARCHVIEW_* environment variables  (explicit overrides)
#
# Category Merge Semantics:
#   Global config REPLACES the compiled default (all categories).
#   Local config UNIONS with global.
#   Use "!Category" in local config to hide an inherited category:
#     visible_types = ["!UseCase"]

# Graph document used when no path is given
# graph_file = "~/docs/architecture.json"

[viewport]
# width = 1280
# height = 800
# padding = 50

[view]
# Categories: API, UseCase, DomainOp, Event, EventHandler, UI, Custom, External
# visible_types = ["API", "UseCase", "DomainOp", "Event", "EventHandler", "UI", "Custom", "External"]

# Drop nodes without edges after reduction
# strip_orphans = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeCategory::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_defaults_when_created_then_all_categories_visible() {
        let settings = Settings::default();
        assert_eq!(settings.view.visible_types.len(), NodeCategory::ALL.len());
        assert!(settings.view.strip_orphans);
        assert_eq!(settings.viewport.padding, 50.0);
    }

    // ========================================
    // Tests for merge_types union semantics
    // ========================================

    #[test]
    fn test_merge_types_union() {
        let result = ViewSettings::merge_types(&[Api, Event], &strings(&["UseCase"])).unwrap();
        assert_eq!(result, vec![Api, UseCase, Event]);
    }

    #[test]
    fn test_merge_types_negation() {
        let result =
            ViewSettings::merge_types(&[Api, Event], &strings(&["!Event", "ui"])).unwrap();
        assert_eq!(result, vec![Api, Ui]);
    }

    #[test]
    fn test_merge_types_negation_nonexistent() {
        let result = ViewSettings::merge_types(&[Api], &strings(&["!Custom"])).unwrap();
        assert_eq!(result, vec![Api]);
    }

    #[test]
    fn test_merge_types_unknown_category() {
        let err = ViewSettings::merge_types(&[Api], &strings(&["Service"])).unwrap_err();
        assert!(err.to_string().contains("Service"));
    }

    #[test]
    fn test_apply_global_replaces_types() {
        let base = ViewSettings::default();
        let global = RawViewSettings {
            visible_types: Some(strings(&["Event", "API"])),
            strip_orphans: None,
        };

        let result = base.apply_global(&global).unwrap();

        assert_eq!(result.visible_types, vec![Api, Event]);
        assert!(result.strip_orphans, "unspecified scalar keeps base");
    }

    #[test]
    fn test_merge_keeps_base_when_not_specified() {
        let base = ViewSettings {
            visible_types: vec![Api, DomainOp],
            strip_orphans: true,
        };
        let overlay = RawViewSettings {
            visible_types: None,
            strip_orphans: Some(false),
        };

        let result = base.merge(&overlay).unwrap();

        assert_eq!(result.visible_types, vec![Api, DomainOp]);
        assert!(!result.strip_orphans);
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        assert!(text.contains("[viewport]"));
        assert!(text.contains("\"API\""));
    }
}
