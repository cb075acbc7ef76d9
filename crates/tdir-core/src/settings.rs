//! User settings for template discovery and substitution.
//!
//! Stored as YAML, by default at `<vault>/.tdir.yaml`:
//! ```yaml
//! template_folder: Templates
//! enable_folder_templates: true
//! variables_enabled: true
//! menu_style: individual
//! display_mode: both
//! template_configs:
//!   - path: Templates/Daily.md
//!     visible: true
//!     order: 0
//! ```

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TdirError};
use crate::substitute::substitute;

/// Vault-relative folder used when none is configured.
pub const DEFAULT_TEMPLATE_FOLDER: &str = "Templates";

/// Settings file name inside a vault.
pub const SETTINGS_FILE: &str = ".tdir.yaml";

/// How templates are offered for a target folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuStyle {
    /// One entry that opens a template picker.
    #[default]
    Grouped,
    /// One entry per template.
    Individual,
}

/// What a per-template menu entry shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// The template's own name.
    Template,
    /// The name the new entry would get.
    Result,
    /// `template → result`, or just the name when they are equal.
    #[default]
    Both,
}

/// Visibility and ordering for a single template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Vault-relative path of the template.
    pub path: String,
    pub visible: bool,
    pub order: i64,
}

/// Direction for [`Settings::move_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Earlier in the menu.
    Up,
    /// Later in the menu.
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub template_folder: String,
    pub enable_folder_templates: bool,
    pub variables_enabled: bool,
    pub menu_style: MenuStyle,
    pub display_mode: DisplayMode,
    pub template_configs: Vec<TemplateConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template_folder: DEFAULT_TEMPLATE_FOLDER.to_string(),
            enable_folder_templates: true,
            variables_enabled: true,
            menu_style: MenuStyle::default(),
            display_mode: DisplayMode::default(),
            template_configs: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::Settings`] on malformed YAML or unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Self =
            serde_yaml::from_str(yaml).map_err(|e| TdirError::Settings(e.to_string()))?;
        if settings.template_folder.trim().is_empty() {
            settings.template_folder = DEFAULT_TEMPLATE_FOLDER.to_string();
        }
        Ok(settings)
    }

    /// Load settings from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::Io`] if the file exists but cannot be read.
    /// Returns [`TdirError::Settings`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(yaml) => Self::from_yaml(&yaml),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::Settings`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TdirError::Settings(e.to_string()))
    }

    /// Write settings as YAML to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::Settings`] if serialization fails and
    /// [`TdirError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Bring `template_configs` in line with the templates that exist.
    ///
    /// Configs whose path is not in `template_paths` are dropped. Each new
    /// path is added as visible with its index in `template_paths` as order.
    /// Configs end up sorted by order; ties keep their position.
    pub fn sync_configs<S: AsRef<str>>(&mut self, template_paths: &[S]) {
        self.template_configs
            .retain(|c| template_paths.iter().any(|p| p.as_ref() == c.path));

        for (index, path) in template_paths.iter().enumerate() {
            let path = path.as_ref();
            if !self.template_configs.iter().any(|c| c.path == path) {
                self.template_configs.push(TemplateConfig {
                    path: path.to_string(),
                    visible: true,
                    order: i64::try_from(index).unwrap_or(i64::MAX),
                });
            }
        }

        self.template_configs.sort_by_key(|c| c.order);
    }

    fn config_index(&self, path: &str) -> Result<usize> {
        self.template_configs
            .iter()
            .position(|c| c.path == path)
            .ok_or_else(|| TdirError::UnknownTemplate(path.to_string()))
    }

    /// Show or hide a template in menus.
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::UnknownTemplate`] if no config has this path.
    pub fn set_visible(&mut self, path: &str, visible: bool) -> Result<()> {
        let index = self.config_index(path)?;
        self.template_configs[index].visible = visible;
        Ok(())
    }

    /// Swap a template's order with its neighbor in menu order.
    ///
    /// Orders are renumbered `0..n` first so equal orders still move.
    /// Returns `false` when the template is already first (`Up`) or last (`Down`).
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::UnknownTemplate`] if no config has this path.
    pub fn move_config(&mut self, path: &str, direction: MoveDirection) -> Result<bool> {
        self.config_index(path)?;
        self.template_configs.sort_by_key(|c| c.order);
        for (order, config) in (0_i64..).zip(self.template_configs.iter_mut()) {
            config.order = order;
        }

        let index = self.config_index(path)?;
        let other = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|i| *i < self.template_configs.len()),
        };
        let Some(other) = other else {
            return Ok(false);
        };

        let order = self.template_configs[index].order;
        self.template_configs[index].order = self.template_configs[other].order;
        self.template_configs[other].order = order;
        self.template_configs.swap(index, other);
        Ok(true)
    }

    /// Substitute placeholders in `text`, honoring `variables_enabled`.
    /// When variables are disabled the text comes back verbatim.
    #[must_use]
    pub fn process<S: AsRef<str>>(&self, text: &str, now: NaiveDateTime, siblings: &[S]) -> String {
        if !self.variables_enabled {
            return text.to_string();
        }
        substitute(text, now, siblings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn defaults_match_a_fresh_install() {
        let s = Settings::default();
        assert_eq!(s.template_folder, "Templates");
        assert!(s.enable_folder_templates);
        assert!(s.variables_enabled);
        assert_eq!(s.menu_style, MenuStyle::Grouped);
        assert_eq!(s.display_mode, DisplayMode::Both);
        assert!(s.template_configs.is_empty());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let s = Settings::from_yaml("menu_style: individual\ndisplay_mode: result\n").unwrap();
        assert_eq!(s.menu_style, MenuStyle::Individual);
        assert_eq!(s.display_mode, DisplayMode::Result);
        assert_eq!(s.template_folder, "Templates");
    }

    #[test]
    fn empty_template_folder_falls_back_to_default() {
        let s = Settings::from_yaml("template_folder: \"\"\n").unwrap();
        assert_eq!(s.template_folder, DEFAULT_TEMPLATE_FOLDER);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_yaml("templat_folder: X\n").unwrap_err();
        assert!(matches!(err, TdirError::Settings(_)));
    }

    #[test]
    fn yaml_roundtrip_with_configs() {
        let s = Settings {
            template_configs: vec![TemplateConfig {
                path: "Templates/Daily.md".to_string(),
                visible: false,
                order: 3,
            }],
            ..Settings::default()
        };
        let back = Settings::from_yaml(&s.to_yaml().unwrap()).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "template_folder: Meta/Templates\n").unwrap();
        assert_eq!(Settings::load(&path).unwrap().template_folder, "Meta/Templates");
    }

    fn config(path: &str, visible: bool, order: i64) -> TemplateConfig {
        TemplateConfig {
            path: path.to_string(),
            visible,
            order,
        }
    }

    fn paths(s: &Settings) -> Vec<&str> {
        s.template_configs.iter().map(|c| c.path.as_str()).collect()
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let s = Settings {
            menu_style: MenuStyle::Individual,
            template_configs: vec![config("Templates/A.md", false, 1)],
            ..Settings::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }

    #[test]
    fn sync_prunes_missing_and_appends_new_templates() {
        let mut s = Settings {
            template_configs: vec![
                config("Templates/Gone.md", true, 0),
                config("Templates/B.md", false, 5),
            ],
            ..Settings::default()
        };
        s.sync_configs(&["Templates/A.md", "Templates/B.md", "Templates/C.md"]);

        assert_eq!(
            s.template_configs,
            vec![
                config("Templates/A.md", true, 0),
                config("Templates/C.md", true, 2),
                config("Templates/B.md", false, 5),
            ]
        );
    }

    #[test]
    fn sync_with_no_templates_clears_configs() {
        let mut s = Settings {
            template_configs: vec![config("Templates/A.md", true, 0)],
            ..Settings::default()
        };
        s.sync_configs::<&str>(&[]);
        assert!(s.template_configs.is_empty());
    }

    #[test]
    fn set_visible_toggles_and_rejects_unknown_paths() {
        let mut s = Settings::default();
        s.sync_configs(&["Templates/A.md"]);
        s.set_visible("Templates/A.md", false).unwrap();
        assert!(!s.template_configs[0].visible);

        let err = s.set_visible("Templates/Nope.md", true).unwrap_err();
        assert!(matches!(err, TdirError::UnknownTemplate(ref p) if p == "Templates/Nope.md"));
    }

    #[test]
    fn move_swaps_order_with_neighbor() {
        let mut s = Settings {
            template_configs: vec![
                config("A", true, 10),
                config("B", true, 20),
                config("C", true, 30),
            ],
            ..Settings::default()
        };
        assert!(s.move_config("C", MoveDirection::Up).unwrap());
        assert_eq!(paths(&s), ["A", "C", "B"]);
        assert_eq!(s.template_configs[1].order, 1);
        assert_eq!(s.template_configs[2].order, 2);

        assert!(s.move_config("A", MoveDirection::Down).unwrap());
        assert_eq!(paths(&s), ["C", "A", "B"]);
    }

    #[test]
    fn move_at_edges_is_a_no_op() {
        let mut s = Settings::default();
        s.sync_configs(&["A", "B"]);
        assert!(!s.move_config("A", MoveDirection::Up).unwrap());
        assert!(!s.move_config("B", MoveDirection::Down).unwrap());
        assert_eq!(paths(&s), ["A", "B"]);
    }

    #[test]
    fn move_separates_equal_orders() {
        let mut s = Settings {
            template_configs: vec![config("A", true, 0), config("B", true, 0)],
            ..Settings::default()
        };
        assert!(s.move_config("B", MoveDirection::Up).unwrap());
        assert_eq!(paths(&s), ["B", "A"]);
        assert!(s.template_configs[0].order < s.template_configs[1].order);
    }

    #[test]
    fn process_is_identity_when_variables_disabled() {
        let now = NaiveDate::from_ymd_opt(2025, 8, 30)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let s = Settings {
            variables_enabled: false,
            ..Settings::default()
        };
        let siblings = ["Week_01 2025-08-30"];
        assert_eq!(
            s.process("Week_{{+Number}} {{date}}", now, &siblings),
            "Week_{{+Number}} {{date}}"
        );
        assert_eq!(
            Settings::default().process("Week_{{+Number}} {{date}}", now, &siblings),
            "Week_02 2025-08-30"
        );
    }
}
