//! Cached template list for per-template menus.

use std::path::{Path, PathBuf};

use tracing::debug;

use tdir_core::error::Result;
use tdir_core::{MenuStyle, Settings};

use crate::template::{filter_and_sort, list_templates, Template};

/// Holds the filtered, ordered template list between menu openings.
///
/// Only the individual menu style keeps a cache; in grouped style the
/// picker lists templates fresh each time and the cache stays empty.
#[derive(Debug)]
pub struct TemplateCatalog {
    vault_root: PathBuf,
    settings: Settings,
    cached: Option<Vec<Template>>,
}

impl TemplateCatalog {
    /// Create an empty catalog. Call [`refresh`](Self::refresh) to fill it.
    #[must_use]
    pub fn new(vault_root: &Path, settings: Settings) -> Self {
        Self {
            vault_root: vault_root.to_path_buf(),
            settings,
            cached: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Absolute path of the template folder.
    #[must_use]
    pub fn template_dir(&self) -> PathBuf {
        self.vault_root
            .join(self.settings.template_folder.trim_matches('/'))
    }

    /// Re-read the template folder if the menu style needs a cache.
    ///
    /// On error the previous cache is kept.
    ///
    /// # Errors
    ///
    /// Returns [`tdir_core::TdirError::TemplateFolderNotFound`] or
    /// [`tdir_core::TdirError::Io`] from [`list_templates`].
    pub fn refresh(&mut self) -> Result<()> {
        if self.settings.menu_style != MenuStyle::Individual {
            self.cached = None;
            return Ok(());
        }
        let templates = list_templates(&self.vault_root, &self.settings)?;
        let templates = filter_and_sort(templates, &self.settings.template_configs);
        debug!(count = templates.len(), "template cache refreshed");
        self.cached = Some(templates);
        Ok(())
    }

    /// Replace the settings and refresh or clear the cache accordingly.
    ///
    /// # Errors
    ///
    /// See [`refresh`](Self::refresh).
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.refresh()
    }

    /// The cached templates; empty when nothing is cached.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        self.cached.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}
