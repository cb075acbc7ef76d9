//! Templates found in the vault's template folder.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use tdir_core::error::{Result, TdirError};
use tdir_core::{Settings, TemplateConfig};

/// Whether a template produces a single note or a folder tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    File,
    Folder,
}

/// A file or folder usable as a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Entry name, placeholders included (e.g. `Week_{{+Number}}.md`).
    pub name: String,
    /// Vault-relative path with `/` separators. Matched against
    /// [`TemplateConfig::path`].
    pub path: String,
    pub kind: TemplateKind,
    /// Location on disk.
    #[serde(skip)]
    pub source: PathBuf,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List the templates directly inside the configured template folder.
///
/// Markdown files are always templates; folders only when
/// `enable_folder_templates` is set. Hidden entries are skipped.
/// The result is sorted by name.
///
/// # Errors
///
/// Returns [`TdirError::TemplateFolderNotFound`] if the folder is missing
/// or is not a directory, and [`TdirError::Io`] if it cannot be read.
pub fn list_templates(vault_root: &Path, settings: &Settings) -> Result<Vec<Template>> {
    let folder_rel = settings.template_folder.trim_matches('/');
    let folder = vault_root.join(folder_rel);
    if !folder.is_dir() {
        return Err(TdirError::TemplateFolderNotFound(
            settings.template_folder.clone(),
        ));
    }

    let mut templates = Vec::new();
    for entry in fs::read_dir(&folder)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }
        let source = entry.path();

        let kind = if source.is_file()
            && source.extension().and_then(|e| e.to_str()) == Some("md")
        {
            TemplateKind::File
        } else if source.is_dir() && settings.enable_folder_templates {
            TemplateKind::Folder
        } else {
            continue;
        };

        templates.push(Template {
            path: format!("{folder_rel}/{name}"),
            name,
            kind,
            source,
        });
    }

    templates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(templates)
}

/// Apply per-template visibility and ordering.
///
/// With no configs every template is returned as is. Otherwise only
/// templates with a visible config appear, by ascending `order`.
#[must_use]
pub fn filter_and_sort(templates: Vec<Template>, configs: &[TemplateConfig]) -> Vec<Template> {
    if configs.is_empty() {
        return templates;
    }

    let mut visible: Vec<&TemplateConfig> = configs.iter().filter(|c| c.visible).collect();
    visible.sort_by_key(|c| c.order);

    visible
        .into_iter()
        .filter_map(|config| templates.iter().find(|t| t.path == config.path).cloned())
        .collect()
}

/// Sync `settings.template_configs` with the templates currently on disk.
/// See [`Settings::sync_configs`].
pub fn sync_configs(settings: &mut Settings, templates: &[Template]) {
    let paths: Vec<&str> = templates.iter().map(|t| t.path.as_str()).collect();
    settings.sync_configs(&paths);
}

/// Snapshot of the entry names in `dir`, sorted. A missing directory has
/// no entries.
///
/// # Errors
///
/// Returns [`TdirError::Io`] if the directory exists but cannot be read.
pub fn sibling_names(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = entries
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
