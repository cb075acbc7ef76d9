//! Menu entries offered for a target folder.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;

use tdir_core::error::Result;
use tdir_core::{validate_name, DisplayMode, MenuStyle, Settings};

use crate::template::{sibling_names, Template, TemplateKind};

pub const GROUPED_TITLE: &str = "Create from template";
pub const EMPTY_TITLE: &str = "No templates found";
const INVALID_SUFFIX: &str = " (Invalid)";

/// One selectable (or disabled) entry in a folder's template menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub title: String,
    /// Vault-relative template path; `None` for the grouped and empty entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TemplateKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MenuEntry {
    fn plain(title: &str, enabled: bool) -> Self {
        Self {
            title: title.to_string(),
            template: None,
            kind: None,
            preview: None,
            enabled,
            error: None,
        }
    }
}

/// The name a template would produce in `target_dir` right now.
///
/// # Errors
///
/// Returns [`tdir_core::TdirError::Io`] if `target_dir` cannot be listed.
pub fn preview_name(
    settings: &Settings,
    template_name: &str,
    target_dir: &Path,
    now: NaiveDateTime,
) -> Result<String> {
    let siblings = sibling_names(target_dir)?;
    Ok(settings.process(template_name, now, &siblings))
}

/// Title for a per-template entry, before any invalid marker.
#[must_use]
pub fn menu_title(template_name: &str, preview: &str, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Template => template_name.to_string(),
        DisplayMode::Result => preview.to_string(),
        DisplayMode::Both if preview == template_name => template_name.to_string(),
        DisplayMode::Both => format!("{template_name} → {preview}"),
    }
}

/// Build the menu for `target_dir`.
///
/// `templates` should already be filtered and ordered (see
/// [`crate::filter_and_sort`]). In grouped style the menu is a single entry
/// and `templates` is not consulted. Entries whose preview fails validation
/// are disabled and carry the error.
///
/// # Errors
///
/// Returns [`tdir_core::TdirError::Io`] if `target_dir` cannot be listed.
pub fn menu_entries(
    settings: &Settings,
    templates: &[Template],
    target_dir: &Path,
    now: NaiveDateTime,
) -> Result<Vec<MenuEntry>> {
    if settings.menu_style == MenuStyle::Grouped {
        return Ok(vec![MenuEntry::plain(GROUPED_TITLE, true)]);
    }
    if templates.is_empty() {
        return Ok(vec![MenuEntry::plain(EMPTY_TITLE, false)]);
    }

    let siblings = sibling_names(target_dir)?;
    let entries = templates
        .iter()
        .map(|template| {
            let preview = settings.process(&template.name, now, &siblings);
            let error = validate_name(&preview).err().map(|e| e.to_string());
            let mut title = menu_title(&template.name, &preview, settings.display_mode);
            if error.is_some() {
                title.push_str(INVALID_SUFFIX);
            }
            MenuEntry {
                title,
                template: Some(template.path.clone()),
                kind: Some(template.kind),
                preview: Some(preview),
                enabled: error.is_none(),
                error,
            }
        })
        .collect();

    Ok(entries)
}
