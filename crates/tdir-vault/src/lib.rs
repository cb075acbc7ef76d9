//! # tdir-vault
//!
//! Template discovery and instantiation against a vault directory.
//!
//! The vault is a plain directory of notes. Templates live in a configured
//! folder inside it; instantiating one copies it into a target folder with
//! placeholders substituted via [`tdir_core`].

pub mod catalog;
pub mod instantiate;
pub mod menu;
pub mod template;
pub mod watcher;

pub use catalog::TemplateCatalog;
pub use instantiate::{Instantiation, Instantiator, SkippedEntry};
pub use menu::{menu_entries, menu_title, preview_name, MenuEntry};
pub use template::{
    filter_and_sort, list_templates, sibling_names, sync_configs, Template, TemplateKind,
};
pub use watcher::{TemplateEvent, TemplateWatcher};
