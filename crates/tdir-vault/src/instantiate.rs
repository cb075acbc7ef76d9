//! Creating notes and folders from templates.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use tdir_core::error::{Result, TdirError};
use tdir_core::{validate_name, Settings};

use crate::template::{sibling_names, Template, TemplateKind};

/// A template child that was not copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub source: PathBuf,
    /// The processed name that was rejected.
    pub name: String,
    pub reason: String,
}

/// Outcome of [`Instantiator::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instantiation {
    /// Path of the new note or folder.
    pub created: PathBuf,
    /// Children of a folder template that were skipped.
    pub skipped: Vec<SkippedEntry>,
}

/// Instantiates templates into target folders.
///
/// Every name is processed against a snapshot of its destination folder
/// taken right before it is written, then validated. Nothing is ever
/// overwritten.
#[derive(Debug, Clone, Copy)]
pub struct Instantiator<'a> {
    settings: &'a Settings,
}

impl<'a> Instantiator<'a> {
    #[must_use]
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Create a new note or folder in `target_dir` from `template`.
    ///
    /// `now` is shared by every substitution in this call.
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::InvalidName`] if the top-level processed name is invalid,
    /// [`TdirError::AlreadyExists`] if it is taken, [`TdirError::TargetInsideTemplate`]
    /// if a folder template would be copied into itself, and [`TdirError::Io`] on
    /// I/O failure. A folder copy that fails partway is removed before returning.
    pub fn create(
        &self,
        template: &Template,
        target_dir: &Path,
        now: NaiveDateTime,
    ) -> Result<Instantiation> {
        let siblings = sibling_names(target_dir)?;
        let name = self.settings.process(&template.name, now, &siblings);
        validate_name(&name)?;
        let dest = target_dir.join(&name);

        let mut skipped = Vec::new();
        match template.kind {
            TemplateKind::File => self.copy_file(&template.source, &dest, now, &siblings)?,
            TemplateKind::Folder => {
                ensure_outside(&template.source, target_dir)?;
                // Snapshot first so nothing created below is copied again.
                let tree = collect_tree(&template.source)?;
                create_dir_new(&dest)?;
                if let Err(e) = self.copy_tree(&tree, &dest, now, &mut skipped) {
                    if let Err(cleanup) = fs::remove_dir_all(&dest) {
                        warn!(dest = %dest.display(), error = %cleanup, "could not remove partial copy");
                    }
                    return Err(e);
                }
            }
        }

        info!(template = %template.path, created = %dest.display(), "created from template");
        Ok(Instantiation {
            created: dest,
            skipped,
        })
    }

    fn copy_file(
        &self,
        source: &Path,
        dest: &Path,
        now: NaiveDateTime,
        siblings: &[String],
    ) -> Result<()> {
        let bytes = fs::read(source)?;
        // Non-UTF-8 files (images, attachments) are copied byte for byte.
        let content = match String::from_utf8(bytes) {
            Ok(text) => self.settings.process(&text, now, siblings).into_bytes(),
            Err(raw) => raw.into_bytes(),
        };
        write_new(dest, &content)
    }

    fn copy_tree(
        &self,
        entries: &[SourceEntry],
        dest_dir: &Path,
        now: NaiveDateTime,
        skipped: &mut Vec<SkippedEntry>,
    ) -> Result<()> {
        for entry in entries {
            let source = entry.path();
            let raw_name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let siblings = sibling_names(dest_dir)?;
            let name = self.settings.process(&raw_name, now, &siblings);

            if let Err(e) = validate_name(&name) {
                warn!(source = %source.display(), name = %name, error = %e, "skipping template entry");
                skipped.push(SkippedEntry {
                    source: source.to_path_buf(),
                    name,
                    reason: e.to_string(),
                });
                continue;
            }

            let dest = dest_dir.join(&name);
            let result = match entry {
                SourceEntry::Dir(_, children) => create_dir_new(&dest)
                    .and_then(|()| self.copy_tree(children, &dest, now, skipped)),
                SourceEntry::File(_) => self.copy_file(source, &dest, now, &siblings),
            };

            match result {
                Ok(()) => {}
                Err(TdirError::AlreadyExists(path)) if path == dest => {
                    warn!(source = %source.display(), name = %name, "skipping template entry: name taken");
                    skipped.push(SkippedEntry {
                        source: source.to_path_buf(),
                        name,
                        reason: format!("already exists: {}", path.display()),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

/// A folder template's contents, read before anything is created.
#[derive(Debug)]
enum SourceEntry {
    File(PathBuf),
    Dir(PathBuf, Vec<SourceEntry>),
}

impl SourceEntry {
    fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Dir(path, _) => path,
        }
    }
}

/// Read `dir` recursively, children sorted by path. Symlinks are not
/// followed into directories.
fn collect_tree(dir: &Path) -> Result<Vec<SourceEntry>> {
    let mut children = fs::read_dir(dir)?
        .map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?.is_dir()))))
        .collect::<std::io::Result<Vec<_>>>()?;
    children.sort();

    children
        .into_iter()
        .map(|(path, is_dir)| {
            if is_dir {
                let nested = collect_tree(&path)?;
                Ok(SourceEntry::Dir(path, nested))
            } else {
                Ok(SourceEntry::File(path))
            }
        })
        .collect()
}

/// Reject a target that is the template folder itself or lies inside it.
fn ensure_outside(template_dir: &Path, target_dir: &Path) -> Result<()> {
    let canonical = |p: &Path| p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
    let template = canonical(template_dir);
    let target = canonical(target_dir);
    if target.starts_with(&template) {
        return Err(TdirError::TargetInsideTemplate { template, target });
    }
    Ok(())
}

fn already_exists(e: std::io::Error, path: &Path) -> TdirError {
    if e.kind() == std::io::ErrorKind::AlreadyExists {
        TdirError::AlreadyExists(path.to_path_buf())
    } else {
        TdirError::Io(e)
    }
}

fn write_new(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| already_exists(e, path))?;
    file.write_all(content)?;
    Ok(())
}

fn create_dir_new(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| already_exists(e, path))
}
