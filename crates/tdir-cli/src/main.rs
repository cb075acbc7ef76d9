//! tdir — create notes and folders from templates
//!
//! Commands: list, menu, preview, new, resolve, validate, watch, config

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use serde::Serialize;
use tracing::{info, level_filters::LevelFilter, warn};

use tdir_core::settings::SETTINGS_FILE;
use tdir_core::{MoveDirection, NameVerdict, Settings};
use tdir_vault::{
    filter_and_sort, list_templates, menu_entries, preview_name, sibling_names, sync_configs,
    Instantiator, Template, TemplateCatalog, TemplateWatcher,
};

#[derive(Parser)]
#[command(name = "tdir")]
#[command(version)]
#[command(about = "Create notes and folders from templates")]
struct Cli {
    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    /// Settings file (default: <vault>/.tdir.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List visible templates in configured order
    #[command(alias = "ls")]
    List,
    /// Show the template menu for a target folder
    Menu {
        /// Target folder (relative to the vault)
        #[arg(long, default_value = ".")]
        target: PathBuf,
    },
    /// Show the name a template would produce
    Preview {
        /// Template name as it appears in the template folder
        template: String,
        #[arg(long, default_value = ".")]
        target: PathBuf,
    },
    /// Create a note or folder from a template
    New {
        template: String,
        #[arg(long, default_value = ".")]
        target: PathBuf,
    },
    /// Substitute placeholders in a piece of text
    Resolve {
        text: String,
        /// Folder whose entries count for {{+Number}}
        #[arg(long)]
        target: Option<PathBuf>,
    },
    /// Check whether a name is safe to create
    Validate { name: String },
    /// Print the menu again whenever templates change
    Watch {
        #[arg(long, default_value = ".")]
        target: PathBuf,
    },
    /// Manage template visibility and order
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Drop configs for removed templates and add new ones
    Sync,
    /// Hide a template from menus
    Hide { template: String },
    /// Show a hidden template in menus
    Show { template: String },
    /// Move a template one place up or down in menus
    Move {
        template: String,
        #[arg(value_enum)]
        direction: Direction,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for MoveDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

#[derive(Serialize)]
struct PreviewOutput<'a> {
    template: &'a str,
    preview: String,
    #[serde(flatten)]
    verdict: NameVerdict,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

struct Workspace {
    vault: PathBuf,
    config: PathBuf,
    settings: Settings,
}

impl Workspace {
    fn load(vault: PathBuf, config: Option<PathBuf>) -> Result<Self> {
        let config = config.unwrap_or_else(|| vault.join(SETTINGS_FILE));
        let settings = Settings::load(&config)
            .with_context(|| format!("Failed to load settings from {}", config.display()))?;
        Ok(Self {
            vault,
            config,
            settings,
        })
    }

    fn target(&self, target: &Path) -> PathBuf {
        if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.vault.join(target)
        }
    }

    fn find_template(&self, name: &str) -> Result<Template> {
        let templates = list_templates(&self.vault, &self.settings)?;
        match templates.into_iter().find(|t| t.name == name) {
            Some(template) => Ok(template),
            None => bail!(
                "Template \"{name}\" not found in {}",
                self.settings.template_folder
            ),
        }
    }

    /// Sync configs with the template folder, apply `action`, and save.
    fn update_configs(&mut self, action: ConfigAction) -> Result<()> {
        let templates = list_templates(&self.vault, &self.settings)?;
        sync_configs(&mut self.settings, &templates);

        match action {
            ConfigAction::Sync => {}
            ConfigAction::Hide { template } => {
                let path = self.find_template(&template)?.path;
                self.settings.set_visible(&path, false)?;
            }
            ConfigAction::Show { template } => {
                let path = self.find_template(&template)?.path;
                self.settings.set_visible(&path, true)?;
            }
            ConfigAction::Move {
                template,
                direction,
            } => {
                let path = self.find_template(&template)?.path;
                if !self.settings.move_config(&path, direction.into())? {
                    info!(template = %path, "already at the edge, order unchanged");
                }
            }
        }

        self.settings
            .save(&self.config)
            .with_context(|| format!("Failed to save settings to {}", self.config.display()))
    }

    fn catalog(&self) -> Result<TemplateCatalog> {
        let mut catalog = TemplateCatalog::new(&self.vault, self.settings.clone());
        catalog.refresh()?;
        Ok(catalog)
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut ctx = Workspace::load(cli.vault, cli.config)?;

    match cli.command {
        Commands::List => {
            let templates = list_templates(&ctx.vault, &ctx.settings)?;
            print_json(&filter_and_sort(templates, &ctx.settings.template_configs))?;
        }
        Commands::Menu { target } => {
            let catalog = ctx.catalog()?;
            let entries = menu_entries(
                catalog.settings(),
                catalog.templates(),
                &ctx.target(&target),
                now(),
            )?;
            print_json(&entries)?;
        }
        Commands::Preview { template, target } => {
            let found = ctx.find_template(&template)?;
            let preview = preview_name(&ctx.settings, &found.name, &ctx.target(&target), now())?;
            print_json(&PreviewOutput {
                template: &found.path,
                verdict: NameVerdict::of(&preview),
                preview,
            })?;
        }
        Commands::New { template, target } => {
            let found = ctx.find_template(&template)?;
            let target = ctx.target(&target);
            let result = Instantiator::new(&ctx.settings)
                .create(&found, &target, now())
                .with_context(|| format!("Cannot create from template \"{template}\""))?;
            print_json(&result)?;
        }
        Commands::Resolve { text, target } => {
            let siblings = match target {
                Some(target) => sibling_names(&ctx.target(&target))?,
                None => Vec::new(),
            };
            println!("{}", ctx.settings.process(&text, now(), &siblings));
        }
        Commands::Validate { name } => {
            let verdict = NameVerdict::of(&name);
            print_json(&verdict)?;
            if !verdict.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config { action } => {
            ctx.update_configs(action)?;
            print_json(&ctx.settings.template_configs)?;
        }
        Commands::Watch { target } => {
            let target = ctx.target(&target);
            let mut catalog = ctx.catalog()?;
            let watcher = TemplateWatcher::start(&catalog.template_dir())?;
            info!(dir = %catalog.template_dir().display(), "watching templates");
            loop {
                print_json(&menu_entries(
                    catalog.settings(),
                    catalog.templates(),
                    &target,
                    now(),
                )?)?;
                while watcher.recv_timeout(Duration::from_secs(60)).is_none() {}
                // Let a burst of events settle before re-reading.
                std::thread::sleep(Duration::from_millis(200));
                watcher.drain();
                if let Err(e) = catalog.refresh() {
                    warn!(error = %e, "template refresh failed");
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
