use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use padconfig::{AntialiasSetting, PlaygroundConfig};
use playground::{ExportAction, SessionConfig, DEFAULT_FRAGMENT_SHADER};
use renderer::{Antialiasing, Playground, WindowConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::{CheckArgs, InitArgs, RunArgs};
use crate::document::WatchedDocument;
use crate::export::dialog_handlers;
use crate::paths::AppPaths;

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let config = resolve_config(&args, &paths)?;

    let shader = args
        .shader
        .clone()
        .unwrap_or_else(|| paths.scratch_shader());
    if ensure_shader(&shader)? {
        tracing::info!(path = %shader.display(), "created shader from the built-in default");
    }

    let export_dir = export_directory(&args, &config, &shader);
    tracing::debug!(dir = %export_dir.display(), "export directory");
    let export = dialog_handlers(export_dir, &config.export.extension);

    Playground::new(window_config(&config)).run(
        |notifier| {
            WatchedDocument::open(&shader, move || {
                notifier.notify_edit();
            })
        },
        export,
    )
}

pub fn init(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite",
            args.path.display()
        );
    }
    write_default_shader(&args.path)?;
    println!("Wrote default shader to {}", args.path.display());
    Ok(())
}

pub fn check(args: CheckArgs) -> Result<()> {
    let source = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    match renderer::check_fragment(&source) {
        Ok(_) => {
            println!("{}: ok", args.path.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.log);
            bail!("{} failed to compile", args.path.display())
        }
    }
}

pub fn print_paths() -> Result<()> {
    let paths = AppPaths::discover()?;
    println!("config: {}", paths.config_dir().display());
    println!("config file: {}", paths.config_file().display());
    println!("data:   {}", paths.data_dir().display());
    println!("scratch shader: {}", paths.scratch_shader().display());
    Ok(())
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the config file and applies command-line overrides on top.
///
/// An explicit `--config` must exist; the discovered default may be absent.
fn resolve_config(args: &RunArgs, paths: &AppPaths) -> Result<PlaygroundConfig> {
    let mut config = match &args.config {
        Some(path) => PlaygroundConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let path = paths.config_file();
            PlaygroundConfig::load_or_default(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
    };

    if let Some(ms) = args.debounce_ms {
        config.debounce = std::time::Duration::from_millis(ms);
    }
    if let Some((width, height)) = args.size {
        config.window.width = width;
        config.window.height = height;
    }
    if let Some(antialias) = args.antialias {
        config.window.antialias = antialias;
    }
    if let Some(dir) = &args.export_dir {
        config.export.directory = Some(dir.clone());
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Writes the default shader when `path` does not exist yet. Returns whether
/// a file was created.
fn ensure_shader(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_default_shader(path)?;
    Ok(true)
}

fn write_default_shader(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_FRAGMENT_SHADER)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn export_directory(args: &RunArgs, config: &PlaygroundConfig, shader: &Path) -> PathBuf {
    args.export_dir
        .clone()
        .or_else(|| config.export.directory.clone())
        .or_else(|| {
            shader
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn window_config(config: &PlaygroundConfig) -> WindowConfig {
    WindowConfig {
        surface_size: (config.window.width, config.window.height),
        title: config.window.title.clone(),
        antialiasing: antialiasing_from(config.window.antialias),
        session: session_config(config),
    }
}

fn session_config(config: &PlaygroundConfig) -> SessionConfig {
    SessionConfig {
        debounce: config.debounce,
        time_scale: config.time_scale,
        export: ExportAction::new(
            config.export.default_name.clone(),
            config.export.extension.clone(),
        ),
    }
}

fn antialiasing_from(setting: AntialiasSetting) -> Antialiasing {
    match setting.samples() {
        None => Antialiasing::Auto,
        Some(0 | 1) => Antialiasing::Off,
        Some(samples) => Antialiasing::Samples(samples),
    }
}
