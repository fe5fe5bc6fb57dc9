//! Configuration: CLI flags backed by a persistent flag file.
//!
//! Flags saved with `--save` land in a global config file and are prepended
//! to every later invocation; a `.markpadrc` in the working directory is
//! appended after the global file and so overrides it, and explicit
//! command-line flags override both (for single-value flags the last
//! occurrence wins).

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::app::DEFAULT_DEBOUNCE_MS;

const LOCAL_CONFIG_FILE: &str = ".markpadrc";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "markpad",
    version,
    about = "Terminal markdown editor with a debounced live preview",
    args_override_self = true
)]
pub struct Cli {
    /// Markdown file to edit (created on first save if missing)
    pub file: Option<PathBuf>,

    /// Quiet period in milliseconds before edits are committed to the preview
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Start with the preview pane hidden
    #[arg(long)]
    pub no_preview: bool,

    /// Maximum preview wrap width in columns
    #[arg(long)]
    pub wrap_width: Option<u16>,

    /// Append debug logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Save the given flags as defaults and exit
    #[arg(long)]
    pub save: bool,

    /// Delete saved defaults and exit
    #[arg(long)]
    pub clear: bool,
}

impl Cli {
    /// Parse the command line with saved defaults prepended.
    pub fn parse_merged() -> Self {
        let mut args: Vec<OsString> =
            vec![env::args_os().next().unwrap_or_else(|| "markpad".into())];
        args.extend(saved_tokens(&config_paths()).into_iter().map(OsString::from));
        args.extend(env::args_os().skip(1));
        Self::parse_from(args)
    }
}

/// Config files in precedence order: global first, then the local rc file.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(global) = global_config_path() {
        paths.push(global);
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
    paths
}

/// Flag tokens read from the given config files, in order.
///
/// Unreadable or missing files contribute nothing.
pub fn saved_tokens(paths: &[PathBuf]) -> Vec<String> {
    let mut tokens = Vec::new();
    for path in paths {
        if let Ok(contents) = fs::read_to_string(path) {
            tokens.extend(contents.split_whitespace().map(str::to_string));
        }
    }
    tokens
}

/// Platform config file: `$XDG_CONFIG_HOME/markpad/markpadrc`, or the
/// equivalent under `%APPDATA%` on Windows.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(windows)]
    let base = env::var_os("APPDATA").map(PathBuf::from);
    #[cfg(not(windows))]
    let base = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from).or_else(|| {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    });
    base.map(|dir| dir.join("markpad").join("markpadrc"))
}

/// Persist the current invocation's flags as defaults.
pub fn save_defaults() -> Result<PathBuf> {
    let tokens = persistable_tokens(env::args().skip(1));
    let path = global_config_path().context("no config directory available")?;
    write_defaults(&path, &tokens)?;
    Ok(path)
}

pub fn write_defaults(path: &Path, tokens: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, tokens.join(" ")).with_context(|| format!("writing {}", path.display()))
}

/// Delete saved defaults. Returns the path removed, if any existed.
pub fn clear_defaults() -> Result<Option<PathBuf>> {
    let Some(path) = global_config_path() else {
        return Ok(None);
    };
    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        return Ok(Some(path));
    }
    Ok(None)
}

/// Flags worth persisting: everything except `--save`, `--clear`, and the
/// positional file argument.
pub fn persistable_tokens(args: impl Iterator<Item = String>) -> Vec<String> {
    const VALUE_FLAGS: &[&str] = &["--debounce-ms", "--wrap-width", "--log-file"];

    let mut tokens = Vec::new();
    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        if arg == "--save" || arg == "--clear" {
            continue;
        }
        if arg.contains('=') {
            if arg.starts_with("--") {
                tokens.push(arg);
            }
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            tokens.push(arg);
            if let Some(value) = args.next() {
                tokens.push(value);
            }
            continue;
        }
        if arg.starts_with('-') {
            tokens.push(arg);
        }
        // bare tokens are the positional file argument; never persisted
    }
    tokens
}
