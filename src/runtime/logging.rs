//! `env_logger` setup. The player logs to a file so the screen stays clean;
//! one-shot subcommands log to stderr.

use std::fs::{self, OpenOptions};

use env_logger::{Builder, Env, Target};

use crate::config::{LoggingSettings, default_log_path};

/// Effective filter: `-v` raises the configured level, `RUST_LOG` beats both.
pub fn level_for(settings: &LoggingSettings, verbosity: u8) -> String {
    match verbosity {
        0 => settings.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn builder(level: &str) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.format_timestamp_millis();
    builder
}

/// Log to `logging.file` (or the XDG state dir). Without a usable file, logging stays off.
pub fn init_file(settings: &LoggingSettings, level: &str) {
    let Some(path) = settings.file.clone().or_else(default_log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            if builder(level)
                .target(Target::Pipe(Box::new(file)))
                .try_init()
                .is_ok()
            {
                log::info!("logging to {} (level: {level})", path.display());
            }
        }
        Err(e) => eprintln!("encore: cannot open log file {}: {e}", path.display()),
    }
}

pub fn init_stderr(level: &str) {
    let _ = builder(level).target(Target::Stderr).try_init();
}
