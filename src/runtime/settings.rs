use std::path::Path;

use crate::config::{self, Settings};

/// Load settings, falling back to defaults when the file is unreadable or
/// fails validation. Config is optional; problems never stop startup.
pub fn load_settings() -> Settings {
    let path = config::resolve_config_path();
    let (settings, problem) = settings_or_defaults(Settings::load(), path.as_deref());
    if let Some(problem) = problem {
        // Logging is not set up yet.
        eprintln!("encore: {problem}, using defaults");
    }
    settings
}

fn settings_or_defaults(
    loaded: Result<Settings, ::config::ConfigError>,
    path: Option<&Path>,
) -> (Settings, Option<String>) {
    let origin = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "the environment".to_string());
    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                Settings::default(),
                Some(format!("invalid config in {origin}: {msg}")),
            ),
        },
        Err(e) => (
            Settings::default(),
            Some(format!("failed to load config from {origin}: {e}")),
        ),
    }
}
