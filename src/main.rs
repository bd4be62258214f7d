use std::env;

use clap::Parser;

mod app;
mod audio;
mod catalog;
mod cli;
mod config;
mod library;
mod notice;
mod player;
mod runtime;
mod server;
mod ui;

#[cfg(test)]
mod test_support;

use catalog::HttpCatalog;
use cli::{Args, CatalogAction, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = runtime::load_settings();

    match args.command {
        None => runtime::run(args.dir, &settings, args.verbosity),
        Some(Command::Serve { port, root }) => {
            runtime::init_stderr(&runtime::level_for(&settings.logging, args.verbosity));
            let port = server::resolve_port(
                port,
                env::var("PORT").ok().as_deref(),
                settings.server.port,
            );
            let root = root.unwrap_or_else(|| settings.server.root.clone());
            server::serve(&settings.server, root, port)?;
            Ok(())
        }
        Some(Command::Catalog { action }) => {
            runtime::init_stderr(&runtime::level_for(&settings.logging, args.verbosity));
            let backend = HttpCatalog::new(&settings.catalog)?;
            let json = match action {
                CatalogAction::Search { query } => {
                    let tracks =
                        catalog::search(&backend, &query, settings.catalog.min_query_chars)?;
                    serde_json::to_string_pretty(&tracks)?
                }
                // Failures are logged and print as an empty list.
                CatalogAction::TopTracks => {
                    serde_json::to_string_pretty(&catalog::load_top_tracks(&backend))?
                }
                CatalogAction::Playlists => {
                    serde_json::to_string_pretty(&catalog::load_featured_playlists(&backend))?
                }
            };
            println!("{json}");
            Ok(())
        }
        Some(Command::Config) => {
            print!("{}", toml::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}
