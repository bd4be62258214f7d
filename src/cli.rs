use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Terminal music player with catalog search and a static site server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Directory of audio files appended after the built-in playlist
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the web front end; unknown GET paths fall back to index.html
    Serve {
        /// Port to listen on (beats $PORT and the config file)
        #[arg(short = 'p', long = "port", value_name = "PORT")]
        port: Option<u16>,

        /// Directory holding index.html and its assets
        #[arg(short = 'r', long = "root", value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Query the catalog backend and print JSON
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Search tracks by name
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Most popular tracks
    TopTracks,
    /// Featured playlists as returned by the backend
    Playlists,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_takes_a_directory() {
        let args = Args::parse_from(["encore", "-vv", "/music"]);
        assert_eq!(args.dir, Some(PathBuf::from("/music")));
        assert_eq!(args.verbosity, 2);
        assert!(args.command.is_none());
    }

    #[test]
    fn serve_accepts_port_and_root() {
        let args = Args::parse_from(["encore", "serve", "--port", "8080", "--root", "site"]);
        match args.command {
            Some(Command::Serve { port, root }) => {
                assert_eq!(port, Some(8080));
                assert_eq!(root, Some(PathBuf::from("site")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn catalog_search_takes_a_query() {
        let args = Args::parse_from(["encore", "catalog", "search", "nils frahm"]);
        assert!(matches!(
            args.command,
            Some(Command::Catalog {
                action: CatalogAction::Search { ref query }
            }) if query == "nils frahm"
        ));
    }

    #[test]
    fn directory_and_subcommand_conflict() {
        assert!(Args::try_parse_from(["encore", "/music", "config"]).is_err());
    }
}
