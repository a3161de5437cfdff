pub use clap::Parser;

use std::path::PathBuf;

use common::config::{HOST_ENV, SCHEME_ENV, TOKEN_ENV};
use common::prelude::{Config, Error};

#[derive(Parser, Debug)]
#[command(name = "garagectl", version)]
#[command(about = "Reconcile buckets, access keys, grants and aliases on a Garage cluster")]
pub struct Args {
    /// Admin API endpoint as host[:port]
    #[arg(long, global = true, env = HOST_ENV)]
    pub host: Option<String>,

    /// http or https (defaults to https)
    #[arg(long, global = true, env = SCHEME_ENV)]
    pub scheme: Option<String>,

    /// Admin API bearer token
    #[arg(long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the config file (defaults to ~/.config/garagectl/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}

impl Args {
    /// Flags and environment win over the config file, which wins over defaults.
    pub fn resolve_config(&self) -> Result<Config, Error> {
        let file = match &self.config {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!("{}: not found", path.display())));
            }
            Some(path) => Config::load(path)?,
            None => match Config::default_path() {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            },
        };

        Ok(file.merge(
            self.host.clone(),
            self.scheme.clone(),
            self.token.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["garagectl"];
        argv.extend_from_slice(extra);
        argv.push("version");
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "host = \"file-host:3903\"\nscheme = \"http\"\ntoken = \"file-token\"\n",
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();

        let args = parse(&["--config", &path, "--host", "flag-host:3903"]);
        let config = args.resolve_config().unwrap();

        assert_eq!(config.host, "flag-host:3903");
        assert_eq!(config.scheme, "http");
        assert_eq!(config.token, "file-token");
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let path = path.to_string_lossy().to_string();

        let args = parse(&["--config", &path, "--host", "h", "--token", "t"]);
        assert!(matches!(args.resolve_config(), Err(Error::Config(_))));
    }

    #[test]
    fn test_log_level_parses() {
        let args = parse(&["--log-level", "debug"]);
        assert_eq!(args.log_level, tracing::Level::DEBUG);
    }
}
