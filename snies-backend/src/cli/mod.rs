//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snies-backend", about = "SNIES software-activities reporting backend")]
pub struct Cli {
    /// SQLite database url; DATABASE_URL is used when omitted
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on; SNIES_BIND_ADDR is used when omitted
        #[arg(long)]
        addr: Option<String>,
    },
    /// Import activities from a filled-in template
    Import {
        /// Path to the .xlsx file
        file: PathBuf,
    },
    /// Export activities into the template layout
    Export {
        /// Where to write the .xlsx file
        file: PathBuf,
        #[arg(long, default_value_t = 5000)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// List stored activities
    List {
        #[arg(long, default_value_t = 100)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

/// Default database when neither the flag nor DATABASE_URL is set;
/// rwc mode creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:snies.db?mode=rwc";
/// Default listen address when neither the flag nor SNIES_BIND_ADDR is set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Flag wins over environment, environment over the default.
fn resolve(flag: Option<String>, env: Option<String>, default: &str) -> String {
    flag.or(env).unwrap_or_else(|| default.to_string())
}

impl Cli {
    /// Database url from the flag, DATABASE_URL, or the default file.
    pub fn database_url(&self) -> String {
        resolve(
            self.database_url.clone(),
            std::env::var("DATABASE_URL").ok(),
            DEFAULT_DATABASE_URL,
        )
    }
}

/// Listen address from the flag, SNIES_BIND_ADDR, or the default.
pub fn bind_addr(flag: Option<String>) -> String {
    resolve(flag, std::env::var("SNIES_BIND_ADDR").ok(), DEFAULT_BIND_ADDR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flag_beats_environment_beats_default() {
        let flag = Some("sqlite::memory:".to_string());
        let env = Some("sqlite:other.db".to_string());
        assert_eq!(resolve(flag.clone(), env.clone(), DEFAULT_DATABASE_URL), "sqlite::memory:");
        assert_eq!(resolve(None, env, DEFAULT_DATABASE_URL), "sqlite:other.db");
        assert_eq!(resolve(None, None, DEFAULT_DATABASE_URL), "sqlite:snies.db?mode=rwc");
        assert_eq!(resolve(None, None, DEFAULT_BIND_ADDR), "127.0.0.1:8080");
    }

    #[test]
    fn test_database_url_flag_is_global() {
        let cli = Cli::parse_from(["snies-backend", "list", "--database-url", "sqlite::memory:"]);
        assert_eq!(cli.database_url(), "sqlite::memory:");
    }
}
