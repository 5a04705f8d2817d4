use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use qguard_core::{Dialect, QguardConfig, SqlEscaper};
use qguard_proxy::Qb;
use tracing_subscriber::EnvFilter;

mod commands;
mod plan;

use commands::escape::ValueKind;

#[derive(Parser, Debug)]
#[command(name = "qguard", version, about = "Build SQL through a sanitizing query proxy")]
struct Cli {
    /// Path to a qguard YAML configuration file
    #[arg(short, long, global = true, env = "QGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// SQL dialect (mariadb or postgres); overrides the config file
    #[arg(long, global = true)]
    dialect: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a YAML or JSON query plan to SQL.
    Render {
        /// Plan file (`.json` for JSON, anything else is read as YAML)
        plan: PathBuf,
    },

    /// Print the escaped SQL literal for a single value.
    #[command(group(ArgGroup::new("kind").args(["null", "int", "float", "boolean"])))]
    Escape {
        /// Raw value (omit with --null)
        value: Option<String>,

        /// Escape SQL NULL
        #[arg(long)]
        null: bool,

        /// Read the value as an integer
        #[arg(long)]
        int: bool,

        /// Read the value as a float
        #[arg(long)]
        float: bool,

        /// Read the value as a boolean
        #[arg(long = "bool")]
        boolean: bool,
    },
}

fn load_config(path: Option<&Path>, dialect: Option<&str>) -> Result<QguardConfig> {
    let mut config = match path {
        Some(path) => QguardConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => QguardConfig::default(),
    };
    if let Some(dialect) = dialect {
        config.dialect = dialect.parse::<Dialect>()?;
    }
    Ok(config)
}

fn value_kind(null: bool, int: bool, float: bool, boolean: bool) -> ValueKind {
    match (null, int, float, boolean) {
        (true, ..) => ValueKind::Null,
        (_, true, ..) => ValueKind::Int,
        (_, _, true, _) => ValueKind::Float,
        (.., true) => ValueKind::Bool,
        _ => ValueKind::Text,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid --log-level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref(), cli.dialect.as_deref())?;
    tracing::debug!(dialect = %config.dialect, percent = config.escape.percent, "loaded config");

    match cli.cmd {
        Command::Render { plan } => {
            let qb = Qb::new(config);
            commands::render::run(&qb, &plan)?;
        }
        Command::Escape {
            value,
            null,
            int,
            float,
            boolean,
        } => {
            let escaper = SqlEscaper::from_config(&config);
            let kind = value_kind(null, int, float, boolean);
            commands::escape::run(&escaper, value.as_deref(), kind)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["qguard", "--dialect", "postgres", "escape", "--int", "7"])
            .unwrap();
        assert_eq!(cli.dialect.as_deref(), Some("postgres"));
        assert!(matches!(cli.cmd, Command::Escape { int: true, .. }));
    }

    #[test]
    fn test_kind_flags_conflict() {
        assert!(Cli::try_parse_from(["qguard", "escape", "--int", "--bool", "1"]).is_err());
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(value_kind(false, false, false, false), ValueKind::Text);
        assert_eq!(value_kind(false, false, true, false), ValueKind::Float);
        assert_eq!(value_kind(false, false, false, true), ValueKind::Bool);
    }

    #[test]
    fn test_load_config_with_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dialect: postgres\nescape:\n  percent: true").unwrap();

        let config = load_config(Some(file.path()), None).unwrap();
        assert_eq!(config.dialect, Dialect::Postgres);
        assert!(config.escape.percent);

        let config = load_config(Some(file.path()), Some("mariadb")).unwrap();
        assert_eq!(config.dialect, Dialect::MariaDb);
        assert!(load_config(None, Some("oracle")).is_err());
    }
}
