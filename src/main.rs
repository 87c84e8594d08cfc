//! rsloot 命令行：加载规则列表并以 JSON 输出单次查询结果

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use rsloot::{ConfigManager, Database, GameType, Version, is_compatible};

#[derive(Parser)]
#[command(name = "rsloot", version)]
#[command(about = "Query masterlist/userlist plugin metadata", long_about = None)]
struct Cli {
    /// Game the rule lists belong to (tes4, tes5, tes5se, tes5vr, fo3, fonv, fo4, fo4vr).
    #[arg(long, global = true, default_value = "tes5se")]
    game: GameType,

    /// Masterlist path. Omit to query without a masterlist.
    #[arg(long, global = true)]
    masterlist: Option<PathBuf>,

    /// Userlist path. Omit to query without a userlist.
    #[arg(long, global = true)]
    userlist: Option<PathBuf>,

    /// Default message language.
    #[arg(long, global = true, default_value = rsloot::config::DEFAULT_LANGUAGE)]
    language: String,

    /// Enable debug-level logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bash tag suggestions for a plugin.
    Tags { plugin: String },

    /// Localized messages attached to a plugin.
    Messages { plugin: String },

    /// Cleanliness verdict for a plugin.
    Cleanliness { plugin: String },

    /// Full merged metadata for a plugin.
    Metadata {
        plugin: String,

        /// Ignore userlist entries.
        #[arg(long)]
        masterlist_only: bool,
    },

    /// Localized messages that apply to every plugin.
    GeneralMessages,

    /// Bash tags declared by the loaded lists.
    BashTags,

    /// Write the tags and dirty info of every masterlist plugin to a new file.
    WriteMinimal {
        output: PathBuf,

        /// Replace an existing file.
        #[arg(long)]
        overwrite: bool,
    },

    /// Check whether a client version is compatible with this library.
    Compatible { major: u32, minor: u32, patch: u32 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Compatible { major, minor, patch } = cli.command {
        #[derive(Serialize)]
        struct Compatibility {
            library: String,
            compatible: bool,
        }
        return print_json(&Compatibility {
            library: Version::string(),
            compatible: is_compatible(major, minor, patch),
        });
    }

    let database = open_database(&cli)?;

    match cli.command {
        Commands::Tags { plugin } => print_json(&database.get_plugin_tags(&plugin)),
        Commands::Messages { plugin } => {
            let messages = database
                .get_plugin_messages(&plugin, &cli.language)
                .with_context(|| format!("failed to localize messages for `{}`", plugin))?;
            print_json(&messages)
        }
        Commands::Cleanliness { plugin } => print_json(&database.get_plugin_cleanliness(&plugin)),
        Commands::Metadata {
            plugin,
            masterlist_only,
        } => print_json(&database.get_plugin_metadata(&plugin, !masterlist_only)),
        Commands::GeneralMessages => {
            let messages = database
                .get_general_messages(&cli.language)
                .context("failed to localize general messages")?;
            print_json(&messages)
        }
        Commands::BashTags => print_json(&database.get_known_bash_tags()),
        Commands::WriteMinimal { output, overwrite } => {
            database
                .write_minimal_list(&output, overwrite)
                .with_context(|| format!("failed to write minimal list to {}", output.display()))?;
            print_json(&output)
        }
        Commands::Compatible { .. } => Ok(()),
    }
}

fn open_database(cli: &Cli) -> Result<Database> {
    let settings = ConfigManager::custom(cli.game)
        .default_language(cli.language.as_str())
        .build();
    let database = Database::new(settings);

    let masterlist = cli.masterlist.clone().unwrap_or_default();
    let userlist = cli.userlist.clone().unwrap_or_default();
    database
        .load_lists(&masterlist, &userlist)
        .with_context(|| {
            format!(
                "failed to load rule lists (masterlist: {}, userlist: {})",
                masterlist.display(),
                userlist.display()
            )
        })?;

    Ok(database)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();

    debug!("logging initialized at level: {}", level);
}
