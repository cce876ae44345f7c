/// git-sw:
/// Switching between git identities (work, personal, a client's
/// account) means editing ~/.gitconfig over and over. git-sw reads and
/// rewrites that file without reordering it, and can dump it to or load it
/// from JSON, YAML or TOML so profiles can be kept side by side.
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use git_sw::core::settings::{DocumentFormat, SettingsManager, SettingsProvider};
use git_sw::logging;
use git_sw::utils::{self, ValueKind};

#[derive(Parser, Debug)]
#[command(name = "git-sw")]
#[command(about = "Read and edit git config files without losing their order")]
struct Cli {
    /// Config file to operate on (defaults to the global git config)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the last value of a key
    Get { key: String },
    /// Print every value of a key
    GetAll { key: String },
    /// Print every entry whose key matches a regular expression
    GetRegexp {
        pattern: String,
        #[arg(long)]
        name_only: bool,
    },
    /// Replace the values of a key
    Set {
        key: String,
        #[arg(required = true)]
        values: Vec<String>,
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,
    },
    /// Append values to a key
    Add {
        key: String,
        #[arg(required = true)]
        values: Vec<String>,
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,
    },
    /// Remove a key and all of its values
    Unset { key: String },
    /// Print every entry as key=value
    List {
        #[arg(long)]
        name_only: bool,
    },
    /// Parse the config file and report problems
    Check,
    /// Write the config as a JSON, YAML or TOML document
    Export {
        #[arg(long, value_enum)]
        format: Option<DocumentFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge a JSON, YAML or TOML document into the config
    Import {
        path: PathBuf,
        #[arg(long, value_enum)]
        format: Option<DocumentFormat>,
        /// Replace existing values instead of appending to them
        #[arg(long)]
        replace: bool,
    },
    /// Create the settings file with default values
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match cli.settings {
        Some(path) => SettingsManager::new_at(path),
        None => SettingsManager::new()?,
    };
    let settings = manager.load_settings()?;
    logging::init(cli.verbose || settings.verbose);

    let file = cli.file;
    let config_path = || utils::resolve_config_path(file.clone(), &settings);

    match cli.command {
        Commands::Init => {
            let settings_path = manager.get_settings_path().display();
            if utils::initialize_settings(&manager)? {
                println!("✓ Created settings at {settings_path}");
            } else {
                println!("Settings already exist at {settings_path}");
            }
        }
        Commands::Get { key } => println!("{}", utils::get_value(&config_path()?, &key)?),
        Commands::GetAll { key } => {
            for value in utils::get_all_values(&config_path()?, &key)? {
                println!("{value}");
            }
        }
        Commands::GetRegexp { pattern, name_only } => {
            for line in utils::find_entries(&config_path()?, &pattern, name_only)? {
                println!("{line}");
            }
        }
        Commands::Set { key, values, kind } => {
            utils::set_values(&config_path()?, &key, kind, &values, false)?;
            println!("✓ Set {key}");
        }
        Commands::Add { key, values, kind } => {
            utils::set_values(&config_path()?, &key, kind, &values, true)?;
            println!("✓ Added {} value(s) to {key}", values.len());
        }
        Commands::Unset { key } => {
            utils::unset_key(&config_path()?, &key)?;
            println!("✓ Unset {key}");
        }
        Commands::List { name_only } => {
            for line in utils::list_entries(&config_path()?, name_only)? {
                println!("{line}");
            }
        }
        Commands::Check => {
            let path = config_path()?;
            let summary = utils::check_file(&path)?;
            println!(
                "✓ {} is valid: {} section(s), {} key(s), {} value(s)",
                path.display(),
                summary.sections,
                summary.keys,
                summary.values
            );
        }
        Commands::Export { format, output } => {
            let path = config_path()?;
            let format = format
                .or_else(|| output.as_deref().and_then(utils::infer_format))
                .unwrap_or(settings.export_format);
            let document = utils::export_config(&path, format, output.as_deref())?;
            match output {
                Some(output) => println!("✓ Exported {} to {}", path.display(), output.display()),
                None => print!("{document}"),
            }
        }
        Commands::Import {
            path: source,
            format,
            replace,
        } => {
            let path = config_path()?;
            let format = format
                .or_else(|| utils::infer_format(&source))
                .unwrap_or(settings.export_format);
            let count = utils::import_config(&path, &source, format, replace)?;
            println!("✓ Imported {count} key(s) into {}", path.display());
        }
    }

    Ok(())
}
