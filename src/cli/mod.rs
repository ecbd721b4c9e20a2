// CLI interface
pub mod commands;

use crate::config::{CalendarZone, Config, RECORDS_ENV};
use crate::error::{Error, Result};
use crate::expiry::{Bucket, LabelStyle};
use crate::models::ManagedRecord;
use crate::records::{self, RecordSource};
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;

#[derive(Parser, Debug)]
#[command(name = "tenantwatch")]
#[command(about = "Track expiry dates of tenant and resident records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON snapshot of the backend's /users response ("-" for stdin)
    #[arg(long, global = true, env = RECORDS_ENV)]
    pub records: Option<String>,

    /// Reference time as RFC 3339 (defaults to now)
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Use UTC day boundaries instead of the configured calendar
    #[arg(long, global = true)]
    pub utc: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show dashboard counts for every expiry bucket
    Summary {
        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// List records, optionally narrowed to one bucket and a search query
    List {
        /// Bucket: expired, active, expiring1, expiring3, expiring10, all
        #[arg(short, long, default_value = "all")]
        bucket: Bucket,

        /// Case-insensitive match on name, house, phone or expiry date
        #[arg(short, long)]
        search: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Use compact labels ("3 days left")
        #[arg(long)]
        compact: bool,
    },

    /// Classify a single raw expiry value
    Classify {
        /// ISO-8601 expiry value, e.g. 2024-06-20T00:00:00Z
        value: String,

        /// Use compact labels ("3 days left")
        #[arg(long)]
        compact: bool,

        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report records with missing fields or unparseable expiry dates
    Validate {
        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    ///
    /// INSTALLATION:
    ///
    /// Bash:
    ///   eval "$(tenantwatch completions bash)"    # Add to ~/.bashrc
    ///
    /// Zsh:
    ///   eval "$(tenantwatch completions zsh)"     # Add to ~/.zshrc
    ///
    /// Fish:
    ///   tenantwatch completions fish > ~/.config/fish/completions/tenantwatch.fish
    ///
    /// PowerShell:
    ///   tenantwatch completions powershell | Out-String | Invoke-Expression
    ///
    /// Elvish:
    ///   eval (tenantwatch completions elvish | slurp)
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Create a sample config file
    Init,
    /// Show the config file location and whether it is valid
    Path,
    /// Update values in the config file
    Set {
        /// Records snapshot path to store in the config file
        #[arg(long)]
        records_file: Option<String>,

        /// Day boundaries: local or utc
        #[arg(long)]
        calendar: Option<CalendarZone>,

        /// Label style: full or compact
        #[arg(long)]
        label_style: Option<LabelStyle>,

        /// Whether the "all" bucket lists records with unparseable dates
        #[arg(long)]
        all_includes_unclassifiable: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Commands that read the records snapshot and need a reference instant
enum SnapshotCommand {
    Summary {
        json: bool,
    },
    List {
        bucket: Bucket,
        search: Option<String>,
        format: OutputFormat,
        compact: bool,
    },
    Classify {
        value: String,
        compact: bool,
        json: bool,
    },
    Validate {
        json: bool,
    },
}

/// Everything a snapshot command needs: settings, the reference instant,
/// and where the records live
pub struct Context<Tz: TimeZone> {
    pub config: Config,
    pub now: DateTime<Tz>,
    pub records: Option<String>,
}

impl<Tz: TimeZone> Context<Tz> {
    pub fn load_records(&self) -> Result<Vec<ManagedRecord>> {
        let path = self.config.records_path(self.records.clone())?;
        records::load_records(&RecordSource::parse(&path), &self.now.timezone())
    }

    pub fn label_style(&self, compact: bool) -> LabelStyle {
        if compact {
            LabelStyle::Compact
        } else {
            self.config.display.label_style
        }
    }
}

/// Reference instant in `zone`: the `--now` override, or the wall clock
pub fn reference_now<Tz: TimeZone>(now_arg: Option<&str>, zone: &Tz) -> Result<DateTime<Tz>> {
    match now_arg {
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|instant| instant.with_timezone(zone))
            .map_err(|_| Error::InvalidNow(raw.to_string())),
        None => Ok(Utc::now().with_timezone(zone)),
    }
}

pub fn execute(args: Cli) -> Result<()> {
    let command = match args.command {
        Commands::Config(command) => return commands::config::execute(command),
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            return Ok(());
        }
        Commands::Summary { json } => SnapshotCommand::Summary { json },
        Commands::List {
            bucket,
            search,
            format,
            compact,
        } => SnapshotCommand::List {
            bucket,
            search,
            format,
            compact,
        },
        Commands::Classify {
            value,
            compact,
            json,
        } => SnapshotCommand::Classify {
            value,
            compact,
            json,
        },
        Commands::Validate { json } => SnapshotCommand::Validate { json },
    };

    let config = Config::load()?;
    let zone = if args.utc {
        CalendarZone::Utc
    } else {
        config.calendar.zone
    };
    tracing::debug!("Using {:?} calendar", zone);

    match zone {
        CalendarZone::Local => {
            let now = reference_now(args.now.as_deref(), &Local)?;
            run(command, Context { config, now, records: args.records })
        }
        CalendarZone::Utc => {
            let now = reference_now(args.now.as_deref(), &Utc)?;
            run(command, Context { config, now, records: args.records })
        }
    }
}

fn run<Tz>(command: SnapshotCommand, ctx: Context<Tz>) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match command {
        SnapshotCommand::Summary { json } => commands::summary::execute(&ctx, json),
        SnapshotCommand::List {
            bucket,
            search,
            format,
            compact,
        } => commands::list::execute(&ctx, bucket, search, format, compact),
        SnapshotCommand::Classify {
            value,
            compact,
            json,
        } => commands::classify::execute(&ctx, &value, compact, json),
        SnapshotCommand::Validate { json } => commands::validate::execute(&ctx, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_now_override() {
        let now = reference_now(Some("2024-06-10T08:00:00+02:00"), &Utc).unwrap();
        assert_eq!(now.to_rfc3339(), "2024-06-10T06:00:00+00:00");
    }

    #[test]
    fn test_reference_now_rejects_garbage() {
        let err = reference_now(Some("yesterday"), &Utc).unwrap_err();
        assert!(matches!(err, Error::InvalidNow(ref raw) if raw == "yesterday"));
    }

    #[test]
    fn test_parse_list_arguments() {
        let cli = Cli::try_parse_from([
            "tenantwatch",
            "--records",
            "users.json",
            "list",
            "--bucket",
            "expiring3",
            "--search",
            "b-204",
        ])
        .unwrap();

        assert_eq!(cli.records.as_deref(), Some("users.json"));
        match cli.command {
            Commands::List {
                bucket,
                search,
                format,
                ..
            } => {
                assert_eq!(bucket, Bucket::ExpiringThreeDays);
                assert_eq!(search.as_deref(), Some("b-204"));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_list_format_argument() {
        let cli = Cli::try_parse_from(["tenantwatch", "list", "--format", "json"]).unwrap();
        match cli.command {
            Commands::List { format, .. } => assert_eq!(format, OutputFormat::Json),
            other => panic!("unexpected command: {:?}", other),
        }

        let result = Cli::try_parse_from(["tenantwatch", "list", "--format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_bucket_argument() {
        let result = Cli::try_parse_from(["tenantwatch", "list", "--bucket", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "tenantwatch",
            "config",
            "set",
            "--records-file",
            "/srv/users.json",
            "--calendar",
            "utc",
            "--all-includes-unclassifiable",
            "false",
        ])
        .unwrap();

        match cli.command {
            Commands::Config(ConfigCommand::Set {
                records_file,
                calendar,
                label_style,
                all_includes_unclassifiable,
            }) => {
                assert_eq!(records_file.as_deref(), Some("/srv/users.json"));
                assert_eq!(calendar, Some(CalendarZone::Utc));
                assert_eq!(label_style, None);
                assert_eq!(all_includes_unclassifiable, Some(false));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
