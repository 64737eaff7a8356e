//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the Ops Heaven engine.

use clap::{Parser, Subcommand};

/// Ops Heaven Engine - authorization and aggregation for the performance tracker
///
/// Loads a snapshot of the user directory and meeting records, then answers
/// the questions the UI layer asks: which sections a role can reach, whether
/// an actor may see or edit a record, and how scores roll up into team and
/// department figures and alerts.
#[derive(Parser, Debug)]
#[command(name = "ops-heaven")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the directory/meeting snapshot file
    #[arg(long, env = "OPSHEAVEN_DATA", global = true)]
    pub data: Option<String>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the engine
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the ordered sections reachable by a role
    Menu {
        /// Role to resolve (employee, manager, admin, super-admin)
        #[arg(long)]
        role: String,
    },

    /// Authorization decisions for profile fields and meeting entries
    Check {
        #[command(subcommand)]
        subcommand: CheckSubcommand,
    },

    /// Dashboard reports over the snapshot
    Report {
        #[command(subcommand)]
        subcommand: ReportSubcommand,
    },

    /// Scan the directory for threshold-based alerts
    Alerts {
        /// Observation instant (RFC 3339); defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Directory listings and search
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Meeting listings
    Meeting {
        #[command(subcommand)]
        subcommand: MeetingSubcommand,
    },

    /// Snapshot data management
    Data {
        #[command(subcommand)]
        subcommand: DataSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Authorization check subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CheckSubcommand {
    /// Decide access to one profile field of a target user
    Field {
        /// Acting user id (resolved against the directory)
        #[arg(long)]
        actor: String,

        /// Target user id
        #[arg(long)]
        target: String,

        /// Profile field (e.g. name, salary, qis, professional-notes)
        #[arg(long)]
        field: String,

        /// Ask about edit access instead of view access
        #[arg(long)]
        write: bool,
    },

    /// Decide access to one entry of a meeting
    Entry {
        /// Acting user id (resolved against the directory)
        #[arg(long)]
        actor: String,

        /// Meeting id
        #[arg(long)]
        meeting: String,

        /// Entry id
        #[arg(long)]
        entry: String,

        /// Ask about edit access instead of view access
        #[arg(long)]
        write: bool,
    },
}

/// Report subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ReportSubcommand {
    /// Team average and ranking for one manager
    Team {
        /// Manager user id
        #[arg(long)]
        manager: String,
    },

    /// Department averages (one department, or all)
    Department {
        /// Department name; omit for all departments
        #[arg(long)]
        name: Option<String>,
    },

    /// Trend delta over a historical score series
    Trend {
        /// Comma-separated scores, oldest first (e.g. "75,79,82,85")
        #[arg(long)]
        scores: String,
    },

    /// Company-wide summary
    Company,

    /// Goal progress and completion rate for one user
    Goals {
        /// Owning user id
        #[arg(long)]
        user: String,
    },
}

/// Directory subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum UserSubcommand {
    /// List users matching the given filters
    List {
        /// Case-insensitive substring over name and email
        #[arg(long)]
        search: Option<String>,

        /// Restrict to one role
        #[arg(long)]
        role: Option<String>,

        /// Restrict to one department
        #[arg(long)]
        department: Option<String>,

        /// Include inactive accounts
        #[arg(long)]
        include_inactive: bool,
    },
}

/// Meeting subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MeetingSubcommand {
    /// List a user's meetings with entry counts by type
    List {
        /// Attendee user id
        #[arg(long)]
        user: String,
    },
}

/// Snapshot data subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DataSubcommand {
    /// Write a sample snapshot file
    Init {
        /// Path where to create the snapshot (defaults to the configured path)
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing snapshot
        #[arg(short, long)]
        force: bool,
    },

    /// Load a snapshot and check every structural invariant
    Validate,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verifies that the CLI definition is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_menu_command() {
        let cli = Cli::parse_from(["ops-heaven", "menu", "--role", "manager"]);
        match cli.command {
            Commands::Menu { role } => assert_eq!(role, "manager"),
            _ => panic!("Expected Menu command"),
        }
    }

    #[test]
    fn test_check_field_command() {
        let cli = Cli::parse_from([
            "ops-heaven",
            "check",
            "field",
            "--actor",
            "sj",
            "--target",
            "jd",
            "--field",
            "salary",
            "--write",
        ]);
        match cli.command {
            Commands::Check {
                subcommand: CheckSubcommand::Field {
                    actor,
                    target,
                    field,
                    write,
                },
            } => {
                assert_eq!(actor, "sj");
                assert_eq!(target, "jd");
                assert_eq!(field, "salary");
                assert!(write);
            }
            _ => panic!("Expected Check Field command"),
        }
    }

    #[test]
    fn test_check_entry_defaults_to_view() {
        let cli = Cli::parse_from([
            "ops-heaven",
            "check",
            "entry",
            "--actor",
            "jd",
            "--meeting",
            "m1",
            "--entry",
            "e6",
        ]);
        match cli.command {
            Commands::Check {
                subcommand: CheckSubcommand::Entry { write, .. },
            } => assert!(!write),
            _ => panic!("Expected Check Entry command"),
        }
    }

    #[test]
    fn test_report_team_command() {
        let cli = Cli::parse_from(["ops-heaven", "report", "team", "--manager", "sj"]);
        match cli.command {
            Commands::Report {
                subcommand: ReportSubcommand::Team { manager },
            } => assert_eq!(manager, "sj"),
            _ => panic!("Expected Report Team command"),
        }
    }

    #[test]
    fn test_report_trend_command() {
        let cli = Cli::parse_from(["ops-heaven", "report", "trend", "--scores", "75,79,82"]);
        match cli.command {
            Commands::Report {
                subcommand: ReportSubcommand::Trend { scores },
            } => assert_eq!(scores, "75,79,82"),
            _ => panic!("Expected Report Trend command"),
        }
    }

    #[test]
    fn test_user_list_filters() {
        let cli = Cli::parse_from([
            "ops-heaven",
            "user",
            "list",
            "--search",
            "johnson",
            "--role",
            "employee",
            "--include-inactive",
        ]);
        match cli.command {
            Commands::User {
                subcommand:
                    UserSubcommand::List {
                        search,
                        role,
                        department,
                        include_inactive,
                    },
            } => {
                assert_eq!(search, Some("johnson".to_string()));
                assert_eq!(role, Some("employee".to_string()));
                assert!(department.is_none());
                assert!(include_inactive);
            }
            _ => panic!("Expected User List command"),
        }
    }

    #[test]
    fn test_report_goals_command() {
        let cli = Cli::parse_from(["ops-heaven", "report", "goals", "--user", "jd"]);
        match cli.command {
            Commands::Report {
                subcommand: ReportSubcommand::Goals { user },
            } => assert_eq!(user, "jd"),
            _ => panic!("Expected Report Goals command"),
        }
    }

    #[test]
    fn test_meeting_list_command() {
        let cli = Cli::parse_from(["ops-heaven", "meeting", "list", "--user", "jd"]);
        match cli.command {
            Commands::Meeting {
                subcommand: MeetingSubcommand::List { user },
            } => assert_eq!(user, "jd"),
            _ => panic!("Expected Meeting List command"),
        }
    }

    #[test]
    fn test_global_data_flag() {
        let cli = Cli::parse_from(["ops-heaven", "--data", "/tmp/data.json", "alerts"]);
        assert_eq!(cli.data, Some("/tmp/data.json".to_string()));
    }

    #[test]
    fn test_json_flag() {
        let cli = Cli::parse_from(["ops-heaven", "--json", "report", "company"]);
        assert!(cli.json);
    }

    #[test]
    fn test_verbose_flags() {
        let cli = Cli::parse_from(["ops-heaven", "-vv", "version"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::parse_from(["ops-heaven", "--quiet", "version"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_config_show() {
        let cli = Cli::parse_from(["ops-heaven", "config", "show"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Show { config },
            } => assert!(config.is_none()),
            _ => panic!("Expected Config Show command"),
        }
    }

    #[test]
    fn test_config_init_force() {
        let cli = Cli::parse_from(["ops-heaven", "config", "init", "--force"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Init { path, force },
            } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_data_init() {
        let cli = Cli::parse_from(["ops-heaven", "data", "init", "--path", "/tmp/data.json"]);
        match cli.command {
            Commands::Data {
                subcommand: DataSubcommand::Init { path, force },
            } => {
                assert_eq!(path, Some("/tmp/data.json".to_string()));
                assert!(!force);
            }
            _ => panic!("Expected Data Init command"),
        }
    }
}
