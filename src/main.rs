//! Ops Heaven Engine - authorization and aggregation CLI
//!
//! This is the main entry point for the engine binary. It loads a
//! snapshot of the user directory and meeting records, then answers
//! navigation, visibility, and aggregation queries on behalf of the
//! UI layer.

mod aggregate;
mod authz;
mod cli;
mod config;
mod directory;
mod error;
mod logging;
mod snapshot;
mod store;
mod types;
mod version;

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{
    company_summary, department_average, department_stats, goal_completion, team_average,
    team_ranking, trend, AlertEngine, PerformanceBand,
};
use crate::authz::{menu_for, AccessMode, Actor, ProfileField, VisibilityFilter};
use crate::cli::{
    CheckSubcommand, Cli, Commands, ConfigSubcommand, DataSubcommand, MeetingSubcommand,
    ReportSubcommand, UserSubcommand,
};
use crate::config::EngineConfig;
use crate::directory::{Directory, UserFilter};
use crate::error::{Error, Result};
use crate::snapshot::{DataSet, Snapshot};
use crate::types::{EntryType, Role, User};

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    // For commands that don't need full logging, use simple setup
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return;
        }
        Commands::Config { subcommand } => {
            // Config commands use minimal logging
            let _ = logging::init_simple(tracing::Level::WARN);
            if let Err(e) = handle_config_command(subcommand.clone()) {
                fail(e);
            }
            return;
        }
        _ => {}
    }

    // Load config (or use defaults)
    let config = match EngineConfig::load(None) {
        Ok(cfg) => cfg,
        Err(e) => fail(e),
    };

    // Initialize logging with config settings.
    // The guards must be kept alive for the lifetime of the program.
    let _log_guards = match logging::init_logging(&config.logging, cli.verbose, cli.quiet) {
        Ok(guards) => guards,
        Err(e) => fail(e),
    };

    if let Err(e) = run(&cli, &config) {
        fail(e);
    }
}

/// Print the error and exit with its mapped code
fn fail(e: Error) -> ! {
    eprint!("{}", e.format_for_terminal());
    std::process::exit(e.exit_code());
}

/// Dispatch one parsed command
fn run(cli: &Cli, config: &EngineConfig) -> Result<()> {
    match &cli.command {
        Commands::Menu { role } => handle_menu(role, cli.json),
        Commands::Check { subcommand } => handle_check(cli, config, subcommand.clone()),
        Commands::Report { subcommand } => handle_report(cli, config, subcommand.clone()),
        Commands::Alerts { as_of } => handle_alerts(cli, config, as_of.as_deref()),
        Commands::User { subcommand } => handle_user(cli, config, subcommand.clone()),
        Commands::Meeting { subcommand } => handle_meeting(cli, config, subcommand.clone()),
        Commands::Data { subcommand } => handle_data(cli, config, subcommand.clone()),
        Commands::Version | Commands::Config { .. } => unreachable!(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Snapshot and Actor Resolution
// ─────────────────────────────────────────────────────────────────

/// Resolve the snapshot path: --data flag first, configured path otherwise
fn snapshot_path(cli: &Cli, config: &EngineConfig) -> PathBuf {
    match &cli.data {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => config.snapshot_file(),
    }
}

/// Load and hydrate the snapshot behind the decision commands
fn open_data(cli: &Cli, config: &EngineConfig) -> Result<DataSet> {
    let path = snapshot_path(cli, config);
    debug!(path = %path.display(), "Opening snapshot");
    Snapshot::open(&path)
}

/// Build the session actor from the trusted id, resolving the role
/// from the directory record
fn resolve_actor(directory: &Directory, actor_id: &str) -> Result<Actor> {
    let user = directory.require(actor_id)?;
    Ok(Actor::new(&user.id, user.role))
}

// ─────────────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────────────

fn handle_menu(role: &str, json: bool) -> Result<()> {
    let role: Role = role.parse()?;
    let sections = menu_for(role);

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
    } else {
        for section in &sections {
            println!("{}", section);
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Authorization Checks
// ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Decision<'a> {
    allowed: bool,
    actor: &'a str,
    mode: &'a str,
    subject: String,
}

fn handle_check(cli: &Cli, config: &EngineConfig, subcommand: CheckSubcommand) -> Result<()> {
    let data = open_data(cli, config)?;
    let filter = VisibilityFilter::new(&data.directory);

    match subcommand {
        CheckSubcommand::Field {
            actor,
            target,
            field,
            write,
        } => {
            let actor = resolve_actor(&data.directory, &actor)?;
            let field: ProfileField = field.parse()?;
            let mode = if write { AccessMode::Edit } else { AccessMode::View };

            filter.authorize_profile(&actor, &target, field, mode)?;

            info!(
                actor = %actor.id,
                target = %target,
                field = %field,
                mode = ?mode,
                "Access granted"
            );
            render_decision(
                cli.json,
                Decision {
                    allowed: true,
                    actor: &actor.id,
                    mode: if write { "edit" } else { "view" },
                    subject: format!("field '{}' of {}", field, target),
                },
            )
        }
        CheckSubcommand::Entry {
            actor,
            meeting,
            entry,
            write,
        } => {
            let actor = resolve_actor(&data.directory, &actor)?;
            // Meeting existence is redacted the same way user existence is
            let meeting = data
                .meetings
                .require(&meeting)
                .map_err(Error::redact_existence)?;
            let mode = if write { AccessMode::Edit } else { AccessMode::View };

            filter.authorize_entry(&actor, &meeting, &entry, mode)?;

            info!(
                actor = %actor.id,
                meeting = %meeting.id,
                entry = %entry,
                mode = ?mode,
                "Access granted"
            );
            render_decision(
                cli.json,
                Decision {
                    allowed: true,
                    actor: &actor.id,
                    mode: if write { "edit" } else { "view" },
                    subject: format!("entry {} of meeting {}", entry, meeting.id),
                },
            )
        }
    }
}

fn render_decision(json: bool, decision: Decision<'_>) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!(
            "allowed: {} may {} {}",
            decision.actor, decision.mode, decision.subject
        );
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TeamMemberRow {
    id: String,
    name: String,
    position: String,
    qis: u8,
    band: PerformanceBand,
}

#[derive(Serialize)]
struct TeamReport {
    manager_id: String,
    manager_name: String,
    average_qis: f64,
    members: Vec<TeamMemberRow>,
}

fn handle_report(cli: &Cli, config: &EngineConfig, subcommand: ReportSubcommand) -> Result<()> {
    match subcommand {
        ReportSubcommand::Team { manager } => {
            let data = open_data(cli, config)?;
            let manager_user = data.directory.require(&manager)?;
            let users = data.directory.snapshot();

            let average = team_average(&users, &manager)?;
            let members: Vec<TeamMemberRow> = team_ranking(&users, &manager)
                .into_iter()
                .map(|u| TeamMemberRow {
                    band: PerformanceBand::for_score(u.qis),
                    id: u.id,
                    name: u.name,
                    position: u.position,
                    qis: u.qis,
                })
                .collect();

            let report = TeamReport {
                manager_id: manager_user.id.clone(),
                manager_name: manager_user.name.clone(),
                average_qis: average,
                members,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Team of {} ({}): {} active report(s), average QIS {:.1}",
                    report.manager_name,
                    report.manager_id,
                    report.members.len(),
                    report.average_qis
                );
                for (rank, member) in report.members.iter().enumerate() {
                    println!(
                        "  {}. {} ({})  QIS {}  {}",
                        rank + 1,
                        member.name,
                        member.position,
                        member.qis,
                        member.band
                    );
                }
            }
            Ok(())
        }
        ReportSubcommand::Department { name } => {
            let data = open_data(cli, config)?;
            let users = data.directory.snapshot();

            match name {
                Some(name) => {
                    let average = department_average(&users, &name)?;
                    let headcount = users
                        .iter()
                        .filter(|u| u.is_active() && u.department.eq_ignore_ascii_case(&name))
                        .count();
                    if cli.json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&serde_json::json!({
                                "name": name,
                                "headcount": headcount,
                                "average": average,
                            }))?
                        );
                    } else {
                        println!("{}: {} active, average QIS {:.1}", name, headcount, average);
                    }
                }
                None => {
                    let stats = department_stats(&users, &[]);
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    } else {
                        for stat in &stats {
                            println!(
                                "{}: {} active, average QIS {:.1}",
                                stat.name, stat.headcount, stat.average
                            );
                        }
                    }
                }
            }
            Ok(())
        }
        ReportSubcommand::Trend { scores } => {
            let series = parse_scores(&scores)?;
            let delta = trend(&series)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "points": series.len(),
                        "delta": delta,
                    }))?
                );
            } else {
                println!("trend delta: {:+.1} over {} points", delta, series.len());
            }
            Ok(())
        }
        ReportSubcommand::Company => {
            let data = open_data(cli, config)?;
            let users = data.directory.snapshot();
            let summary = company_summary(&users);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Total users:    {}", summary.total_users);
                println!("Active users:   {}", summary.active_users);
                match summary.average_qis {
                    Some(avg) => println!("Average QIS:    {:.1}", avg),
                    None => println!("Average QIS:    no data"),
                }
                println!("Managers:       {}", summary.manager_count);
            }
            Ok(())
        }
        ReportSubcommand::Goals { user } => {
            let data = open_data(cli, config)?;
            let owner = data.directory.require(&user)?;
            let goals = data.goals.for_owner(&owner.id);
            let completion = goal_completion(&goals)?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "user": owner.id,
                        "completed": completion.completed,
                        "total": completion.total,
                        "rate": completion.rate,
                        "goals": goals,
                    }))?
                );
            } else {
                println!(
                    "Goals of {}: {}/{} completed ({:.0}% completion rate)",
                    owner.name, completion.completed, completion.total, completion.rate
                );
                for goal in &goals {
                    println!("  {:<36} {:>3}%  {}", goal.title, goal.progress, goal.status());
                }
            }
            Ok(())
        }
    }
}

/// Parse a comma-separated score series
fn parse_scores(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| Error::Config(format!("Invalid score value '{}'", part.trim())))
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────
// Alerts
// ─────────────────────────────────────────────────────────────────

fn handle_alerts(cli: &Cli, config: &EngineConfig, as_of: Option<&str>) -> Result<()> {
    let data = open_data(cli, config)?;
    let users = data.directory.snapshot();

    let as_of = match as_of {
        Some(raw) => raw
            .parse::<chrono::DateTime<chrono::Utc>>()
            .map_err(|_| Error::Config(format!("Invalid --as-of timestamp '{}'", raw)))?,
        None => chrono::Utc::now(),
    };

    let engine = AlertEngine::new(
        config.engine.low_qis_threshold,
        config.engine.new_user_window_hours,
    );
    let alerts = engine.scan(&users, &data.events, as_of);

    info!(count = alerts.len(), threshold = engine.threshold(), "Alert scan complete");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
    } else if alerts.is_empty() {
        println!("no alerts");
    } else {
        for alert in &alerts {
            println!("[{}] {}", alert.priority, alert.message);
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Directory Listings
// ─────────────────────────────────────────────────────────────────

fn handle_user(cli: &Cli, config: &EngineConfig, subcommand: UserSubcommand) -> Result<()> {
    match subcommand {
        UserSubcommand::List {
            search,
            role,
            department,
            include_inactive,
        } => {
            let data = open_data(cli, config)?;
            let filter = UserFilter {
                query: search,
                role: role.as_deref().map(|r| r.parse::<Role>()).transpose()?,
                department,
                include_inactive,
            };
            let found = data.directory.search(&filter);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else if found.is_empty() {
                println!("no matching users");
            } else {
                for user in &found {
                    println!("{}", format_user_row(user));
                }
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Meeting Listings
// ─────────────────────────────────────────────────────────────────

fn handle_meeting(cli: &Cli, config: &EngineConfig, subcommand: MeetingSubcommand) -> Result<()> {
    match subcommand {
        MeetingSubcommand::List { user } => {
            let data = open_data(cli, config)?;
            let attendee = data.directory.require(&user)?;
            let meetings = data.meetings.for_attendee(&attendee.id);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&meetings)?);
            } else if meetings.is_empty() {
                println!("no meetings for {}", attendee.name);
            } else {
                for meeting in &meetings {
                    println!("{} [{}] {}", meeting.date, meeting.status, meeting.title);
                    for entry_type in EntryType::all() {
                        let count = meeting.entry_count(*entry_type);
                        if count > 0 {
                            println!("  {}: {}", entry_type, count);
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

fn format_user_row(user: &User) -> String {
    format!(
        "{:<6} {:<20} {:<12} {:<14} QIS {:>3}  {:<9} {}",
        user.id,
        user.name,
        user.role.to_string(),
        user.department,
        user.qis,
        PerformanceBand::for_score(user.qis).to_string(),
        user.status
    )
}

// ─────────────────────────────────────────────────────────────────
// Snapshot Data Management
// ─────────────────────────────────────────────────────────────────

fn handle_data(cli: &Cli, config: &EngineConfig, subcommand: DataSubcommand) -> Result<()> {
    match subcommand {
        DataSubcommand::Init { path, force } => {
            let path = match path {
                Some(p) => PathBuf::from(shellexpand::tilde(&p).into_owned()),
                None => snapshot_path(cli, config),
            };

            if path.exists() && !force {
                return Err(Error::Config(format!(
                    "Snapshot file already exists: {}. Use --force to overwrite.",
                    path.display()
                )));
            }

            snapshot::sample().save(&path)?;
            println!("Sample snapshot created: {}", path.display());
            Ok(())
        }
        DataSubcommand::Validate => {
            let path = snapshot_path(cli, config);
            let data = Snapshot::open(&path)?;
            println!(
                "Snapshot OK: {} user(s), {} meeting(s), {} goal(s)",
                data.directory.len(),
                data.meetings.len(),
                data.goals.len()
            );
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = EngineConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            config::init_config(path.as_deref(), force)?;
        }
        ConfigSubcommand::Validate { config } => {
            let path = config.as_deref();
            match EngineConfig::load(path) {
                Ok(_) => {
                    println!("Configuration is valid.");
                }
                Err(e) => {
                    eprint!("{}", e.format_for_terminal());
                    std::process::exit(e.exit_code());
                }
            }
        }
    }

    Ok(())
}
