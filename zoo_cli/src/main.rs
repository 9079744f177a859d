use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use zoo_core::csv_io::write_csv;
use zoo_core::scenario::Replay;
use zoo_core::*;

#[derive(Parser)]
#[command(name = "zoo")]
#[command(about = "Zoo record ledger and daily schedule reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a staff member's daily plan
    Schedule {
        /// Scenario file (JSON)
        file: PathBuf,

        /// Scenario key of the staff member
        #[arg(long)]
        staff: String,
    },

    /// Print a report after replaying a scenario
    Report {
        /// Scenario file (JSON)
        file: PathBuf,

        #[arg(value_enum)]
        kind: ReportKind,

        /// Limit the medical report to one animal (scenario key)
        #[arg(long)]
        animal: Option<String>,
    },

    /// Write a combined ledger as CSV to stdout
    Export {
        /// Scenario file (JSON)
        file: PathBuf,

        #[arg(value_enum)]
        kind: ExportKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    Overview,
    Species,
    Display,
    Enclosures,
    Medical,
    Schedules,
    StaffActivity,
    Maintenance,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Medical,
    Schedules,
    StaffActivity,
    Maintenance,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.default_level.as_str()
    };
    zoo_core::logging::init_with_level(level);

    match cli.command {
        Commands::Schedule { file, staff } => cmd_schedule(&file, &staff, &config),
        Commands::Report { file, kind, animal } => cmd_report(&file, kind, animal, &config),
        Commands::Export { file, kind } => cmd_export(&file, kind, &config),
    }
}

fn replay(file: &Path, config: &Config) -> Result<Replay> {
    let scenario = Scenario::load(file)?;
    let replay = scenario.replay(config.schedule.clone())?;
    if replay.skipped > 0 {
        eprintln!("{} event(s) were skipped; see the log for details.", replay.skipped);
    }
    Ok(replay)
}

fn cmd_schedule(file: &Path, staff: &str, config: &Config) -> Result<()> {
    let replay = replay(file, config)?;
    let plan = replay.zoo.daily_plan(replay.id_of(staff)?)?;
    print!("{}", plan);
    Ok(())
}

fn cmd_report(file: &Path, kind: ReportKind, animal: Option<String>, config: &Config) -> Result<()> {
    let replay = replay(file, config)?;
    let zoo = &replay.zoo;

    let output = match kind {
        ReportKind::Overview => zoo.to_string(),
        ReportKind::Species => zoo.species_report(),
        ReportKind::Display => zoo.display_report(),
        ReportKind::Enclosures => zoo.enclosure_status_report(),
        ReportKind::Medical => match animal {
            Some(key) => zoo.animal_medical_history(replay.id_of(&key)?)?.render(),
            None => zoo.medical_history().render(),
        },
        ReportKind::Schedules => zoo.staff_schedules()?.render(),
        ReportKind::StaffActivity => zoo.staff_activity().render(),
        ReportKind::Maintenance => zoo.enclosure_maintenance().render(),
    };
    print!("{}", output);
    Ok(())
}

fn cmd_export(file: &Path, kind: ExportKind, config: &Config) -> Result<()> {
    let replay = replay(file, config)?;
    let zoo = &replay.zoo;
    let stdout = io::stdout().lock();

    let rows = match kind {
        ExportKind::Medical => write_csv(&zoo.medical_history(), stdout)?,
        ExportKind::Schedules => write_csv(&zoo.staff_schedules()?, stdout)?,
        ExportKind::StaffActivity => write_csv(&zoo.staff_activity(), stdout)?,
        ExportKind::Maintenance => write_csv(&zoo.enclosure_maintenance(), stdout)?,
    };
    tracing::info!("Exported {} rows", rows);
    Ok(())
}
