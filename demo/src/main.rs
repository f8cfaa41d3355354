//! labsight: Clinical Value Classifier demo CLI
//!
//! Classifies single lab values against the canonical rule table (or one
//! loaded with `--rules`) and renders the reference dashboard's fixture
//! patients through it.
//!
//! Usage:
//!   cargo run -p demo -- classify AFP 401
//!   cargo run -p demo -- liver 101 40
//!   cargo run -p demo -- days-since 2024-07-10 --now 2024-12-15
//!   cargo run -p demo -- patients
//!   cargo run -p demo -- patient patient-2 --json
//!   cargo run -p demo -- dashboard --rules my-rules.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use labsight_contracts::{error::LabsightResult, tier::ClassificationResult};
use labsight_core::{
    elapsed::{days_since_str, parse_instant},
    traits::{Classifier, Clock, FixedClock, SystemClock},
};
use labsight_ref_dashboard::{
    dashboard_summary, patient_card, patient_detail, LabHistoryRow, PatientCard, PatientDetail,
    PatientRegistry,
};
use labsight_rules::TomlRuleTable;

// ── CLI definition ────────────────────────────────────────────────────────────

/// labsight: canonical lab value classification.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "labsight clinical value classifier demo",
    long_about = "Classifies lab values against one canonical threshold table and\n\
                  renders the reference dashboard's fixture patients through it."
)]
struct Cli {
    /// Load thresholds from this TOML file instead of the canonical set.
    #[arg(long, global = true, value_name = "PATH")]
    rules: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD or RFC 3339) as "now".
    #[arg(long, global = true, value_name = "DATE")]
    now: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one raw value for an analyte.
    Classify { analyte: String, value: String },
    /// Joint ALT/AST liver function status.
    Liver { alt: String, ast: String },
    /// Whole days between DATE and now.
    DaysSince { date: String },
    /// List every fixture patient as a card.
    Patients,
    /// Show one patient's card, lab history and clinical history.
    Patient { id: String },
    /// Dashboard summary: patients needing attention, appointments.
    Dashboard,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("labsight error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> LabsightResult<()> {
    let table = match &cli.rules {
        Some(path) => TomlRuleTable::from_file(path)?,
        None => TomlRuleTable::canonical()?,
    };
    match &cli.command {
        Command::Classify { analyte, value } => {
            let result = table.classify(analyte, value);
            emit(cli.json, &result, || format!("{} {}: {}", analyte, value, describe(&result)));
        }

        Command::Liver { alt, ast } => {
            let result = table.classify_liver_function(alt, ast);
            emit(cli.json, &result, || {
                format!("ALT {} / AST {}: {}", alt, ast, describe(&result))
            });
        }

        Command::DaysSince { date } => {
            let clock = clock(cli.now.as_deref())?;
            let days = days_since_str(date, clock.as_ref());
            emit(cli.json, &days, || match days {
                Some(d) => format!("{}: {} day(s) ago", date, d),
                None => format!("{}: unreadable date", date),
            });
        }

        Command::Patients => {
            let clock = clock(cli.now.as_deref())?;
            let registry = PatientRegistry::embedded()?;
            let cards: Vec<PatientCard> = registry
                .patients()
                .map(|record| patient_card(record, &table, clock.as_ref()))
                .collect();
            emit(cli.json, &cards, || {
                cards.iter().map(render_card).collect::<Vec<_>>().join("\n")
            });
        }

        Command::Patient { id } => {
            let clock = clock(cli.now.as_deref())?;
            let registry = PatientRegistry::embedded()?;
            let record = registry.get(id)?;
            let detail = patient_detail(record, &table, clock.as_ref());
            emit(cli.json, &detail, || render_detail(&detail));
        }

        Command::Dashboard => {
            let clock = clock(cli.now.as_deref())?;
            let registry = PatientRegistry::embedded()?;
            let summary = dashboard_summary(&registry, &table, clock.as_ref());
            emit(cli.json, &summary, || {
                let mut out = format!("Patients: {}\n", summary.total_patients);
                out.push_str(&format!(
                    "Requiring attention: {}\n",
                    if summary.attention.is_empty() {
                        "none".to_string()
                    } else {
                        summary.attention.join(", ")
                    }
                ));
                out.push_str("Upcoming appointments:\n");
                for a in &summary.appointments {
                    out.push_str(&format!(
                        "  {} {}  {:<16} {:<13} {} ({})\n",
                        a.date, a.time, a.patient_name, a.kind, a.status, a.urgency
                    ));
                }
                out
            });
        }
    }

    Ok(())
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// The clock for commands that measure elapsed time.  A bad `--now` only
/// fails the commands that read it.
fn clock(now: Option<&str>) -> LabsightResult<Box<dyn Clock>> {
    let clock: Box<dyn Clock> = match now {
        Some(now) => Box::new(FixedClock(parse_instant(now)?)),
        None => Box::new(SystemClock),
    };
    Ok(clock)
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) {
    if !json {
        println!("{}", text());
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!(error = %e, "failed to render JSON"),
    }
}

fn describe(result: &ClassificationResult) -> String {
    let marker = if result.requires_attention { "  [ATTENTION]" } else { "" };
    format!("{} ({}){}", result.tier, result.label, marker)
}

fn render_card(card: &PatientCard) -> String {
    let mut out = format!(
        "{}  {} ({}y, {})\n  Treatment: {}{}\n",
        card.id,
        card.name,
        card.age,
        card.gender,
        card.treatment,
        card.treatment_year.map(|y| format!(" [{}]", y)).unwrap_or_default()
    );
    if let (Some(value), Some(afp)) = (&card.afp_value, &card.afp) {
        out.push_str(&format!("  AFP {}: {}\n", value, describe(afp)));
    }
    if let Some(liver) = &card.liver_function {
        out.push_str(&format!("  ALT/AST: {}\n", describe(liver)));
    }
    if !card.allergies.is_empty() {
        out.push_str(&format!("  Allergies: {}\n", card.allergies.join(", ")));
    }
    if let Some(note) = &card.latest_follow_up {
        match card.days_since_follow_up {
            Some(days) => out.push_str(&format!("  Last follow-up ({} day(s) ago): {}\n", days, note)),
            None => out.push_str(&format!("  Last follow-up: {}\n", note)),
        }
    }
    out
}

fn render_detail(detail: &PatientDetail) -> String {
    let mut out = render_card(&detail.card);
    if let Some(blood_type) = &detail.blood_type {
        out.push_str(&format!("  Blood type: {}\n", blood_type));
    }
    out.push_str(&format!(
        "  Smoking: {}  Alcohol: {}\n",
        detail.smoking_alcohol.smoking, detail.smoking_alcohol.alcohol
    ));
    if let Some(family) = &detail.family_history {
        out.push_str(&format!("  Family history: {}\n", family));
    }

    out.push_str("  Lab history:\n");
    for row in &detail.labs {
        out.push_str(&render_lab_row(row));
    }

    if !detail.procedures.is_empty() {
        out.push_str("  Procedures:\n");
        for p in &detail.procedures {
            out.push_str(&format!(
                "    {}  {:<22} {:<12} {:<10} {}\n",
                p.date,
                p.title,
                p.kind,
                p.status,
                p.outcome.as_deref().unwrap_or("-")
            ));
        }
    }
    if !detail.imaging.is_empty() {
        out.push_str("  Imaging:\n");
        for study in &detail.imaging {
            out.push_str(&format!("    {}  {}: {}\n", study.date, study.kind, study.finding));
        }
    }
    if !detail.medical_history.is_empty() {
        out.push_str("  Medical history:\n");
        for entry in &detail.medical_history {
            out.push_str(&format!("    {}  {}\n", entry.date, entry.condition));
        }
    }
    if !detail.surgical_history.is_empty() {
        out.push_str("  Surgical history:\n");
        for entry in &detail.surgical_history {
            out.push_str(&format!("    {}  {}\n", entry.date, entry.procedure));
        }
    }
    out
}

fn render_lab_row(row: &LabHistoryRow) -> String {
    let mut out = format!("    {}  worst: {}\n", row.date, row.panel.worst_tier);
    for report in &row.panel.observations {
        out.push_str(&format!(
            "      {:<10} {:>10}  {}\n",
            report.observation.analyte,
            report.observation.value,
            describe(&report.result)
        ));
    }
    out
}
