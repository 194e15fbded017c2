use std::path::PathBuf;

use clap::Subcommand;
use intake_core::{
    DayScheduler, Diagnostics, ExpansionResolver, QuestionCatalog, RuleTable, ScheduleReport,
};

use crate::common::{report_diagnostics, store_for};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Build and annotate the 14-day schedule from stored artifacts
    Build {
        /// Override the artifact data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the stored schedule
    Show {
        /// Override the artifact data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Emit the full report as JSON instead of the daily breakdown
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Build { data_dir } => {
            let store = store_for(data_dir)?;
            let questions = store.load_questions()?;
            let rules = store.load_rules()?;
            // Module metadata is optional; the question list alone is enough.
            let modules = store.load_modules().unwrap_or_default();

            let catalog = QuestionCatalog::from_questions(questions).with_module_metadata(modules);
            catalog.validate()?;

            let mut diagnostics = Diagnostics::new();
            let table = RuleTable::from_rules(&rules, &mut diagnostics);
            let mut schedule = DayScheduler::new().build(catalog.core(), &mut diagnostics);
            ExpansionResolver::new().annotate(&mut schedule, &table, &catalog, &mut diagnostics);

            let report = ScheduleReport::from_schedule(schedule);
            store.save_schedule(&report)?;
            store.save_diagnostics(&diagnostics)?;

            print_breakdown(&report);
            report_diagnostics(&diagnostics);
        }
        ScheduleAction::Show { data_dir, json } => {
            let store = store_for(data_dir)?;
            let report = store.load_schedule()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_breakdown(&report);
            }
        }
    }
    Ok(())
}

fn print_breakdown(report: &ScheduleReport) {
    println!(
        "{} core questions over {} days ({:.1} per day), {} gateway day(s)",
        report.total_core_questions,
        report.total_days,
        report.average_questions_per_day,
        report.days_with_potential_expansions
    );

    for day in report.schedule.values() {
        let gateway = if day.can_trigger_expansion { " *" } else { "" };
        println!(
            "day {:2}: {:2} question(s) (~{}min) - {}{}",
            day.day,
            day.question_count(),
            day.estimated_minutes,
            day.title,
            gateway
        );
        for expansion in &day.possible_expansions {
            println!(
                "        may expand: +{} question(s) (+{}min)",
                expansion.total_additional_questions, expansion.estimated_additional_minutes
            );
        }
    }
}
