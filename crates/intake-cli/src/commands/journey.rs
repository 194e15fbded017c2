use std::path::PathBuf;

use clap::Subcommand;
use intake_core::simulator::{JourneyReport, JourneySimulator, PersonaProfile};
use intake_core::Config;

use crate::common::store_for;

#[derive(Subcommand)]
pub enum JourneyAction {
    /// Simulate a synthetic user's full 14-day journey
    Simulate {
        /// Persona preset: balanced, healthy, problematic
        #[arg(long)]
        persona: Option<String>,
        /// Run every built-in persona
        #[arg(long)]
        all: bool,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Override the artifact data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print a stored journey report
    Show {
        /// Persona whose report to load
        persona: String,
        /// Override the artifact data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Emit the full report as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: JourneyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        JourneyAction::Simulate {
            persona,
            all,
            seed,
            data_dir,
        } => {
            let config = Config::load_or_default();
            let store = store_for(data_dir)?;
            let schedule = store.load_schedule()?.schedule;

            let personas = if all {
                PersonaProfile::presets()
            } else {
                let name = persona.unwrap_or_else(|| config.simulation.default_persona.clone());
                vec![PersonaProfile::by_name(&name)?]
            };
            let seed = seed.or(config.simulation.seed);

            for profile in personas {
                let simulator = match seed {
                    Some(seed) => {
                        JourneySimulator::with_seed(schedule.clone(), profile, seed)
                    }
                    None => JourneySimulator::new(schedule.clone(), profile),
                };
                let report = simulator.run();
                store.save_journey(&report)?;
                print_summary(&report);
            }
        }
        JourneyAction::Show {
            persona,
            data_dir,
            json,
        } => {
            let store = store_for(data_dir)?;
            let report = store.load_journey(&persona)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
        }
    }
    Ok(())
}

fn print_summary(report: &JourneyReport) {
    println!(
        "journey '{}': {} questions, {} minutes over {} days, {} expansion(s) triggered",
        report.persona,
        report.total_questions_answered,
        report.total_time_minutes,
        report.total_days,
        report.expansions_triggered_count
    );

    for day in report.daily_logs.values() {
        let expansion_note = if day.expansions_triggered.is_empty() {
            String::new()
        } else {
            let added: usize = day
                .expansions_triggered
                .iter()
                .map(|e| e.additional_questions)
                .sum();
            let modules: Vec<_> = day
                .expansions_triggered
                .iter()
                .flat_map(|e| e.modules.iter().cloned())
                .collect();
            format!(" -> expanded: +{added}q ({})", modules.join(", "))
        };
        println!(
            "day {:2} | {:20} | {:3} question(s) | ~{:2}min{}",
            day.day,
            day.title,
            day.total_questions_answered,
            day.total_time_minutes,
            expansion_note
        );
    }
}
