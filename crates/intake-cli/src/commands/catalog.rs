use std::path::PathBuf;

use clap::Subcommand;
use intake_core::ingest::parse_sheets;
use intake_core::Diagnostics;

use crate::common::{report_diagnostics, store_for};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Parse extracted sheet rows into question, rule, and module artifacts
    Parse {
        /// Override the artifact data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show headline counts from the last parse
    Summary {
        /// Override the artifact data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CatalogAction::Parse { data_dir } => {
            let store = store_for(data_dir)?;
            let sheets = store.load_sheets()?;

            let mut diagnostics = Diagnostics::new();
            let parsed = parse_sheets(&sheets, &mut diagnostics);
            let summary = parsed.summary();

            store.save_questions(&parsed.questions)?;
            store.save_rules(&parsed.rules)?;
            store.save_modules(&parsed.modules)?;
            store.save_summary(&summary)?;
            store.save_diagnostics(&diagnostics)?;

            println!(
                "parsed {} questions ({} core, {} expansion) across {} module(s), {} rule(s)",
                summary.total_questions,
                summary.core_questions,
                summary.expansion_questions,
                summary.modules.len(),
                summary.conditional_rules
            );
            report_diagnostics(&diagnostics);
        }
        CatalogAction::Summary { data_dir } => {
            let store = store_for(data_dir)?;
            let summary = store.load_summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
