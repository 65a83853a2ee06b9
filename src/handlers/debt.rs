//! The `debt` subcommands: list stored records and run remediation passes
//! over them.

use std::path::Path;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::handlers::prompt::{ConsolePrompt, PromptResponse, PromptSurface};
use crate::storage::{
    apply_remediation, latest_record_for_branch, list_record_files, load_record,
    RemediationOutcome,
};
use crate::types::VibeDebtRecord;

pub fn handle_debt_list(config: &AppConfig) -> Result<(), AppError> {
    let files = list_record_files(&config.storage.dir)?;
    if files.is_empty() {
        println!("No outstanding vibe debt in {}", config.storage.dir.display());
        return Ok(());
    }

    for path in files {
        match load_record(&path) {
            Ok(record) => print_record_line(&path, &record),
            Err(e) => {
                tracing::warn!("Skipping unreadable record {}: {}", path.display(), e);
            }
        }
    }
    Ok(())
}

fn print_record_line(path: &Path, record: &VibeDebtRecord) {
    println!(
        "{} ({}): {} outstanding question(s) in {}",
        record.branch_name,
        record.date,
        record.vibe_debt.len(),
        path.display()
    );
}

pub fn handle_debt_review(config: &AppConfig, branch: &str) -> Result<(), AppError> {
    let mut console = ConsolePrompt;
    handle_debt_review_with(config, branch, &mut console)
}

/// Remediation pass: re-ask each outstanding question; a correct answer
/// resolves it. Reveals and wrong answers leave the question outstanding;
/// a skip-all response ends the pass early with everything after it left
/// as is.
pub fn handle_debt_review_with(
    config: &AppConfig,
    branch: &str,
    surface: &mut dyn PromptSurface,
) -> Result<(), AppError> {
    let Some(path) = latest_record_for_branch(&config.storage.dir, branch)? else {
        println!("No vibe-debt record found for branch '{}'.", branch);
        return Ok(());
    };
    let record = load_record(&path)?;
    println!(
        "Remediating {} question(s) recorded on {} for '{}'.",
        record.vibe_debt.len(),
        record.date,
        record.branch_name
    );

    let total = record.vibe_debt.len();
    let mut resolved_ids = Vec::new();
    for (index, debt) in record.vibe_debt.iter().enumerate() {
        let question = debt.to_question();
        match surface.present(index, total, &question)? {
            PromptResponse::Answer(label) if label == question.correct_answer => {
                resolved_ids.push(debt.id.clone());
                surface.feedback(crate::session::Verdict::Correct, &question)?;
            }
            PromptResponse::Answer(_) => {
                surface.feedback(crate::session::Verdict::Incorrect, &question)?;
            }
            PromptResponse::Reveal => {
                surface.feedback(crate::session::Verdict::Revealed, &question)?;
            }
            PromptResponse::SkipAll => break,
        }
    }

    match apply_remediation(&path, record, &resolved_ids)? {
        RemediationOutcome::Deleted => {
            println!("All debt resolved. Record deleted.");
        }
        RemediationOutcome::Rewritten { remaining } => {
            println!("{} question(s) still outstanding.", remaining);
        }
    }
    Ok(())
}
