//! Per-branch vibe-debt record files: one JSON document per
//! (sanitized branch name, date), holding only the questions that were not
//! answered correctly. Writes go through a temp file and a rename so a
//! failed write never leaves a half-written record behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::errors::{AppError, StorageError};
use crate::session::QuizSession;
use crate::types::{
    DiffSummary, DiffSummarySnapshot, QuizStats, VibeDebtQuestion, VibeDebtRecord, SCHEMA_VERSION,
};

/// Replace path-unsafe characters in a branch name so it can serve as a
/// file-name component.
pub fn sanitize_branch_name(branch: &str) -> String {
    branch
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' | '\t' => '-',
            other => other,
        })
        .collect()
}

/// `<dir>/<sanitized-branch>_<YYYY-MM-DD>.json`
pub fn record_file_path(dir: &Path, branch: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!(
        "{}_{}.json",
        sanitize_branch_name(branch),
        date.format("%Y-%m-%d")
    ))
}

/// Build a persistable record from a finished (or terminated) session.
///
/// Only debt-bearing questions (incorrect, revealed, skipped) are kept;
/// a session with no debt yields `None` and nothing should be written.
pub fn build_record(
    branch: &str,
    date: NaiveDate,
    summary: &DiffSummary,
    session: &QuizSession,
) -> Option<VibeDebtRecord> {
    let vibe_debt: Vec<VibeDebtQuestion> = session
        .questions()
        .iter()
        .zip(session.outcomes())
        .filter(|(_, outcome)| outcome.status.is_debt())
        .map(|(q, outcome)| VibeDebtQuestion {
            id: q.id.clone(),
            question: q.question.clone(),
            options: q.options.clone(),
            correct_answer: q.correct_answer,
            explanation: q.explanation.clone(),
            status: outcome.status,
            user_answer: outcome.user_answer,
            related_files: q.related_files.clone(),
            category: q.category,
        })
        .collect();

    if vibe_debt.is_empty() {
        return None;
    }

    Some(VibeDebtRecord {
        branch_name: branch.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        diff_summary: DiffSummarySnapshot {
            overview: summary.overview.clone(),
            files_changed: summary.files_changed.clone(),
            lines_added: summary.stats.lines_added,
            lines_removed: summary.stats.lines_removed,
        },
        vibe_debt,
        stats: *session.stats(),
        schema_version: SCHEMA_VERSION,
    })
}

/// Write a record to its per-branch file, creating the directory if
/// needed. Returns the path written.
pub fn save_record(dir: &Path, record: &VibeDebtRecord) -> Result<PathBuf, AppError> {
    let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
        .map_err(|e| AppError::Generic(format!("Record carries invalid date: {}", e)))?;
    let path = record_file_path(dir, &record.branch_name, date);
    write_record_to(&path, record)?;
    Ok(path)
}

fn write_record_to(path: &Path, record: &VibeDebtRecord) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDir {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(record).map_err(|e| StorageError::Serialize {
        path: path.display().to_string(),
        source: e,
    })?;

    // Write fully or not at all: temp file in the same directory, then
    // rename over the target.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json.as_bytes()).map_err(|e| StorageError::WriteRecord {
        path: tmp_path.display().to_string(),
        source: e,
    })?;
    fs::rename(&tmp_path, path).map_err(|e| StorageError::WriteRecord {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!("Wrote vibe-debt record to {}", path.display());
    Ok(())
}

/// Read one record file.
pub fn load_record(path: &Path) -> Result<VibeDebtRecord, AppError> {
    let content = fs::read_to_string(path).map_err(|e| StorageError::ReadRecord {
        path: path.display().to_string(),
        source: e,
    })?;
    let record =
        serde_json::from_str::<VibeDebtRecord>(&content).map_err(|e| StorageError::Deserialize {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(record)
}

/// All record files in the storage directory, newest file name last. A
/// missing directory is simply an empty list.
pub fn list_record_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| StorageError::ReadRecord {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| StorageError::ReadRecord {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The newest record file for a branch, by the date suffix in the file
/// name.
pub fn latest_record_for_branch(dir: &Path, branch: &str) -> Result<Option<PathBuf>, AppError> {
    let prefix = format!("{}_", sanitize_branch_name(branch));
    let mut matching: Vec<PathBuf> = list_record_files(dir)?
        .into_iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();
    matching.sort();
    Ok(matching.pop())
}

/// Outcome of a remediation pass over a stored record.
#[derive(Debug, PartialEq, Eq)]
pub enum RemediationOutcome {
    /// Every outstanding question was resolved; the file is gone.
    Deleted,
    /// Some questions remain; the file now contains exactly those.
    Rewritten { remaining: usize },
}

/// Apply a remediation result to a stored record: drop the questions whose
/// ids were answered correctly, then either delete the file (nothing
/// outstanding) or rewrite it with the remaining subset and stats
/// recomputed for that subset.
pub fn apply_remediation(
    path: &Path,
    mut record: VibeDebtRecord,
    resolved_ids: &[String],
) -> Result<RemediationOutcome, AppError> {
    record
        .vibe_debt
        .retain(|q| !resolved_ids.contains(&q.id));

    if record.vibe_debt.is_empty() {
        fs::remove_file(path).map_err(|e| StorageError::DeleteRecord {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::info!("All debt resolved; deleted {}", path.display());
        return Ok(RemediationOutcome::Deleted);
    }

    record.stats = stats_for_subset(&record.vibe_debt);
    write_record_to(path, &record)?;
    Ok(RemediationOutcome::Rewritten {
        remaining: record.vibe_debt.len(),
    })
}

fn stats_for_subset(debt: &[VibeDebtQuestion]) -> QuizStats {
    let mut stats = QuizStats::new(debt.len() as u32);
    for q in debt {
        match q.status {
            crate::types::QuestionStatus::Skipped => stats.skipped += 1,
            // Incorrect and revealed both count as incorrect.
            _ => stats.incorrect += 1,
        }
    }
    stats.recompute_debt_percent();
    stats
}
