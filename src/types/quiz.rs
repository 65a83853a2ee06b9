use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::git::DiffStats;

/// Version stamp written into every persisted record.
pub const SCHEMA_VERSION: u32 = 1;

/// Change category assigned to a group of files by the classifier. The
/// categories partition the file set: every changed file lands in exactly
/// one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeCategory {
    NewFeature,
    ModifiedLogic,
    Refactoring,
    Deletion,
    Configuration,
    Documentation,
    Testing,
}

impl ChangeCategory {
    /// Human-readable label used in overviews and descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeCategory::NewFeature => "new feature",
            ChangeCategory::ModifiedLogic => "modified logic",
            ChangeCategory::Refactoring => "refactoring",
            ChangeCategory::Deletion => "deletion",
            ChangeCategory::Configuration => "configuration",
            ChangeCategory::Documentation => "documentation",
            ChangeCategory::Testing => "testing",
        }
    }
}

/// A group of files sharing one change category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedChange {
    pub category: ChangeCategory,
    pub description: String,
    pub files: Vec<String>,
}

/// The complete analysis of a branch diff, consumed by the planner and the
/// question generator. Built once per run, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub overview: String,
    pub changes: Vec<CategorizedChange>,
    pub inferred_intent: String,
    pub key_files: Vec<String>,
    pub stats: DiffStats,
    pub files_changed: Vec<String>,
}

impl DiffSummary {
    /// True when any group carries logic-bearing changes (new features or
    /// modified logic). Drives the planner's low-logic scaling.
    pub fn has_logic_changes(&self) -> bool {
        self.changes.iter().any(|c| {
            matches!(
                c.category,
                ChangeCategory::NewFeature | ChangeCategory::ModifiedLogic
            )
        })
    }
}

/// The kind of comprehension question a quiz slot asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionCategory {
    Why,
    How,
    WhatIf,
    Impact,
}

impl QuestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Why => "why",
            QuestionCategory::How => "how",
            QuestionCategory::WhatIf => "what-if",
            QuestionCategory::Impact => "impact",
        }
    }
}

/// The planner's output: how many questions to ask and how they spread
/// over question categories. The distribution always sums to
/// `recommended_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPlan {
    pub recommended_count: u32,
    pub category_distribution: BTreeMap<QuestionCategory, u32>,
    pub complexity_score: u8,
}

/// One of the four answer slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

impl AnswerLabel {
    pub const ALL: [AnswerLabel; 4] = [
        AnswerLabel::A,
        AnswerLabel::B,
        AnswerLabel::C,
        AnswerLabel::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerLabel::A => "A",
            AnswerLabel::B => "B",
            AnswerLabel::C => "C",
            AnswerLabel::D => "D",
        }
    }

    /// Parses a single-letter answer, case-insensitive.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "A" => Some(AnswerLabel::A),
            "B" => Some(AnswerLabel::B),
            "C" => Some(AnswerLabel::C),
            "D" => Some(AnswerLabel::D),
            _ => None,
        }
    }
}

/// The four labeled options of a question, serialized as `{"A": .., "D": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuestionOptions {
    pub fn get(&self, label: AnswerLabel) -> &str {
        match label {
            AnswerLabel::A => &self.a,
            AnswerLabel::B => &self.b,
            AnswerLabel::C => &self.c,
            AnswerLabel::D => &self.d,
        }
    }
}

/// A question as produced by a generator, before any verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: QuestionOptions,
    pub correct_answer: AnswerLabel,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_excerpt: Option<String>,
    pub related_files: Vec<String>,
    pub category: QuestionCategory,
}

/// Terminal outcome of a question. Only the debt-bearing states
/// (`skipped`, `incorrect`, `revealed`) ever reach a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Correct,
    Incorrect,
    Revealed,
    Skipped,
}

impl QuestionStatus {
    /// A question is terminal once it holds any non-pending status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, QuestionStatus::Pending)
    }

    /// Debt-bearing statuses survive into the persisted record.
    pub fn is_debt(&self) -> bool {
        matches!(
            self,
            QuestionStatus::Incorrect | QuestionStatus::Revealed | QuestionStatus::Skipped
        )
    }
}

/// Running tally of a quiz session.
///
/// Invariant: `correct + incorrect + skipped <= total_questions`, and
/// `vibe_debt_percent` is recomputed after every transition as
/// `round(100 * (incorrect + skipped) / total_questions)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub total_questions: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub skipped: u32,
    #[serde(skip)]
    pub vibe_debt_percent: u8,
}

impl QuizStats {
    pub fn new(total_questions: u32) -> Self {
        Self {
            total_questions,
            ..Default::default()
        }
    }

    /// Recomputes the derived debt percentage. A zero-question session has
    /// zero debt.
    pub fn recompute_debt_percent(&mut self) {
        self.vibe_debt_percent = if self.total_questions == 0 {
            0
        } else {
            let debt = (self.incorrect + self.skipped) as f64;
            (100.0 * debt / self.total_questions as f64).round() as u8
        };
    }
}

/// One outstanding question inside a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeDebtQuestion {
    pub id: String,
    pub question: String,
    pub options: QuestionOptions,
    pub correct_answer: AnswerLabel,
    pub explanation: String,
    pub status: QuestionStatus,
    pub user_answer: Option<AnswerLabel>,
    pub related_files: Vec<String>,
    pub category: QuestionCategory,
}

impl VibeDebtQuestion {
    /// Re-materialize the stored question for a remediation pass.
    pub fn to_question(&self) -> QuizQuestion {
        QuizQuestion {
            id: self.id.clone(),
            question: self.question.clone(),
            options: self.options.clone(),
            correct_answer: self.correct_answer,
            explanation: self.explanation.clone(),
            code_excerpt: None,
            related_files: self.related_files.clone(),
            category: self.category,
        }
    }
}

/// Diff snapshot carried inside a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummarySnapshot {
    pub overview: String,
    pub files_changed: Vec<String>,
    pub lines_added: u32,
    pub lines_removed: u32,
}

/// The persisted per-branch artifact, one JSON file per (branch, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeDebtRecord {
    pub branch_name: String,
    pub date: String,
    pub diff_summary: DiffSummarySnapshot,
    pub vibe_debt: Vec<VibeDebtQuestion>,
    pub stats: QuizStats,
    pub schema_version: u32,
}
