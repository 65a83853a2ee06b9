pub mod git;
pub mod quiz;

pub use git::{BranchCommit, ChangeType, ChangedFile, DiffStats, GitDiff};
pub use quiz::{
    AnswerLabel, CategorizedChange, ChangeCategory, DiffSummary, DiffSummarySnapshot,
    QuestionCategory, QuestionOptions, QuestionPlan, QuestionStatus, QuizQuestion, QuizStats,
    VibeDebtQuestion, VibeDebtRecord, SCHEMA_VERSION,
};
