//! Question generation seam. The pipeline only depends on the
//! `QuestionGenerator` trait; content quality is the generator's problem.
//! The built-in `TemplateGenerator` is deterministic and offline, which
//! keeps the whole pipeline runnable (and testable) without any external
//! collaborator.

use std::collections::BTreeMap;

use crate::errors::{AppError, SessionError};
use crate::types::{
    AnswerLabel, DiffSummary, QuestionCategory, QuestionOptions, QuestionPlan, QuizQuestion,
};

/// Produces one question per planned slot. Implementations must match the
/// plan's counts and categories; the pipeline verifies that, nothing more.
pub trait QuestionGenerator {
    fn generate(
        &self,
        plan: &QuestionPlan,
        summary: &DiffSummary,
    ) -> Result<Vec<QuizQuestion>, AppError>;
}

/// Check that generated questions agree with the plan: same total, same
/// per-category counts. A disagreement is a defect, not a recoverable
/// condition.
pub fn validate_against_plan(
    questions: &[QuizQuestion],
    plan: &QuestionPlan,
) -> Result<(), AppError> {
    if questions.len() as u32 != plan.recommended_count {
        return Err(SessionError::DistributionMismatch {
            expected: plan.recommended_count,
            actual: questions.len() as u32,
        }
        .into());
    }

    let mut actual: BTreeMap<QuestionCategory, u32> = BTreeMap::new();
    for q in questions {
        *actual.entry(q.category).or_default() += 1;
    }
    for (&category, &expected) in &plan.category_distribution {
        let got = actual.get(&category).copied().unwrap_or(0);
        if got != expected {
            return Err(SessionError::PlanMismatch {
                category: category.as_str().to_string(),
                expected,
                actual: got,
            }
            .into());
        }
    }
    Ok(())
}

/// Deterministic template-based generator: same plan and summary in, same
/// questions out.
pub struct TemplateGenerator;

impl TemplateGenerator {
    fn question_text(category: QuestionCategory, subject: &str, summary: &DiffSummary) -> String {
        match category {
            QuestionCategory::Why => format!(
                "Why was '{}' changed on a branch that {}?",
                subject, summary.inferred_intent
            ),
            QuestionCategory::How => {
                format!("How does the change to '{}' achieve its effect?", subject)
            }
            QuestionCategory::WhatIf => format!(
                "What would happen if the change to '{}' were reverted?",
                subject
            ),
            QuestionCategory::Impact => format!(
                "Which parts of the system does the change to '{}' affect?",
                subject
            ),
        }
    }
}

impl QuestionGenerator for TemplateGenerator {
    fn generate(
        &self,
        plan: &QuestionPlan,
        summary: &DiffSummary,
    ) -> Result<Vec<QuizQuestion>, AppError> {
        let subjects: Vec<&str> = if summary.key_files.is_empty() {
            vec!["the branch"]
        } else {
            summary.key_files.iter().map(String::as_str).collect()
        };

        let mut questions = Vec::with_capacity(plan.recommended_count as usize);
        let mut n = 0usize;
        for (&category, &count) in &plan.category_distribution {
            for _ in 0..count {
                let subject = subjects[n % subjects.len()];
                let correct = AnswerLabel::ALL[n % AnswerLabel::ALL.len()];
                let options = QuestionOptions {
                    a: "It adjusts the control flow of the touched code".to_string(),
                    b: "It changes what data is persisted or returned".to_string(),
                    c: "It only affects build or tooling behavior".to_string(),
                    d: "It has no observable runtime effect".to_string(),
                };
                n += 1;
                questions.push(QuizQuestion {
                    id: format!("q{}", n),
                    question: Self::question_text(category, subject, summary),
                    correct_answer: correct,
                    explanation: format!(
                        "Review the change to '{}': {}",
                        subject, summary.overview
                    ),
                    code_excerpt: None,
                    related_files: vec![subject.to_string()],
                    options,
                    category,
                });
            }
        }
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiffStats;

    fn summary() -> DiffSummary {
        DiffSummary {
            overview: "2 files changed (+30/-5) across 1 change group".to_string(),
            changes: Vec::new(),
            inferred_intent: "adds a feature".to_string(),
            key_files: vec!["src/engine.rs".to_string(), "src/lib.rs".to_string()],
            stats: DiffStats::default(),
            files_changed: Vec::new(),
        }
    }

    fn plan(pairs: &[(QuestionCategory, u32)]) -> QuestionPlan {
        QuestionPlan {
            recommended_count: pairs.iter().map(|(_, c)| c).sum(),
            category_distribution: pairs.iter().copied().collect(),
            complexity_score: 42,
        }
    }

    #[test]
    fn test_generated_questions_match_plan() {
        let plan = plan(&[
            (QuestionCategory::Why, 2),
            (QuestionCategory::How, 2),
            (QuestionCategory::Impact, 1),
        ]);
        let questions = TemplateGenerator.generate(&plan, &summary()).unwrap();
        assert_eq!(questions.len(), 5);
        validate_against_plan(&questions, &plan).unwrap();
    }

    #[test]
    fn test_generation_is_deterministic() {
        let plan = plan(&[(QuestionCategory::Why, 1), (QuestionCategory::WhatIf, 2)]);
        let a = TemplateGenerator.generate(&plan, &summary()).unwrap();
        let b = TemplateGenerator.generate(&plan, &summary()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let plan = plan(&[(QuestionCategory::Why, 2)]);
        let mut questions = TemplateGenerator.generate(&plan, &summary()).unwrap();
        questions.pop();
        assert!(validate_against_plan(&questions, &plan).is_err());
    }

    #[test]
    fn test_validate_rejects_category_swap() {
        let plan = plan(&[(QuestionCategory::Why, 1), (QuestionCategory::How, 1)]);
        let mut questions = TemplateGenerator.generate(&plan, &summary()).unwrap();
        questions[0].category = QuestionCategory::How;
        assert!(validate_against_plan(&questions, &plan).is_err());
    }
}
