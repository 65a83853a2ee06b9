//! Deterministic quiz sizing: turns diff statistics and the categorized
//! change groups into a question count and a per-category distribution.

use std::collections::BTreeMap;

use crate::config::QuizConfig;
use crate::errors::SessionError;
use crate::types::{ChangeCategory, DiffSummary, QuestionCategory, QuestionPlan};

/// Scale factor applied when a diff carries no logic-bearing changes
/// (no new-feature or modified-logic files).
const LOW_LOGIC_SCALE: f64 = 0.6;

/// Base question count from total changed lines, before scaling and
/// clamping.
fn base_count(total_lines: u32) -> u32 {
    match total_lines {
        0..=50 => 2,
        51..=200 => 4 + (total_lines - 50) / 50,
        201..=500 => 6 + (total_lines - 200) / 150,
        _ => 8 + 2.min((total_lines - 500) / 250),
    }
}

fn ceil_fraction(value: u32, numerator: u32, denominator: u32) -> u32 {
    (value * numerator).div_ceil(denominator)
}

/// Compute the question plan for a summarized diff.
///
/// The category distribution always sums exactly to the recommended
/// count; a mismatch is a defect, surfaced as `DistributionMismatch`.
pub fn plan_questions(
    summary: &DiffSummary,
    complexity: u8,
    config: &QuizConfig,
) -> Result<QuestionPlan, SessionError> {
    let total_lines = summary.stats.total_lines();
    let has_logic = summary.has_logic_changes();

    let mut count = base_count(total_lines);
    if !has_logic {
        // Low-logic diffs need less comprehension checking.
        count = (count as f64 * LOW_LOGIC_SCALE).floor() as u32;
    }
    let count = count.clamp(config.min_questions, config.max_questions);

    let distribution = distribute(count, has_logic, impact_eligible(summary));

    let allocated: u32 = distribution.values().sum();
    if allocated != count {
        return Err(SessionError::DistributionMismatch {
            expected: count,
            actual: allocated,
        });
    }

    tracing::debug!(
        "Planned {} questions over {} categories for {} changed lines",
        count,
        distribution.len(),
        total_lines
    );

    Ok(QuestionPlan {
        recommended_count: count,
        category_distribution: distribution,
        complexity_score: complexity,
    })
}

fn impact_eligible(summary: &DiffSummary) -> bool {
    summary.changes.iter().any(|c| {
        matches!(
            c.category,
            ChangeCategory::Refactoring | ChangeCategory::Deletion | ChangeCategory::ModifiedLogic
        )
    })
}

/// Split the total across question categories. Every unit lands in
/// exactly one category.
fn distribute(
    total: u32,
    has_logic: bool,
    impact_eligible: bool,
) -> BTreeMap<QuestionCategory, u32> {
    let mut distribution = BTreeMap::new();

    let why = ceil_fraction(total, 1, 4);
    let mut remainder = total - why;
    distribution.insert(QuestionCategory::Why, why);

    let mut how = 0;
    if has_logic {
        how = ceil_fraction(remainder, 2, 5);
        remainder -= how;
        let what_if = ceil_fraction(remainder, 1, 2);
        remainder -= what_if;
        if what_if > 0 {
            distribution.insert(QuestionCategory::WhatIf, what_if);
        }
    }

    if impact_eligible {
        if remainder > 0 {
            distribution.insert(QuestionCategory::Impact, remainder);
        }
    } else {
        how += remainder;
    }
    if how > 0 {
        distribution.insert(QuestionCategory::How, how);
    }

    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategorizedChange, DiffStats};

    fn summary_with(categories: &[ChangeCategory], lines_added: u32, lines_removed: u32) -> DiffSummary {
        let changes: Vec<CategorizedChange> = categories
            .iter()
            .map(|&category| CategorizedChange {
                category,
                description: String::new(),
                files: vec!["some/file".to_string()],
            })
            .collect();
        DiffSummary {
            overview: String::new(),
            inferred_intent: String::new(),
            key_files: Vec::new(),
            stats: DiffStats {
                files_changed: changes.len(),
                lines_added,
                lines_removed,
                net_change: lines_added as i64 - lines_removed as i64,
            },
            files_changed: Vec::new(),
            changes,
        }
    }

    fn bounds(min: u32, max: u32) -> QuizConfig {
        QuizConfig {
            min_questions: min,
            max_questions: max,
        }
    }

    #[test]
    fn test_base_count_table() {
        assert_eq!(base_count(0), 2);
        assert_eq!(base_count(50), 2);
        assert_eq!(base_count(51), 4);
        assert_eq!(base_count(120), 5);
        assert_eq!(base_count(200), 7);
        assert_eq!(base_count(201), 6);
        assert_eq!(base_count(500), 8);
        assert_eq!(base_count(650), 8);
        assert_eq!(base_count(1200), 10);
    }

    #[test]
    fn test_empty_diff_yields_minimum_never_zero() {
        let summary = summary_with(&[], 0, 0);
        let plan = plan_questions(&summary, 0, &bounds(2, 10)).unwrap();
        assert_eq!(plan.recommended_count, 2);
    }

    #[test]
    fn test_count_scaling_scenarios() {
        let logic = [ChangeCategory::ModifiedLogic];
        let plan = plan_questions(&summary_with(&logic, 100, 20), 40, &bounds(2, 10)).unwrap();
        assert_eq!(plan.recommended_count, 5);

        let plan = plan_questions(&summary_with(&logic, 500, 150), 70, &bounds(2, 10)).unwrap();
        assert_eq!(plan.recommended_count, 8);
    }

    #[test]
    fn test_low_logic_diff_scales_down() {
        // 300 lines of config + docs only: base 6, scaled to floor(3.6) = 3.
        let summary = summary_with(
            &[ChangeCategory::Configuration, ChangeCategory::Documentation],
            200,
            100,
        );
        let plan = plan_questions(&summary, 30, &bounds(2, 10)).unwrap();
        assert_eq!(plan.recommended_count, 3);
        // And nothing lands in how/what-if beyond the why share.
        assert_eq!(
            plan.category_distribution.get(&QuestionCategory::Why),
            Some(&1)
        );
        assert_eq!(
            plan.category_distribution.get(&QuestionCategory::How),
            Some(&2)
        );
        assert!(!plan
            .category_distribution
            .contains_key(&QuestionCategory::Impact));
    }

    #[test]
    fn test_distribution_sums_to_count_across_shapes() {
        let shapes: [&[ChangeCategory]; 5] = [
            &[ChangeCategory::NewFeature],
            &[ChangeCategory::ModifiedLogic, ChangeCategory::Refactoring],
            &[ChangeCategory::Configuration],
            &[ChangeCategory::Deletion, ChangeCategory::Documentation],
            &[
                ChangeCategory::NewFeature,
                ChangeCategory::Deletion,
                ChangeCategory::Testing,
            ],
        ];
        for categories in shapes {
            for lines in [0, 40, 120, 300, 800, 5000] {
                let summary = summary_with(categories, lines, lines / 2);
                let plan = plan_questions(&summary, 50, &bounds(2, 10)).unwrap();
                let sum: u32 = plan.category_distribution.values().sum();
                assert_eq!(
                    sum, plan.recommended_count,
                    "categories {:?} at {} lines",
                    categories, lines
                );
            }
        }
    }

    #[test]
    fn test_why_always_gets_a_quarter() {
        let summary = summary_with(&[ChangeCategory::NewFeature], 400, 100);
        let plan = plan_questions(&summary, 60, &bounds(2, 10)).unwrap();
        let total = plan.recommended_count;
        let why = plan.category_distribution[&QuestionCategory::Why];
        assert_eq!(why, total.div_ceil(4));
    }

    #[test]
    fn test_impact_requires_eligible_categories() {
        // New-feature only: leftover folds into how, never impact.
        let summary = summary_with(&[ChangeCategory::NewFeature], 300, 100);
        let plan = plan_questions(&summary, 60, &bounds(2, 10)).unwrap();
        assert!(!plan
            .category_distribution
            .contains_key(&QuestionCategory::Impact));

        // Modified logic makes the leftover an impact share.
        let summary = summary_with(&[ChangeCategory::ModifiedLogic], 300, 100);
        let plan = plan_questions(&summary, 60, &bounds(2, 10)).unwrap();
        assert!(plan
            .category_distribution
            .contains_key(&QuestionCategory::Impact));
    }

    #[test]
    fn test_clamping_to_bounds() {
        let summary = summary_with(&[ChangeCategory::ModifiedLogic], 4000, 2000);
        let plan = plan_questions(&summary, 90, &bounds(2, 6)).unwrap();
        assert_eq!(plan.recommended_count, 6);

        let plan = plan_questions(&summary, 90, &bounds(12, 15)).unwrap();
        assert_eq!(plan.recommended_count, 12);
    }
}
