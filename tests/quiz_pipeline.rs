//! End-to-end pipeline tests: synthetic diff text in, persisted record
//! out, then a remediation pass over the stored file. No git repository
//! and no interactive terminal involved; the prompt surface is scripted.

use std::collections::VecDeque;

use chrono::NaiveDate;

use vibedebt::analysis::{complexity_score, summarize_diff, ScoringWeights};
use vibedebt::config::{AppConfig, QuizConfig, StorageConfig};
use vibedebt::errors::AppError;
use vibedebt::generator::{validate_against_plan, QuestionGenerator, TemplateGenerator};
use vibedebt::git_module::parser::parse_diff_inputs;
use vibedebt::git_module::DiffInputs;
use vibedebt::handlers::debt::handle_debt_review_with;
use vibedebt::handlers::prompt::{PromptResponse, PromptSurface};
use vibedebt::handlers::quiz::run_quiz_loop;
use vibedebt::planner::plan_questions;
use vibedebt::session::SessionState;
use vibedebt::storage::{build_record, latest_record_for_branch, load_record, save_record};
use vibedebt::types::{AnswerLabel, ChangeCategory, QuizQuestion};

/// One scripted move per presented question.
#[derive(Debug, Clone, Copy)]
enum Move {
    Correct,
    Wrong,
    Reveal,
    SkipAll,
}

struct ScriptedPrompt {
    moves: VecDeque<Move>,
}

impl ScriptedPrompt {
    fn new(moves: &[Move]) -> Self {
        Self {
            moves: moves.iter().copied().collect(),
        }
    }
}

impl PromptSurface for ScriptedPrompt {
    fn present(
        &mut self,
        _index: usize,
        _total: usize,
        question: &QuizQuestion,
    ) -> Result<PromptResponse, AppError> {
        let response = match self.moves.pop_front().unwrap_or(Move::SkipAll) {
            Move::Correct => PromptResponse::Answer(question.correct_answer),
            Move::Wrong => {
                let wrong = AnswerLabel::ALL
                    .into_iter()
                    .find(|&l| l != question.correct_answer)
                    .unwrap();
                PromptResponse::Answer(wrong)
            }
            Move::Reveal => PromptResponse::Reveal,
            Move::SkipAll => PromptResponse::SkipAll,
        };
        Ok(response)
    }
}

fn sample_inputs() -> DiffInputs {
    DiffInputs {
        numstat: "\
120\t30\tsrc/engine.rs
40\t35\tsrc/session.rs
10\t2\tREADME.md
5\t1\tCargo.toml
-\t-\tassets/logo.png
0\t80\tsrc/legacy.rs
25\t0\ttests/engine_test.rs
"
        .to_string(),
        name_status: "\
M\tsrc/engine.rs
M\tsrc/session.rs
M\tREADME.md
M\tCargo.toml
A\tassets/logo.png
D\tsrc/legacy.rs
A\ttests/engine_test.rs
"
        .to_string(),
        commit_log: "abc1234 Add engine\ndef5678 Tighten session handling\n".to_string(),
        raw_diff: String::new(),
    }
}

fn bounds() -> QuizConfig {
    QuizConfig {
        min_questions: 2,
        max_questions: 10,
    }
}

#[test]
fn test_extract_classify_plan_on_synthetic_diff() {
    let diff = parse_diff_inputs(&sample_inputs());
    assert_eq!(diff.files.len(), 7);
    assert_eq!(diff.commits.len(), 2);
    assert_eq!(diff.stats.lines_added, 200);
    assert_eq!(diff.stats.lines_removed, 148);

    let summary = summarize_diff("feat/engine", &diff);
    assert_eq!(summary.inferred_intent, "adds a feature");
    assert_eq!(summary.files_changed.len(), 7);

    // Partition invariant over the real pipeline output.
    let mut partitioned: Vec<&str> = summary
        .changes
        .iter()
        .flat_map(|c| c.files.iter().map(String::as_str))
        .collect();
    partitioned.sort_unstable();
    let mut expected: Vec<&str> = summary.files_changed.iter().map(String::as_str).collect();
    expected.sort_unstable();
    assert_eq!(partitioned, expected);

    // 150 touched lines in engine.rs is a logic change; legacy.rs is a
    // deletion; the binary asset is a new feature.
    let category_of = |path: &str| {
        summary
            .changes
            .iter()
            .find(|c| c.files.iter().any(|f| f == path))
            .map(|c| c.category)
            .unwrap()
    };
    assert_eq!(category_of("src/engine.rs"), ChangeCategory::ModifiedLogic);
    assert_eq!(category_of("src/legacy.rs"), ChangeCategory::Deletion);
    assert_eq!(category_of("assets/logo.png"), ChangeCategory::NewFeature);
    assert_eq!(category_of("Cargo.toml"), ChangeCategory::Configuration);
    assert_eq!(category_of("tests/engine_test.rs"), ChangeCategory::Testing);
    assert_eq!(category_of("README.md"), ChangeCategory::Documentation);

    // 348 total lines with logic changes: base 6 + floor(148/150) = 6.
    let complexity = complexity_score(&diff.files, &diff.stats, &ScoringWeights::default());
    let plan = plan_questions(&summary, complexity, &bounds()).unwrap();
    assert_eq!(plan.recommended_count, 6);
    let sum: u32 = plan.category_distribution.values().sum();
    assert_eq!(sum, plan.recommended_count);
}

#[test]
fn test_full_session_and_record_lifecycle() {
    let storage = tempfile::tempdir().unwrap();
    let config = AppConfig {
        quiz: bounds(),
        storage: StorageConfig {
            dir: storage.path().to_path_buf(),
        },
        base_branch: None,
    };
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

    let diff = parse_diff_inputs(&sample_inputs());
    let summary = summarize_diff("feat/engine", &diff);
    let complexity = complexity_score(&diff.files, &diff.stats, &ScoringWeights::default());
    let plan = plan_questions(&summary, complexity, &config.quiz).unwrap();
    let questions = TemplateGenerator.generate(&plan, &summary).unwrap();
    validate_against_plan(&questions, &plan).unwrap();

    // 6 questions: two correct, one wrong, then skip the rest.
    let mut surface = ScriptedPrompt::new(&[Move::Correct, Move::Correct, Move::Wrong, Move::SkipAll]);
    let session = run_quiz_loop(questions, &mut surface).unwrap();
    assert_eq!(session.state(), SessionState::Finished);

    let stats = session.stats();
    assert_eq!(stats.correct, 2);
    assert_eq!(stats.incorrect, 1);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.vibe_debt_percent, 67);

    // 4 debt questions survive into the record.
    let record = build_record("feat/engine", date, &summary, &session).unwrap();
    assert_eq!(record.vibe_debt.len(), 4);
    let path = save_record(&config.storage.dir, &record).unwrap();
    assert!(path.ends_with("feat-engine_2026-08-29.json"));

    // Remediation pass one: resolve 3 of 4, reveal the last one.
    let mut surface =
        ScriptedPrompt::new(&[Move::Correct, Move::Correct, Move::Correct, Move::Reveal]);
    handle_debt_review_with(&config, "feat/engine", &mut surface).unwrap();
    let remaining_path = latest_record_for_branch(&config.storage.dir, "feat/engine")
        .unwrap()
        .expect("record still present");
    let remaining = load_record(&remaining_path).unwrap();
    assert_eq!(remaining.vibe_debt.len(), 1);
    assert_eq!(remaining.stats.total_questions, 1);

    // Remediation pass two: resolve the last question; the file goes away.
    let mut surface = ScriptedPrompt::new(&[Move::Correct]);
    handle_debt_review_with(&config, "feat/engine", &mut surface).unwrap();
    assert!(latest_record_for_branch(&config.storage.dir, "feat/engine")
        .unwrap()
        .is_none());
}

#[test]
fn test_all_correct_session_leaves_no_record() {
    let diff = parse_diff_inputs(&sample_inputs());
    let summary = summarize_diff("feat/engine", &diff);
    let plan = plan_questions(&summary, 10, &bounds()).unwrap();
    let questions = TemplateGenerator.generate(&plan, &summary).unwrap();

    let moves = vec![Move::Correct; questions.len()];
    let mut surface = ScriptedPrompt::new(&moves);
    let session = run_quiz_loop(questions, &mut surface).unwrap();

    assert_eq!(session.stats().vibe_debt_percent, 0);
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
    assert!(build_record("feat/engine", date, &summary, &session).is_none());
}
