//! The `quiz` subcommand: extract the branch diff, classify and score it,
//! plan the quiz, run the question loop, and persist any resulting debt.

use chrono::Local;
use serde_json::json;

use crate::analysis::{complexity_score, summarize_diff, ScoringWeights};
use crate::args::QuizArgs;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::generator::{validate_against_plan, QuestionGenerator, TemplateGenerator};
use crate::git_module::{extract_diff, resolve_branch_context};
use crate::handlers::prompt::{ConsolePrompt, PromptResponse, PromptSurface, SkipAllPrompt};
use crate::planner::plan_questions;
use crate::session::{QuizSession, SessionState, Verdict};
use crate::storage::{build_record, save_record};
use crate::types::QuizQuestion;

pub fn handle_quiz(config: &AppConfig, args: QuizArgs) -> Result<(), AppError> {
    let context = resolve_branch_context(config, args.base.as_deref())?;
    println!(
        "Analyzing '{}' against '{}'...",
        context.branch, context.base
    );

    let diff = extract_diff(&context)?;
    let summary = summarize_diff(&context.branch, &diff);
    let complexity = complexity_score(&diff.files, &diff.stats, &ScoringWeights::default());
    let plan = plan_questions(&summary, complexity, &config.quiz)?;

    if args.plan_only {
        let output = json!({
            "diffSummary": summary,
            "questionPlan": plan,
        });
        let rendered = serde_json::to_string_pretty(&output)
            .map_err(|e| AppError::Generic(format!("Failed to render plan JSON: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    let questions = TemplateGenerator.generate(&plan, &summary)?;
    validate_against_plan(&questions, &plan)?;

    println!(
        "{} (complexity {}/100, intent: {})",
        summary.overview, plan.complexity_score, summary.inferred_intent
    );
    println!("Asking {} questions.", plan.recommended_count);

    let mut console;
    let mut skip_all;
    let surface: &mut dyn PromptSurface = if args.yes_skip_all {
        skip_all = SkipAllPrompt;
        &mut skip_all
    } else {
        console = ConsolePrompt;
        &mut console
    };
    let session = run_quiz_loop(questions, surface)?;

    let stats = session.stats();
    println!();
    println!(
        "Done: {} correct, {} incorrect, {} skipped ({}% vibe debt).",
        stats.correct, stats.incorrect, stats.skipped, stats.vibe_debt_percent
    );

    let today = Local::now().date_naive();
    match build_record(&context.branch, today, &summary, &session) {
        Some(record) => {
            let path = save_record(&config.storage.dir, &record)?;
            println!(
                "Recorded {} outstanding question(s) in {}",
                record.vibe_debt.len(),
                path.display()
            );
        }
        None => println!("No vibe debt. Nothing recorded."),
    }
    Ok(())
}

/// Drive the session with a prompt surface until it finishes. The
/// surface's answer is compared against the question's correct label here;
/// the session only ever sees verdicts.
pub fn run_quiz_loop(
    questions: Vec<QuizQuestion>,
    surface: &mut dyn PromptSurface,
) -> Result<QuizSession, AppError> {
    let mut session = QuizSession::new(questions);
    session.begin();

    let total = session.questions().len();
    for index in 0..total {
        if session.state() != SessionState::InProgress {
            break;
        }
        let question = session.questions()[index].clone();
        match surface.present(index, total, &question)? {
            PromptResponse::Answer(label) => {
                let verdict = if label == question.correct_answer {
                    Verdict::Correct
                } else {
                    Verdict::Incorrect
                };
                session.record_verdict(index, verdict, Some(label))?;
                surface.feedback(verdict, &question)?;
            }
            PromptResponse::Reveal => {
                session.record_verdict(index, Verdict::Revealed, None)?;
                surface.feedback(Verdict::Revealed, &question)?;
            }
            PromptResponse::SkipAll => {
                session.skip_remaining()?;
                break;
            }
        }
    }
    Ok(session)
}
