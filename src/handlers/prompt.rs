//! Interactive prompting surface: present one question, block for exactly
//! one response. The console implementation is deliberately thin; all
//! scoring decisions live in the session state machine.

use std::io::{self, BufRead, Write};

use crate::errors::AppError;
use crate::session::Verdict;
use crate::types::{AnswerLabel, QuizQuestion};

/// What the user did with a presented question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptResponse {
    Answer(AnswerLabel),
    Reveal,
    SkipAll,
}

/// One question in, exactly one response out.
pub trait PromptSurface {
    fn present(
        &mut self,
        index: usize,
        total: usize,
        question: &QuizQuestion,
    ) -> Result<PromptResponse, AppError>;

    /// Called after the verdict is known, for user feedback. No-op by
    /// default.
    fn feedback(&mut self, _verdict: Verdict, _question: &QuizQuestion) -> Result<(), AppError> {
        Ok(())
    }
}

/// Terminal prompt reading one line per question from stdin.
pub struct ConsolePrompt;

impl ConsolePrompt {
    fn read_line() -> Result<String, AppError> {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| AppError::IO("reading answer from stdin".to_string(), e))?;
        Ok(line)
    }
}

impl PromptSurface for ConsolePrompt {
    fn present(
        &mut self,
        index: usize,
        total: usize,
        question: &QuizQuestion,
    ) -> Result<PromptResponse, AppError> {
        println!();
        println!(
            "[{}/{}] ({}) {}",
            index + 1,
            total,
            question.category.as_str(),
            question.question
        );
        if let Some(excerpt) = &question.code_excerpt {
            println!("\n{}\n", excerpt);
        }
        for label in AnswerLabel::ALL {
            println!("  {}) {}", label.as_str(), question.options.get(label));
        }
        if !question.related_files.is_empty() {
            println!("  (files: {})", question.related_files.join(", "));
        }

        loop {
            print!("Answer [A-D], (r)eveal, (s)kip all: ");
            io::stdout()
                .flush()
                .map_err(|e| AppError::IO("flushing prompt".to_string(), e))?;

            let line = Self::read_line()?;
            let input = line.trim();
            if let Some(label) = AnswerLabel::parse(input) {
                return Ok(PromptResponse::Answer(label));
            }
            match input.to_ascii_lowercase().as_str() {
                "r" | "reveal" => return Ok(PromptResponse::Reveal),
                "s" | "skip" => return Ok(PromptResponse::SkipAll),
                _ => println!("Unrecognized input '{}'", input),
            }
        }
    }

    fn feedback(&mut self, verdict: Verdict, question: &QuizQuestion) -> Result<(), AppError> {
        match verdict {
            Verdict::Correct => println!("Correct."),
            Verdict::Incorrect => println!(
                "Incorrect. The answer is {}: {}",
                question.correct_answer.as_str(),
                question.explanation
            ),
            Verdict::Revealed => println!(
                "Answer: {}) {}\n{}",
                question.correct_answer.as_str(),
                question.options.get(question.correct_answer),
                question.explanation
            ),
            Verdict::Skipped => {}
        }
        Ok(())
    }
}

/// Non-interactive surface that skips everything. Used by
/// `--yes-skip-all` and in scripts.
pub struct SkipAllPrompt;

impl PromptSurface for SkipAllPrompt {
    fn present(
        &mut self,
        _index: usize,
        _total: usize,
        _question: &QuizQuestion,
    ) -> Result<PromptResponse, AppError> {
        Ok(PromptResponse::SkipAll)
    }
}
