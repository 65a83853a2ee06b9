//! Quiz session state machine: `NotStarted -> InProgress -> Finished`,
//! one externally supplied verdict per question, no double scoring.

use crate::errors::SessionError;
use crate::types::{AnswerLabel, QuestionStatus, QuizQuestion, QuizStats};

/// Externally supplied outcome for a single question. A revealed answer is
/// a confirmed gap and weighs the same as a wrong one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Revealed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Finished,
}

/// Per-question outcome tracked alongside the question list.
#[derive(Debug, Clone, Copy)]
pub struct QuestionOutcome {
    pub status: QuestionStatus,
    pub user_answer: Option<AnswerLabel>,
}

/// The session's mutable state, threaded explicitly through the quiz
/// loop. Owns the questions, the per-question outcomes, and the running
/// stats.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    outcomes: Vec<QuestionOutcome>,
    stats: QuizStats,
    state: SessionState,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let outcomes = vec![
            QuestionOutcome {
                status: QuestionStatus::Pending,
                user_answer: None,
            };
            questions.len()
        ];
        let stats = QuizStats::new(questions.len() as u32);
        Self {
            questions,
            outcomes,
            stats,
            state: SessionState::NotStarted,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &QuizStats {
        &self.stats
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    /// Move from `NotStarted` to `InProgress`. An empty question list
    /// finishes immediately.
    pub fn begin(&mut self) {
        if self.state == SessionState::NotStarted {
            self.state = if self.questions.is_empty() {
                SessionState::Finished
            } else {
                SessionState::InProgress
            };
        }
    }

    /// Apply one verdict to one question.
    ///
    /// Scoring an already-terminal question is a contract violation and
    /// errors; the session is left unchanged in that case. The session
    /// transitions to `Finished` once every question is terminal.
    pub fn record_verdict(
        &mut self,
        index: usize,
        verdict: Verdict,
        user_answer: Option<AnswerLabel>,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::InProgress {
            return Err(SessionError::NotInProgress);
        }
        if index >= self.questions.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                total: self.questions.len(),
            });
        }
        if self.outcomes[index].status.is_terminal() {
            return Err(SessionError::AlreadyScored { index });
        }

        let status = match verdict {
            Verdict::Correct => {
                self.stats.correct += 1;
                QuestionStatus::Correct
            }
            Verdict::Incorrect => {
                self.stats.incorrect += 1;
                QuestionStatus::Incorrect
            }
            Verdict::Revealed => {
                self.stats.incorrect += 1;
                QuestionStatus::Revealed
            }
            Verdict::Skipped => {
                self.stats.skipped += 1;
                QuestionStatus::Skipped
            }
        };
        self.outcomes[index] = QuestionOutcome {
            status,
            user_answer,
        };
        self.stats.recompute_debt_percent();

        if self.outcomes.iter().all(|o| o.status.is_terminal()) {
            self.state = SessionState::Finished;
        }
        Ok(())
    }

    /// Skip every not-yet-answered question in one step and finish the
    /// session.
    pub fn skip_remaining(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::InProgress {
            return Err(SessionError::NotInProgress);
        }
        for outcome in &mut self.outcomes {
            if !outcome.status.is_terminal() {
                outcome.status = QuestionStatus::Skipped;
                outcome.user_answer = None;
                self.stats.skipped += 1;
            }
        }
        self.stats.recompute_debt_percent();
        self.state = SessionState::Finished;
        Ok(())
    }
}
