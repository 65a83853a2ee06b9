use clap::{Args, Parser, Subcommand};

/// Command-line interface for the vibe-debt comprehension checker.
#[derive(Parser, Debug)]
#[clap(
    name = "vibedebt",
    version,
    about = "Quiz yourself on what actually changed on your branch",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Analyze the current branch against its base and run a comprehension
    /// quiz on the changes.
    #[clap(alias = "q")]
    Quiz(QuizArgs),
    /// Inspect or remediate previously recorded vibe debt.
    Debt {
        #[command(subcommand)]
        command: DebtCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct QuizArgs {
    /// Base branch to diff against (overrides config and detection).
    #[clap(long, value_name = "BRANCH")]
    pub base: Option<String>,

    /// Print the diff summary and question plan as JSON and exit without
    /// quizzing.
    #[clap(long)]
    pub plan_only: bool,

    /// Non-interactive mode: skip every question and record the full debt.
    #[clap(long)]
    pub yes_skip_all: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DebtCommand {
    /// List outstanding vibe-debt records.
    #[clap(alias = "ls")]
    List,
    /// Re-quiz the outstanding questions of a branch's newest record,
    /// rewriting or deleting the record depending on the outcome.
    #[clap(alias = "rv")]
    Review {
        /// Branch whose record to remediate.
        branch: String,
    },
}
