use clap::Parser;

use vibedebt::args::{Cli, CliCommand, DebtCommand};
use vibedebt::config::AppConfig;
use vibedebt::errors::AppError;
use vibedebt::handlers::{debt, quiz};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        CliCommand::Quiz(args) => quiz::handle_quiz(&config, args),
        CliCommand::Debt { command } => match command {
            DebtCommand::List => debt::handle_debt_list(&config),
            DebtCommand::Review { branch } => debt::handle_debt_review(&config, &branch),
        },
    }
}
