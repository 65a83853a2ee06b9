pub mod debt;
pub mod prompt;
pub mod quiz;
