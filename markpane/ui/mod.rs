pub mod prompt;
pub mod status;
