pub mod config;
pub mod document;
pub mod paths;
pub mod session;
