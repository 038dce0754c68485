pub mod assistant;
pub mod chat;
pub mod config;
pub mod output;
pub mod prompt;
pub mod rank;
