pub mod ai_provider;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pool;
pub mod process;
pub mod resolver;
pub mod store;
