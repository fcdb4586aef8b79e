mod cli;

pub use cli::Analyzer;
pub use style_ai_common::StyleAnalysis;
