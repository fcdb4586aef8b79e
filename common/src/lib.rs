//! Style AI Common Library
//!
//! CLIと統合テストで共有される型とユーティリティ

pub mod types;
pub mod dataset;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod selector;

pub use types::{Entry, ResolvedMedia, StyleAnalysis, is_video_kind};
pub use dataset::{Category, Dataset};
pub use error::{Error, Result};
pub use parser::{extract_json_object, normalize_hex_color, parse_lookup_response, parse_style_response};
pub use prompts::{build_image_prompt, build_style_prompt, build_video_prompt};
pub use selector::{Job, SelectionSummary, select_jobs, summarize};
