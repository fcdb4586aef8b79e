//! データセットの読み書き
//!
//! ファイル全体を1つのJSONドキュメントとして扱う。保存は常に全体の上書き。

use crate::error::{Result, StyleAiError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use style_ai_common::Dataset;

/// データセットを読み込み
pub fn load(path: &Path) -> Result<Dataset> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| {
        if source.is_io() {
            StyleAiError::Io(source.into())
        } else {
            StyleAiError::DatasetParse {
                path: path.display().to_string(),
                source,
            }
        }
    })
}

/// データセットを保存（上書き）
pub fn save(dataset: &Dataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
