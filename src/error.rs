use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("必要な外部ツールが見つかりません: {0}")]
    DependencyMissing(String),

    #[error("データセットの解析に失敗: {path}: {source}")]
    DatasetParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("メディア再解決エラー: {0}")]
    MediaResolution(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("CLIがタイムアウトしました: {program} ({seconds}秒)")]
    CliTimeout { program: String, seconds: u64 },

    #[error("CLI出力が上限を超えました: {program} ({limit} bytes)")]
    OutputTooLarge { program: String, limit: usize },

    #[error("解析レスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] style_ai_common::Error),
}

pub type Result<T> = std::result::Result<T, StyleAiError>;
