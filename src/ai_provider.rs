use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 解析に使うAI CLI
///
/// いずれもプロンプトを標準入力から受け取り、テキストを標準出力に返す。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Claude,
    Codex,
    #[default]
    Gemini,
}

impl AiProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            AiProvider::Claude => "claude",
            AiProvider::Codex => "codex",
            AiProvider::Gemini => "gemini",
        }
    }

    /// 標準入力のプロンプトを非対話で処理させる引数
    pub fn prompt_args(&self, model: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = match self {
            AiProvider::Claude => vec!["-p".into(), "--output-format".into(), "text".into()],
            AiProvider::Codex => vec!["exec".into()],
            AiProvider::Gemini => Vec::new(),
        };

        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            args.push(match self {
                AiProvider::Codex => "-m".into(),
                _ => "--model".into(),
            });
            args.push(model.to_string());
        }

        // codex exec は "-" で標準入力を読む
        if matches!(self, AiProvider::Codex) {
            args.push("-".into());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_args_without_model() {
        assert_eq!(AiProvider::Claude.prompt_args(None), vec!["-p", "--output-format", "text"]);
        assert_eq!(AiProvider::Codex.prompt_args(None), vec!["exec", "-"]);
        assert!(AiProvider::Gemini.prompt_args(None).is_empty());
    }

    #[test]
    fn test_prompt_args_with_model() {
        assert_eq!(
            AiProvider::Gemini.prompt_args(Some("gemini-2.5-pro")),
            vec!["--model", "gemini-2.5-pro"]
        );
        assert_eq!(
            AiProvider::Codex.prompt_args(Some("o3")),
            vec!["exec", "-m", "o3", "-"]
        );
        assert!(AiProvider::Gemini.prompt_args(Some("  ")).is_empty());
    }

    #[test]
    fn test_provider_serde_lowercase() {
        let provider: AiProvider = serde_json::from_str("\"claude\"").unwrap();
        assert_eq!(provider, AiProvider::Claude);
        assert_eq!(serde_json::to_string(&AiProvider::Gemini).unwrap(), "\"gemini\"");
    }
}
