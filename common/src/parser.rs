//! ツール出力パーサー
//!
//! 解析ツール・メディア参照ツールの出力からJSONオブジェクトを抽出し、
//! 型付きの結果にデコードする。出力の前後に警告やコードフェンスが
//! 混ざっていても、最初の `{` から最後の `}` までだけを対象とする。

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{is_video_kind, ResolvedMedia, StyleAnalysis};

/// 出力からJSONオブジェクト部分を抽出
///
/// # Examples
/// ```
/// use style_ai_common::extract_json_object;
///
/// let output = "warning: foo\n{\"prompt\": \"x\"}\nbye";
/// assert_eq!(extract_json_object(output).unwrap(), "{\"prompt\": \"x\"}");
/// ```
pub fn extract_json_object(output: &str) -> Result<&str> {
    let start = output
        .find('{')
        .ok_or_else(|| Error::Parse("JSONオブジェクトが見つかりません".into()))?;
    let end = output
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| Error::Parse("JSONオブジェクトが閉じていません".into()))?;
    Ok(&output[start..=end])
}

/// HEXカラーを `#rrggbb` 形式に正規化（不正な値は `None`）
pub fn normalize_hex_color(color: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref HEX_COLOR: Regex =
            Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
    }

    let trimmed = color.trim();
    HEX_COLOR
        .captures(trimmed)
        .map(|caps| format!("#{}", caps[1].to_lowercase()))
}

/// 解析ツールの出力をパース
///
/// `prompt` が欠けている、または空の場合は失敗とする。
/// colorPaletteはHEXとして解釈できる値だけを残す。
pub fn parse_style_response(output: &str) -> Result<StyleAnalysis> {
    let json_str = extract_json_object(output)?;
    let mut analysis: StyleAnalysis = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("スタイル解析 JSONパースエラー: {}", e)))?;

    if analysis.prompt.trim().is_empty() {
        return Err(Error::Parse("promptが空です".into()));
    }

    analysis.color_palette = analysis
        .color_palette
        .iter()
        .filter_map(|c| normalize_hex_color(c))
        .collect();

    Ok(analysis)
}

/// メディア参照ツールが返すメディア情報
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LookupMedia {
    #[serde(rename = "type", alias = "mediaType", alias = "kind")]
    kind: Option<String>,
    #[serde(alias = "mediaUrl", alias = "media_url_https")]
    url: Option<String>,
    #[serde(alias = "videoUrl")]
    video_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    media: Vec<LookupMedia>,
    #[serde(flatten)]
    inline: LookupMedia,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// メディア参照ツールの出力をパース
///
/// `media` 配列があれば先頭要素、なければトップレベルのフィールドを使う。
/// 動画（video / animated_gif）は動画ストリームURLを優先する。
pub fn parse_lookup_response(output: &str) -> Result<ResolvedMedia> {
    let json_str = extract_json_object(output)?;
    let response: LookupResponse = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("メディア情報 JSONパースエラー: {}", e)))?;

    let media = response.media.into_iter().next().unwrap_or(response.inline);
    let is_video = media.kind.as_deref().map(is_video_kind).unwrap_or(false);

    let media_url = if is_video {
        non_empty(media.video_url).or_else(|| non_empty(media.url))
    } else {
        non_empty(media.url)
    };

    media_url
        .map(|media_url| ResolvedMedia { media_url, is_video })
        .ok_or_else(|| Error::Parse("メディアURLが含まれていません".into()))
}
