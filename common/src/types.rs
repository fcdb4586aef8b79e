//! データセットの型定義
//!
//! CLIとテストで共有される型:
//! - Entry: キュレーション済みコンテンツ1件
//! - StyleAnalysis: 解析ツールが返すスタイル解析結果
//! - ResolvedMedia: メディア再解決の結果

use serde::de::{self, DeserializeOwned};
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// 動画として扱うメディア種別
pub const VIDEO_MEDIA_KINDS: &[&str] = &["video", "animated_gif"];

/// メディア種別が動画かどうか
pub fn is_video_kind(kind: &str) -> bool {
    VIDEO_MEDIA_KINDS.contains(&kind.trim())
}

/// スタイル解析結果
///
/// エントリに付与された時点で完了の証跡となり、以降の実行ではスキップされる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAnalysis {
    /// 自然言語によるスタイル説明
    pub prompt: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub style: Vec<String>,        // スタイルタグ

    #[serde(default, deserialize_with = "null_as_default")]
    pub color_palette: Vec<String>, // HEXカラー

    #[serde(default, deserialize_with = "null_as_default")]
    pub technique: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mood: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub movement: String,

    /// 実装ガイド（任意）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react_implementation: Option<String>,
}

/// `null` を既定値として読む
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// コンテンツ1件
///
/// 取り込み側が付けた未知のフィールドは `extra` に保持する。
/// 保存時は読み込んだときのキー順で書き戻し、元になかったキーは値があるものだけ末尾に足す。
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub id: String,
    pub text: String,
    pub author: String,
    pub url: String,
    pub media_type: Option<String>,
    pub media_url: Option<String>,
    pub style_analysis: Option<StyleAnalysis>,
    pub style_prompt: Option<String>,
    pub extra: Map<String, Value>,
    /// 読み込み時のキー順（コードで組み立てたエントリでは空）
    pub key_order: Vec<String>,
}

// キー順は比較対象にしない
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.text == other.text
            && self.author == other.author
            && self.url == other.url
            && self.media_type == other.media_type
            && self.media_url == other.media_url
            && self.style_analysis == other.style_analysis
            && self.style_prompt == other.style_prompt
            && self.extra == other.extra
    }
}

fn take_field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> serde_json::Result<Option<T>> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl Entry {
    fn from_fields(mut fields: Map<String, Value>) -> serde_json::Result<Self> {
        let key_order = fields.keys().cloned().collect();
        Ok(Self {
            id: take_field(&mut fields, "id")?.unwrap_or_default(),
            text: take_field(&mut fields, "text")?.unwrap_or_default(),
            author: take_field(&mut fields, "author")?.unwrap_or_default(),
            url: take_field(&mut fields, "url")?.unwrap_or_default(),
            media_type: take_field(&mut fields, "mediaType")?,
            media_url: take_field(&mut fields, "mediaUrl")?,
            style_analysis: take_field(&mut fields, "styleAnalysis")?,
            style_prompt: take_field(&mut fields, "stylePrompt")?,
            extra: fields,
            key_order,
        })
    }

    fn known_fields(&self) -> serde_json::Result<Vec<(&'static str, Value)>> {
        let analysis = match &self.style_analysis {
            Some(analysis) => serde_json::to_value(analysis)?,
            None => Value::Null,
        };
        Ok(vec![
            ("id", Value::from(self.id.as_str())),
            ("text", Value::from(self.text.as_str())),
            ("author", Value::from(self.author.as_str())),
            ("url", Value::from(self.url.as_str())),
            ("mediaType", Value::from(self.media_type.clone())),
            ("mediaUrl", Value::from(self.media_url.clone())),
            ("styleAnalysis", analysis),
            ("stylePrompt", Value::from(self.style_prompt.clone())),
        ])
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let known = self.known_fields().map_err(ser::Error::custom)?;
        let mut map = serializer.serialize_map(None)?;

        for key in &self.key_order {
            if let Some((_, value)) = known.iter().find(|(k, _)| *k == key.as_str()) {
                map.serialize_entry(key, value)?;
            } else if let Some(value) = self.extra.get(key) {
                map.serialize_entry(key, value)?;
            }
        }
        for (key, value) in &known {
            if !self.key_order.iter().any(|k| k == key) && !is_empty_value(value) {
                map.serialize_entry(key, value)?;
            }
        }
        for (key, value) in &self.extra {
            if !self.key_order.contains(key) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Entry::from_fields(fields).map_err(de::Error::custom)
    }
}

impl Entry {
    /// 空でないメディアURLを持つか
    pub fn has_media(&self) -> bool {
        self.media_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    }

    /// 解析済みか
    pub fn is_analyzed(&self) -> bool {
        self.style_analysis.is_some()
    }

    /// 保存済みのメディア種別が動画か
    pub fn is_video(&self) -> bool {
        self.media_type.as_deref().map(is_video_kind).unwrap_or(false)
    }

    /// 解析結果を付与する
    ///
    /// 既に解析結果がある場合は上書きせず `false` を返す。
    pub fn attach_analysis(&mut self, analysis: StyleAnalysis) -> bool {
        if self.is_analyzed() {
            return false;
        }
        self.style_prompt = Some(analysis.prompt.clone());
        self.style_analysis = Some(analysis);
        true
    }
}

/// メディア再解決の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub media_url: String,
    pub is_video: bool,
}
