//! プロンプト生成モジュール
//!
//! 解析ツールに渡すプロンプト:
//! - build_image_prompt: 静止画用
//! - build_video_prompt: 動画・GIF用
//!
//! どちらも単一のJSONオブジェクトのみを要求する。

/// 出力スキーマ（両テンプレート共通）
const OUTPUT_SCHEMA: &str = r##"{
  "prompt": "A detailed natural-language description that could recreate this visual style",
  "style": ["short style tag", "..."],
  "colorPalette": ["#RRGGBB", "..."],
  "technique": "primary technique or medium",
  "mood": "overall mood",
  "movement": "art movement or aesthetic",
  "reactImplementation": "optional notes on recreating the look with React and CSS"
}"##;

/// 静止画用プロンプト
pub fn build_image_prompt(media_url: &str) -> String {
    format!(
        r#"You are a visual design analyst. Analyze the image at the following URL and describe its visual style.

Image: {media_url}

## Output format (return exactly this JSON object)
{OUTPUT_SCHEMA}

## Rules
- colorPalette: 3 to 6 dominant colors as hex strings
- style: 3 to 8 short lowercase tags
- Describe only what is visible
- Return ONLY valid JSON, no markdown, no code fences, no commentary"#
    )
}

/// 動画・GIF用プロンプト
pub fn build_video_prompt(media_url: &str) -> String {
    format!(
        r#"You are a motion design analyst. Analyze the video at the following URL and describe its visual and motion style.

Video: {media_url}

## Output format (return exactly this JSON object)
{OUTPUT_SCHEMA}

## Rules
- prompt: include pacing, transitions and camera or animation movement
- colorPalette: 3 to 6 dominant colors across the clip as hex strings
- style: 3 to 8 short lowercase tags
- Describe only what is visible
- Return ONLY valid JSON, no markdown, no code fences, no commentary"#
    )
}

/// メディア種別に応じてテンプレートを選ぶ
pub fn build_style_prompt(media_url: &str, is_video: bool) -> String {
    if is_video {
        build_video_prompt(media_url)
    } else {
        build_image_prompt(media_url)
    }
}
