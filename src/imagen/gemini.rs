// Google Gemini 图像生成客户端 - 诗歌背景图的生成与修改

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::ImageGenerator;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
/// 提示词中引用正文的最大字符数
const EXCERPT_MAX_CHARS: usize = 300;
/// 竖版展示的宽高比
const ASPECT_RATIO: &str = "9:16";

/// Gemini 图像生成客户端
pub struct GeminiImageClient {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl GeminiImageClient {
    /// 创建新的客户端（接受共享的HTTP客户端以复用连接池）
    pub fn new(client: Client, api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            client,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// 从环境变量读取 API 密钥
    ///
    /// 密钥缺失不算错误，后续每次调用都会降级为"无图"
    pub fn from_env(client: Client) -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            warn!("未配置 GEMINI_API_KEY，配图功能不可用");
        }
        Self::new(client, api_key)
    }

    /// 构建生成提示词：固定淡彩水彩风格，正文截取前300字
    fn build_generate_prompt(title: &str, content: &str) -> String {
        let excerpt: String = content.chars().take(EXCERPT_MAX_CHARS).collect();
        format!(
            "Create a soft, aesthetic background image in pastel colors inspired by this poem titled \"{}\". \
The poem's content is: \"{}\". \
Style: watercolor, dreamy, minimalist, artistic. \
The image should be gentle, calming, and suitable for overlaying text. \
Avoid harsh contrasts, busy details, text, or realistic faces. \
Focus on abstract shapes, soft gradients, and nature-inspired motifs if relevant. \
The final output should be an image part.",
            title, excerpt
        )
    }

    /// 构建修改提示词：固定要求保持柔和淡彩基调
    fn build_edit_prompt(instruction: &str) -> String {
        format!(
            "Modify this background based on the following instruction while keeping it soft, pastel, and aesthetic: {}",
            instruction
        )
    }

    /// 去掉 data URI 前缀，返回原始 base64 载荷
    fn strip_data_uri(image: &str) -> &str {
        image.split_once(',').map(|(_, data)| data).unwrap_or(image)
    }

    /// 调用 generateContent，取响应中第一个内联图片并转为 data URI
    async fn request_image(
        &self,
        parts: Vec<serde_json::Value>,
        aspect_ratio: Option<&str>,
    ) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(anyhow!("API key 未配置"));
        }

        let endpoint = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let mut request_body = json!({
            "contents": [{ "parts": parts }],
        });
        if let Some(ratio) = aspect_ratio {
            request_body["generationConfig"] = json!({
                "imageConfig": { "aspectRatio": ratio }
            });
        }

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Gemini API 请求失败: {} - {}", status, error_text));
        }

        let result: GenerateContentResponse = response.json().await?;
        extract_inline_image(&result).ok_or_else(|| anyhow!("Gemini 响应中没有图片内容"))
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate_from_text(&self, title: &str, content: &str) -> Option<String> {
        let prompt = Self::build_generate_prompt(title, content);
        let parts = vec![json!({ "text": prompt })];

        match self.request_image(parts, Some(ASPECT_RATIO)).await {
            Ok(uri) => {
                info!("背景图生成成功: {}", title);
                Some(uri)
            }
            Err(e) => {
                warn!("背景图生成失败，条目将以无图方式继续: {}", e);
                None
            }
        }
    }

    async fn edit_from_image(&self, image_data_uri: &str, instruction: &str) -> Option<String> {
        let payload = Self::strip_data_uri(image_data_uri);

        // 载荷必须是合法 base64，坏数据不发往远端
        if general_purpose::STANDARD.decode(payload).is_err() {
            warn!("背景图数据不是有效的 base64，跳过修改");
            return None;
        }

        let parts = vec![
            json!({
                "inlineData": {
                    "data": payload,
                    "mimeType": "image/png"
                }
            }),
            json!({ "text": Self::build_edit_prompt(instruction) }),
        ];

        match self.request_image(parts, None).await {
            Ok(uri) => {
                info!("背景图修改成功");
                Some(uri)
            }
            Err(e) => {
                warn!("背景图修改失败: {}", e);
                None
            }
        }
    }
}

/// generateContent 响应结构
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentPart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

/// 取响应中第一个内联图片，重新编码为 data URI
fn extract_inline_image(response: &GenerateContentResponse) -> Option<String> {
    for candidate in &response.candidates {
        if let Some(content) = &candidate.content {
            for part in &content.parts {
                if let Some(inline) = &part.inline_data {
                    let mime = inline.mime_type.as_deref().unwrap_or("image/png");
                    return Some(format!("data:{};base64,{}", mime, inline.data));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_prompt_embeds_title_and_content() {
        let prompt = GeminiImageClient::build_generate_prompt("暮色", "云向西去");

        assert!(prompt.contains("\"暮色\""));
        assert!(prompt.contains("云向西去"));
        assert!(prompt.contains("watercolor"));
    }

    #[test]
    fn test_generate_prompt_truncates_content() {
        // 超长正文只保留前300个字符，且不能在字符中间截断
        let content = "山".repeat(400);
        let prompt = GeminiImageClient::build_generate_prompt("无题", &content);

        assert!(prompt.contains(&"山".repeat(300)));
        assert!(!prompt.contains(&"山".repeat(301)));
    }

    #[test]
    fn test_edit_prompt_keeps_pastel_instruction() {
        let prompt = GeminiImageClient::build_edit_prompt("加一点月光");

        assert!(prompt.contains("soft, pastel, and aesthetic"));
        assert!(prompt.ends_with("加一点月光"));
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(
            GeminiImageClient::strip_data_uri("data:image/png;base64,QUJD"),
            "QUJD"
        );
        // 没有前缀时原样返回
        assert_eq!(GeminiImageClient::strip_data_uri("QUJD"), "QUJD");
    }

    #[test]
    fn test_extract_first_inline_image() {
        // 文本部分在前，应跳过并取第一个图片部分
        let value = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "这是说明文字" },
                        { "inlineData": { "mimeType": "image/png", "data": "QUJD" } },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "WFla" } }
                    ]
                }
            }]
        });

        let response: GenerateContentResponse = serde_json::from_value(value).unwrap();
        let uri = extract_inline_image(&response).unwrap();
        assert_eq!(uri, "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_extract_defaults_to_png_mime() {
        let value = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [ { "inlineData": { "data": "QUJD" } } ]
                }
            }]
        });

        let response: GenerateContentResponse = serde_json::from_value(value).unwrap();
        let uri = extract_inline_image(&response).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_extract_returns_none_without_image() {
        let value = serde_json::json!({
            "candidates": [{
                "content": { "parts": [ { "text": "没有图片" } ] }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(value).unwrap();
        assert!(extract_inline_image(&response).is_none());

        let empty: GenerateContentResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(extract_inline_image(&empty).is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_degrades_to_none() {
        // 未配置密钥时不应发起网络请求，直接得到"无图"
        let client = GeminiImageClient::new(Client::new(), String::new());

        assert!(client.generate_from_text("暮色", "云向西去").await.is_none());
        assert!(client
            .edit_from_image("data:image/png;base64,QUJD", "加一点月光")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_edit_rejects_invalid_payload() {
        let client = GeminiImageClient::new(Client::new(), "test-key".to_string());

        // 非 base64 载荷在本地就被拒绝，不会发往远端
        assert!(client
            .edit_from_image("data:image/png;base64,不是base64!!!", "加一点月光")
            .await
            .is_none());
    }
}
