//! Gemini `generateContent` client.
//!
//! Asks for listing copy as JSON and parses the answer, tolerating the
//! Markdown code fences the model sometimes wraps it in. Stories are asked
//! for as plain prose.

use async_trait::async_trait;
use craftvista_core::{
    application::{ContentGenerator, GenerationError, GenerationRequest, StoryRequest},
    domain::GeneratedContent,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Hosted LLM content generator.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::NotConfigured("empty API key".into()));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("craftvista/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Read the API key from `var`.
    pub fn from_env(var: &str, model: impl Into<String>) -> Result<Self, GenerationError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Self::new(key, model),
            _ => Err(GenerationError::NotConfigured(format!("set {var} to a Gemini API key"))),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send one prompt and return the first candidate's text.
    async fn ask(&self, prompt: String, json_answer: bool) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });
        if json_answer {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200..=299 => {}
            401 | 403 => {
                return Err(GenerationError::NotConfigured(
                    "the API key was rejected".into(),
                ));
            }
            429 => {
                let retry_after_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok());
                return Err(GenerationError::RateLimited { retry_after_secs });
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                warn!(status, "Gemini request failed");
                return Err(GenerationError::Unavailable(format!("HTTP {status}: {body}")));
            }
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        candidate_text(&payload).map(str::to_string)
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        debug!(model = %self.model, "Requesting listing copy");
        let text = self.ask(build_prompt(request), true).await?;
        parse_listing(&text)
    }

    async fn generate_story(&self, request: &StoryRequest) -> Result<String, GenerationError> {
        debug!(model = %self.model, "Requesting artisan story");
        let text = self.ask(build_story_prompt(request), false).await?;
        let story = strip_code_fence(&text);
        if story.is_empty() {
            return Err(GenerationError::MalformedResponse("empty story".into()));
        }
        Ok(story.to_string())
    }
}

/// The instruction sent to the model.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let artisan = request
        .artisan_name
        .as_deref()
        .unwrap_or("Traditional artisan");
    format!(
        "As an expert in Indian handicrafts, generate comprehensive product information for this item:\n\
         \n\
         Description: {description}\n\
         Category: {category}\n\
         Materials: {materials}\n\
         Artisan: {artisan}\n\
         \n\
         Please provide:\n\
         1. TITLE: Compelling, SEO-friendly product title (50-80 characters)\n\
         2. DESCRIPTION: Detailed, engaging product description (150-300 words)\n\
         3. PRICE_SUGGESTION: Fair price in INR based on materials, complexity, and market standards\n\
         4. CULTURAL_CONTEXT: 2-3 sentences about the cultural significance and traditional techniques\n\
         5. KEYWORDS: 5-8 relevant keywords for search optimization\n\
         \n\
         Format as JSON with keys: title, description, price_suggestion, cultural_context, keywords",
        description = request.description,
        category = request.category,
        materials = request.materials.join(", "),
    )
}

/// The instruction for an artisan story.
pub fn build_story_prompt(request: &StoryRequest) -> String {
    let artisan = request
        .artisan_name
        .as_deref()
        .unwrap_or("A skilled artisan");
    format!(
        "Create an engaging, emotional story about this handcrafted product that connects buyers \
         with the artisan's skill and cultural heritage:\n\
         \n\
         Product: {title}\n\
         Description: {description}\n\
         Category: {category}\n\
         Materials: {materials}\n\
         Artisan: {artisan}\n\
         \n\
         Write a compelling 2-3 paragraph story that:\n\
         - Highlights the artisan's skill and dedication\n\
         - Explains the traditional techniques used\n\
         - Connects the piece to Indian cultural heritage\n\
         - Creates emotional connection with potential buyers\n\
         - Uses vivid, descriptive language\n\
         \n\
         Keep it authentic, respectful, and engaging (150-250 words).",
        title = request.title,
        description = request.description,
        category = request.category,
        materials = request.materials.join(", "),
    )
}

fn candidate_text(payload: &Value) -> Result<&str, GenerationError> {
    payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| GenerationError::MalformedResponse("no candidate text in response".into()))
}

/// Drop a surrounding ```` ```json ```` or ```` ``` ```` fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Deserialize)]
struct ListingCopy {
    title: String,
    description: String,
    #[serde(default)]
    cultural_context: String,
    price_suggestion: Price,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Models answer with either a number or a string such as `"₹1,200"`,
/// `"Rs. 1,200"` or `"₹1,250 - ₹1,500"`. Only the first amount is read.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    fn rupees(&self) -> Result<f64, GenerationError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => leading_amount(s).ok_or_else(|| {
                GenerationError::MalformedResponse(format!("unreadable price '{s}'"))
            }),
        }
    }
}

/// The first number in `text`, ignoring currency prefixes and `,` grouping.
fn leading_amount(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let mut chars = text[start..].chars().peekable();
    let mut number = String::new();
    let mut seen_point = false;

    while let Some(c) = chars.next() {
        match c {
            '0'..='9' => number.push(c),
            ',' if chars.peek().is_some_and(char::is_ascii_digit) => {}
            '.' if !seen_point && chars.peek().is_some_and(char::is_ascii_digit) => {
                seen_point = true;
                number.push(c);
            }
            _ => break,
        }
    }
    number.parse().ok()
}

/// Parse the model's JSON answer into listing copy.
pub fn parse_listing(text: &str) -> Result<GeneratedContent, GenerationError> {
    let copy: ListingCopy = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    let price = copy.price_suggestion.rupees()?;
    Ok(
        GeneratedContent::new(copy.title, copy.description, copy.cultural_context, price)
            .with_keywords(copy.keywords),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftvista_core::domain::{Category, DraftInput};

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn parses_fenced_answer_with_text_price() {
        let answer = r#"```json
        {
          "title": "Blue Pottery Vase from Jaipur",
          "description": "Hand painted.",
          "price_suggestion": "₹1,250 - ₹1,500",
          "cultural_context": "Jaipur blue pottery uses quartz, not clay.",
          "keywords": ["blue pottery", "jaipur"]
        }
        ```"#;
        let content = parse_listing(answer).unwrap();
        assert_eq!(content.title, "Blue Pottery Vase from Jaipur");
        assert_eq!(content.suggested_price, 1250.0);
        assert_eq!(content.keywords.len(), 2);
    }

    #[test]
    fn text_prices_read_the_first_amount() {
        let cases = [
            ("Rs. 1,200", 1200.0),
            ("INR 1,200.50", 1200.5),
            ("₹850", 850.0),
            ("₹1,250 - ₹1,500", 1250.0),
            ("around 2,000 rupees.", 2000.0),
            ("1200.", 1200.0),
        ];
        for (text, rupees) in cases {
            assert_eq!(
                Price::Text(text.into()).rupees().unwrap(),
                rupees,
                "{text}"
            );
        }
        assert!(Price::Text("price on request".into()).rupees().is_err());
    }

    #[test]
    fn numeric_price_and_missing_optional_fields() {
        let content =
            parse_listing(r#"{"title":"Bowl","description":"A bowl","price_suggestion":850}"#)
                .unwrap();
        assert_eq!(content.suggested_price, 850.0);
        assert!(content.cultural_context.is_empty());
        assert!(content.keywords.is_empty());
    }

    #[test]
    fn prose_answer_is_malformed() {
        let err = parse_listing("Sure! Here is your listing.").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn candidate_text_is_extracted() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
        });
        assert_eq!(candidate_text(&payload).unwrap(), "{}");
        assert!(candidate_text(&json!({ "candidates": [] })).is_err());
    }

    #[test]
    fn prompt_names_input_and_artisan() {
        let input = DraftInput::new(Category::Textiles, "block printed scarf")
            .with_materials(["cotton", "indigo"]);
        let prompt = build_prompt(&GenerationRequest::from_input(&input, None));

        assert!(prompt.contains("Description: block printed scarf"));
        assert!(prompt.contains("Category: textiles"));
        assert!(prompt.contains("Materials: cotton, indigo"));
        assert!(prompt.contains("Artisan: Traditional artisan"));
        assert!(prompt.contains("price_suggestion"));
    }

    #[test]
    fn story_prompt_describes_the_piece() {
        let request = StoryRequest {
            title: "Dhokra Horse".into(),
            description: "Lost-wax cast.".into(),
            category: Category::Metalwork,
            materials: vec!["brass".into(), "beeswax".into()],
            artisan_name: None,
        };
        let prompt = build_story_prompt(&request);

        assert!(prompt.contains("Product: Dhokra Horse"));
        assert!(prompt.contains("Materials: brass, beeswax"));
        assert!(prompt.contains("Artisan: A skilled artisan"));
        assert!(prompt.contains("(150-250 words)"));
    }

    #[test]
    fn blank_key_is_not_configured() {
        assert!(matches!(
            GeminiGenerator::new("  ", DEFAULT_MODEL),
            Err(GenerationError::NotConfigured(_))
        ));
    }
}
