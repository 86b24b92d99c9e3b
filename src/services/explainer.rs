use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::ExplainerSettings;
use crate::models::{AttributeScore, Attributes, FruitKind, MutualMatchResult, Preferences};
use crate::services::generator::{Communication, GeneratedFruit};

/// Errors that can occur when asking the language model for explanations
#[derive(Debug, Error)]
pub enum ExplainerError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("API key not configured")]
    MissingApiKey,

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

const SYSTEM_PROMPT: &str = r#"You are a friendly, enthusiastic matchmaker for the "Fruit Match" dating app where fruits find their perfect partner.

Explain matchmaking results in a fun, personalized way:
1. Reference actual compatibility scores and specific attribute matches
2. Explain BOTH directions of compatibility
3. Be encouraging but honest about match quality
4. Use fruit-themed language and light humor
5. Keep explanations concise

You MUST respond with valid JSON in this exact structure:
{
  "introduction": "A personalized greeting for the new fruit",
  "explanations": [
    {
      "matchRank": 1,
      "matchId": "the match ID",
      "overallSummary": "A punchy 8-10 word teaser of the match",
      "whyTheyLikeYou": "2-3 sentences on why the matched fruit likes the new fruit",
      "whyYouLikeThem": "2-3 sentences on why the new fruit should like the matched fruit",
      "compatibilityHighlights": ["highlight1", "highlight2"]
    }
  ],
  "closingNote": "A brief encouraging note"
}"#;

/// Model-written explanation of one ranked match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchExplanation {
    pub match_rank: usize,
    pub match_id: String,
    #[serde(default)]
    pub overall_summary: String,
    #[serde(default)]
    pub why_they_like_you: String,
    #[serde(default)]
    pub why_you_like_them: String,
    #[serde(default)]
    pub compatibility_highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExplanation {
    pub introduction: String,
    pub explanations: Vec<MatchExplanation>,
    #[serde(default)]
    pub closing_note: String,
}

/// Plain score summary used when the model is unavailable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackExplanation {
    pub match_rank: usize,
    pub match_id: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackResponse {
    pub error: String,
    pub fallback_explanations: Vec<FallbackExplanation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Explanation {
    Generated(GeneratedExplanation),
    Fallback(FallbackResponse),
}

impl Explanation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Explanation::Fallback(_))
    }
}

/// The fruit whose matches are being explained
#[derive(Debug, Clone, Copy)]
pub struct FruitContext<'a> {
    pub kind: FruitKind,
    pub attributes: &'a Attributes,
    pub preferences: &'a Preferences,
    pub communication: Option<&'a Communication>,
}

impl<'a> From<&'a GeneratedFruit> for FruitContext<'a> {
    fn from(fruit: &'a GeneratedFruit) -> Self {
        Self {
            kind: fruit.kind,
            attributes: &fruit.attributes,
            preferences: &fruit.preferences,
            communication: Some(&fruit.communication),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Match explanation client for an OpenAI-compatible chat-completions API
///
/// Every failure degrades to a fallback explanation; callers never see an error.
pub struct Explainer {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Explainer {
    pub fn new(settings: &ExplainerSettings) -> Result<Self, ExplainerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone().filter(|key| !key.trim().is_empty()),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Explain ranked matches to the fruit that received them
    pub async fn explain(&self, fruit: FruitContext<'_>, matches: &[MutualMatchResult]) -> Explanation {
        if self.api_key.is_none() {
            tracing::warn!("Explainer API key not configured, using fallback");
            return fallback(matches);
        }

        if matches.is_empty() {
            return Explanation::Generated(GeneratedExplanation {
                introduction: format!("Welcome to Fruit Match, little {}!", fruit.kind),
                explanations: vec![],
                closing_note: "No matches found yet, but don't worry - more fruits join every day!"
                    .to_string(),
            });
        }

        match self.request(fruit, matches).await {
            Ok(generated) => Explanation::Generated(generated),
            Err(e) => {
                tracing::warn!("Explanation request failed, using fallback: {}", e);
                fallback(matches)
            }
        }
    }

    async fn request(
        &self,
        fruit: FruitContext<'_>,
        matches: &[MutualMatchResult],
    ) -> Result<GeneratedExplanation, ExplainerError> {
        let api_key = self.api_key.as_deref().ok_or(ExplainerError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(fruit, matches),
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!("Requesting explanations for {} matches from {}", matches.len(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExplainerError::ApiError(format!(
                "Chat completion failed: {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ExplainerError::EmptyResponse)?;

        parse_explanation(&content)
    }
}

fn parse_explanation(content: &str) -> Result<GeneratedExplanation, ExplainerError> {
    let parsed: GeneratedExplanation = serde_json::from_str(content)
        .map_err(|e| ExplainerError::InvalidResponse(e.to_string()))?;

    if parsed.introduction.trim().is_empty() {
        return Err(ExplainerError::InvalidResponse("Missing introduction".into()));
    }
    Ok(parsed)
}

/// Score summaries in rank order
pub fn fallback(matches: &[MutualMatchResult]) -> Explanation {
    Explanation::Fallback(FallbackResponse {
        error: "LLM unavailable".to_string(),
        fallback_explanations: matches
            .iter()
            .enumerate()
            .map(|(index, result)| FallbackExplanation {
                match_rank: index + 1,
                match_id: result.fruit.id.clone(),
                summary: format!(
                    "Match score: {}% (You: {}%, They: {}%)",
                    result.score, result.our_score, result.their_score
                ),
            })
            .collect(),
    })
}

fn capitalize(kind: FruitKind) -> String {
    let name = kind.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn breakdown_lines(breakdown: &[AttributeScore]) -> String {
    breakdown
        .iter()
        .map(|entry| {
            format!(
                "- {}: {} ({}% match, weight: {:.2})",
                entry.attribute,
                entry.reason,
                (entry.score * 100.0).round(),
                entry.weight
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn build_user_prompt(fruit: FruitContext<'_>, matches: &[MutualMatchResult]) -> String {
    let kind = fruit.kind;
    let other = kind.opposite();

    let mut prompt = format!(
        "A new {} just joined Fruit Match and needs their match results explained!\n\n## About the New {}\n\n",
        kind,
        capitalize(kind)
    );

    if let Some(communication) = fruit.communication {
        prompt.push_str(&format!(
            "**Self-description:** {}\n\n**What they're looking for:** {}\n\n",
            communication.attributes, communication.preferences
        ));
    }

    prompt.push_str(&format!(
        "**Raw attributes:**\n{}\n\n**Preferences:**\n{}\n\n## Their Top {} {} Matches\n\n",
        pretty(fruit.attributes),
        pretty(fruit.preferences),
        matches.len(),
        capitalize(other)
    ));

    for (index, result) in matches.iter().enumerate() {
        prompt.push_str(&format!(
            "### Match #{}: {}\n\
             - **Overall Score:** {}% (mutual compatibility)\n\
             - **How much they like this {}:** {}%\n\
             - **How much this {} likes them:** {}%\n\n\
             **{}'s attributes:**\n{}\n\n\
             **Why the {} likes this {}:**\n{}\n\n\
             **Why this {} likes the {}:**\n{}\n\n",
            index + 1,
            result.fruit.id,
            result.score,
            other,
            result.our_score,
            other,
            result.their_score,
            capitalize(other),
            pretty(&result.fruit.attributes),
            kind,
            other,
            breakdown_lines(&result.our_breakdown),
            other,
            kind,
            breakdown_lines(&result.their_breakdown),
        ));
    }

    prompt.push_str(
        "Please generate friendly, personalized explanations for these matches. Remember to respond with valid JSON only.",
    );
    prompt
}
