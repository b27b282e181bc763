//! AI itinerary generation over the Gemini `generateContent` endpoint.
//!
//! The model is asked to answer with a strict JSON document; markdown code
//! fences around the answer are tolerated and removed before parsing.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use super::ClientError;
use crate::models::generated::GeneratedItinerary;
use crate::models::trip::DATE_FORMAT;

const MODEL: &str = "gemini-1.5-flash";
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.8;
const TOP_K: u32 = 40;
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?").expect("valid fence pattern"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Relaxed,
    #[default]
    Balanced,
    Intensive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Budget,
    #[default]
    Medium,
    Luxury,
}

impl TravelStyle {
    fn as_str(&self) -> &str {
        match self {
            TravelStyle::Relaxed => "relaxed",
            TravelStyle::Balanced => "balanced",
            TravelStyle::Intensive => "intensive",
        }
    }
}

impl BudgetLevel {
    fn as_str(&self) -> &str {
        match self {
            BudgetLevel::Budget => "budget",
            BudgetLevel::Medium => "medium",
            BudgetLevel::Luxury => "luxury",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Preferences {
    pub prompt: String,
    pub travel_style: TravelStyle,
    pub budget: BudgetLevel,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

pub struct GeminiService {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl GeminiService {
    pub fn new(base_url: Url, api_key: String) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    pub async fn generate_itinerary(
        &self,
        city_name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        preferences: Option<&Preferences>,
    ) -> Result<GeneratedItinerary, ClientError> {
        if self.api_key.is_empty() {
            return Err(ClientError::MissingKey("Gemini"));
        }

        let url = self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", MODEL))?;
        let prompt = build_prompt(city_name, start_date, end_date, preferences);

        let response = self
            .http_client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(&prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                service: "Gemini",
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let generated: GenerateResponse = response.json().await?;
        let text: String = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();

        log::info!("Generated itinerary for {} ({} chars)", city_name, text.len());
        parse_itinerary(&text)
    }
}

fn request_body(prompt: &str) -> serde_json::Value {
    let safety_settings: Vec<_> = HARM_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_MEDIUM_AND_ABOVE" }))
        .collect();

    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "temperature": TEMPERATURE,
            "topP": TOP_P,
            "topK": TOP_K,
        },
        "safetySettings": safety_settings,
    })
}

pub fn build_prompt(
    city_name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    preferences: Option<&Preferences>,
) -> String {
    let num_days = (end_date - start_date).num_days() + 1;
    let start = start_date.format(DATE_FORMAT);
    let end = end_date.format(DATE_FORMAT);

    let mut prompt = format!(
        r#"Create a detailed {num_days}-day travel itinerary for {city_name} from {start} to {end}.

Please include:
1. Daily activities with suggested times
2. Popular attractions and landmarks
3. Local restaurants and food recommendations
4. Transportation tips between locations
5. Estimated costs for major activities

Format the response as a structured JSON with the following format:
{{
    "itinerary": [
        {{
            "day": 1,
            "date": "YYYY-MM-DD",
            "activities": [
                {{
                    "time": "HH:MM",
                    "title": "Activity name",
                    "description": "Brief description",
                    "location": "Location name",
                    "estimated_cost": "Cost in local currency",
                    "duration": "Estimated duration"
                }}
            ]
        }}
    ],
    "total_estimated_cost": "Total cost in local currency",
    "additional_tips": ["Tip 1", "Tip 2", ...]
}}

Make the itinerary realistic and consider:
- Opening hours of attractions
- Travel time between locations
- Local customs and best times to visit places
- A mix of popular and off-the-beaten-path experiences

IMPORTANT: Respond ONLY with valid JSON. Do not include any other text or explanation.
"#
    );

    if let Some(preferences) = preferences {
        prompt.push_str("\n\nConsider these preferences:\n");
        if !preferences.prompt.is_empty() {
            prompt.push_str(&format!("- Custom requirements: {}\n", preferences.prompt));
        }
        prompt.push_str(&format!("- Travel style: {}\n", preferences.travel_style.as_str()));
        prompt.push_str(&format!("- Budget level: {}\n", preferences.budget.as_str()));
    }

    prompt
}

/// Parses the model's answer, ignoring markdown code fences.
pub fn parse_itinerary(text: &str) -> Result<GeneratedItinerary, ClientError> {
    let cleaned = CODE_FENCE.replace_all(text.trim(), "");
    serde_json::from_str(cleaned.trim()).map_err(|err| {
        log::error!("Error parsing generated itinerary: {}", err);
        ClientError::Generation {
            reason: err.to_string(),
            raw: text.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_prompt_counts_days_inclusively() {
        let prompt = build_prompt("Lisbon", date("2025-06-01"), date("2025-06-03"), None);
        assert!(prompt.starts_with("Create a detailed 3-day travel itinerary for Lisbon"));
        assert!(prompt.contains("from 2025-06-01 to 2025-06-03"));
        assert!(!prompt.contains("Consider these preferences"));
    }

    #[test]
    fn test_prompt_includes_preferences() {
        let preferences = Preferences {
            prompt: "vegetarian food".into(),
            travel_style: TravelStyle::Relaxed,
            budget: BudgetLevel::Luxury,
        };
        let prompt = build_prompt("Rome", date("2025-06-01"), date("2025-06-01"), Some(&preferences));

        assert!(prompt.contains("1-day travel itinerary"));
        assert!(prompt.contains("- Custom requirements: vegetarian food"));
        assert!(prompt.contains("- Travel style: relaxed"));
        assert!(prompt.contains("- Budget level: luxury"));
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let reply = "```json\n{\"itinerary\": [{\"day\": 1, \"date\": \"2025-06-01\", \"activities\": [{\"time\": \"09:00\", \"title\": \"Castle\"}]}], \"additional_tips\": [\"Wear shoes\"]}\n```";
        let itinerary = parse_itinerary(reply).unwrap();

        assert_eq!(itinerary.itinerary.len(), 1);
        assert_eq!(itinerary.itinerary[0].activities[0].time.as_deref(), Some("09:00"));
        assert_eq!(itinerary.additional_tips, ["Wear shoes"]);
    }

    #[test]
    fn test_parse_failure_keeps_raw_text() {
        match parse_itinerary("Sorry, I cannot help with that.") {
            Err(ClientError::Generation { raw, .. }) => {
                assert_eq!(raw, "Sorry, I cannot help with that.")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_style_and_budget_defaults() {
        let style: TravelStyle = serde_json::from_str("\"intensive\"").unwrap();
        assert_eq!(style, TravelStyle::Intensive);
        assert_eq!(TravelStyle::default(), TravelStyle::Balanced);
        assert_eq!(BudgetLevel::default(), BudgetLevel::Medium);
    }
}
