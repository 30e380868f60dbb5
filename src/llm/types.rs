use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// A fresh session holding only `prompt`.
    pub fn single_turn(prompt: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(prompt)])
    }
}

// generateContent wire format

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl From<&ChatRequest> for GenerateContentRequest {
    fn from(request: &ChatRequest) -> Self {
        let contents = request
            .messages
            .iter()
            .map(|m| Content {
                role: Some(m.role.clone()),
                parts: vec![Part {
                    text: Some(m.content.clone()),
                }],
            })
            .collect();

        Self { contents }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined in order.
    pub fn into_text(self) -> Result<String, String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err("response has no candidates".to_string());
        };

        let finish_reason = candidate.finish_reason;
        let texts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if texts.is_empty() {
            return Err(match finish_reason {
                Some(reason) => format!("candidates[0] has no text (finish reason: {})", reason),
                None => "candidates[0].content.parts has no text".to_string(),
            });
        }

        Ok(texts.concat())
    }
}

// predict wire format (text embeddings)

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest {
    pub instances: Vec<EmbeddingInstance>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingInstance {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<EmbeddingPrediction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingPrediction {
    #[serde(default)]
    pub embeddings: Option<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingValues {
    #[serde(default)]
    pub values: Option<Vec<f32>>,
}

impl PredictResponse {
    pub fn into_vector(self) -> Result<Vec<f32>, String> {
        let prediction = self
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| "predictions is empty".to_string())?;
        let embeddings = prediction
            .embeddings
            .ok_or_else(|| "predictions[0].embeddings missing".to_string())?;
        embeddings
            .values
            .ok_or_else(|| "predictions[0].embeddings.values missing".to_string())
    }
}
