use std::time::Duration;

use async_trait::async_trait;
use derive_more::{Display, Error};
use log::{debug, info, warn};

use crate::quiz::catalog::{Category, Difficulty, SubCategory};
use crate::quiz::{offline, Question, OPTION_COUNT};

/// Most recent prompts forwarded to the generator as an avoidance hint.
pub const EXCLUDE_HINT_LEN: usize = 5;

/// Why a remote attempt produced no question.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum FetchError {
    #[display("remote request failed: {message}")]
    Request { message: String },
    #[display("remote request timed out after {secs}s")]
    Timeout { secs: u64 },
    #[display("malformed question payload: {reason}")]
    Malformed { reason: String },
}

impl FetchError {
    pub fn request(message: impl ToString) -> Self {
        Self::Request {
            message: message.to_string(),
        }
    }

    pub fn malformed(reason: impl ToString) -> Self {
        Self::Malformed {
            reason: reason.to_string(),
        }
    }
}

/// Everything a generator needs to write one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub topic: String,
    pub difficulty_hint: &'static str,
    /// Prompts to steer away from, oldest first.
    pub avoid: Vec<String>,
}

impl QuestionRequest {
    pub fn new(
        category: Category,
        sub_category: Option<SubCategory>,
        difficulty: Difficulty,
        exclude: &[String],
    ) -> Self {
        let skip = exclude.len().saturating_sub(EXCLUDE_HINT_LEN);
        Self {
            topic: category.topic(sub_category),
            difficulty_hint: difficulty.calibration_hint(),
            avoid: exclude[skip..].to_vec(),
        }
    }

    /// User message sent to the model.
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Question about {}. Difficulty level: {}",
            self.topic, self.difficulty_hint
        );
        if !self.avoid.is_empty() {
            prompt.push_str(&format!(
                " Avoid these exact questions: {}",
                self.avoid.join(", ")
            ));
        }
        prompt
    }
}

/// A remote service able to write quiz questions.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, request: &QuestionRequest) -> Result<Question, FetchError>;
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemotePayload {
    question: String,
    options: Vec<String>,
    correct_answer_index: i64,
    explanation: String,
}

impl TryFrom<RemotePayload> for Question {
    type Error = FetchError;

    fn try_from(payload: RemotePayload) -> Result<Self, Self::Error> {
        if payload.question.trim().is_empty() {
            return Err(FetchError::malformed("empty question"));
        }
        let count = payload.options.len();
        let options: [String; OPTION_COUNT] = payload
            .options
            .try_into()
            .map_err(|_| FetchError::malformed(format!("expected 4 options, got {count}")))?;
        let correct_index = usize::try_from(payload.correct_answer_index)
            .ok()
            .filter(|i| *i < OPTION_COUNT)
            .ok_or_else(|| {
                FetchError::malformed(format!(
                    "correct answer index {} out of range",
                    payload.correct_answer_index
                ))
            })?;
        Ok(Question::new(
            payload.question,
            options,
            correct_index,
            payload.explanation,
        ))
    }
}

/// Parses the model's reply, tolerating a Markdown code fence around it.
pub fn parse_payload(text: &str) -> Result<Question, FetchError> {
    let body = text.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(body)
        .trim();

    let payload: RemotePayload =
        serde_json::from_str(body).map_err(FetchError::malformed)?;
    Question::try_from(payload)
}

/// Serves one question per call, remote first, offline pool on any failure.
pub struct QuestionSource {
    generator: Option<Box<dyn QuestionGenerator>>,
    timeout: Duration,
}

impl QuestionSource {
    pub fn offline() -> Self {
        Self {
            generator: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_generator(generator: Box<dyn QuestionGenerator>, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            timeout,
        }
    }

    pub fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    /// Never fails: a broken remote call degrades to bundled content.
    pub async fn fetch_question(
        &self,
        category: Category,
        sub_category: Option<SubCategory>,
        difficulty: Difficulty,
        exclude: &[String],
    ) -> Question {
        let Some(generator) = &self.generator else {
            debug!("No generator configured, serving offline {:?}", category);
            return offline::pick(category, exclude);
        };

        let request = QuestionRequest::new(category, sub_category, difficulty, exclude);
        match self.try_remote(generator.as_ref(), &request).await {
            Ok(question) => {
                info!("Generated question: {:?}", question.prompt);
                question
            }
            Err(e) => {
                warn!("Falling back to offline {:?} pool: {}", category, e);
                offline::pick(category, exclude)
            }
        }
    }

    async fn try_remote(
        &self,
        generator: &dyn QuestionGenerator,
        request: &QuestionRequest,
    ) -> Result<Question, FetchError> {
        tokio::time::timeout(self.timeout, generator.generate(request))
            .await
            .map_err(|_| FetchError::Timeout {
                secs: self.timeout.as_secs(),
            })?
    }
}
