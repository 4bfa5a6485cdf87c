use std::time::Duration;

use async_trait::async_trait;
use chatgpt::config::ChatGPTEngine;
use chatgpt::prelude::*;
use chatgpt::types::CompletionResponse;
use log::debug;

use crate::quiz::source::{parse_payload, FetchError, QuestionGenerator, QuestionRequest};
use crate::quiz::Question;

const SYSTEM_PROMPT: &str = "You are an expert historian of world football. Generate unique and challenging trivia questions.
GOLDEN RULE: Do not repeat obvious questions. Reply with JSON only, an object with the fields \"question\" (string), \"options\" (array of exactly 4 strings), \"correctAnswerIndex\" (integer 0-3) and \"explanation\" (string).";

/// Writes questions through ChatGPT.
pub struct QuizHelper {
    chat_gpt: ChatGPT,
}

impl QuizHelper {
    pub fn new(chat_gpt: ChatGPT) -> Self {
        Self { chat_gpt }
    }

    /// The HTTP client reads its timeout once, when it is built.
    pub fn connect(api_key: &str, engine: &str, timeout: Duration) -> Result<Self> {
        let gpt = ChatGPT::new_with_config(api_key, model_config(engine, timeout)?)?;

        Ok(Self::new(gpt))
    }
}

pub fn model_config(engine: &str, timeout: Duration) -> Result<ModelConfiguration> {
    ModelConfigurationBuilder::default()
        .engine(engine_from_name(engine))
        .timeout(timeout)
        .build()
        .map_err(|e| chatgpt::err::Error::ParsingError(e.to_string()))
}

/// Unknown names fall back to GPT-3.5 Turbo.
pub fn engine_from_name(name: &str) -> ChatGPTEngine {
    match name.trim() {
        "gpt-4" => ChatGPTEngine::Gpt4,
        "gpt-4-32k" => ChatGPTEngine::Gpt4_32k,
        _ => ChatGPTEngine::Gpt35Turbo,
    }
}

#[async_trait]
impl QuestionGenerator for QuizHelper {
    async fn generate(&self, request: &QuestionRequest) -> std::result::Result<Question, FetchError> {
        let prompt = request.prompt();
        debug!("Requesting question: {:?}", prompt);

        let mut conversation = self.chat_gpt.new_conversation_directed(SYSTEM_PROMPT);
        let response: CompletionResponse = conversation
            .send_message(prompt)
            .await
            .map_err(FetchError::request)?;
        let content = response.message().clone().content;

        debug!("Completion: {:?}", content);

        parse_payload(&content)
    }
}
