//! Answer generation: prompt building and the model call.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info};

use crate::assistant::catalog::{Language, Subtopic, Topic};
use crate::deepseek;

/// Something that turns a system instruction and a prompt into text.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, deepseek::Error>;
}

#[async_trait]
impl CompletionSource for deepseek::Client {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, deepseek::Error> {
        deepseek::Client::complete(self, system, prompt).await
    }
}

/// What the user asked inside a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// A button from the topic keyboard.
    Subtopic(Subtopic),
    /// Anything typed by hand.
    Free(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRequest {
    pub language: Language,
    pub topic: Topic,
    pub question: Question,
}

impl AnswerRequest {
    fn question_text(&self) -> &str {
        match &self.question {
            Question::Subtopic(sub) => sub.label(self.language),
            Question::Free(text) => text,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Topic: {}. Question: {}. Provide detailed but concise information about this aspect of Qubic project.",
            self.topic.label(self.language),
            self.question_text()
        )
    }
}

pub fn system_instruction(language: Language) -> &'static str {
    match language {
        Language::En => {
            "You are Anna, a helpful assistant for Qubic project. Provide clear, engaging answers about Qubic's decentralized AI platform, Useful Proof of Work, Aigarth AI, and related technologies. Keep responses informative but concise. Respond in English."
        }
        Language::Ru => {
            "Ты Анна, помощник проекта Qubic. Давай четкие и увлекательные ответы о децентрализованной платформе ИИ Qubic, Useful Proof of Work, ИИ Aigarth и связанных технологиях. Будь информативной, но лаконичной. Отвечай на русском."
        }
    }
}

pub struct AnswerGenerator {
    source: Arc<dyn CompletionSource>,
}

impl AnswerGenerator {
    pub fn new(source: Arc<dyn CompletionSource>) -> Self {
        Self { source }
    }

    /// Ask the model. `None` means the call failed; the error is logged here
    /// and never shown to the user.
    pub async fn generate(&self, request: &AnswerRequest) -> Option<String> {
        let started = Instant::now();
        let prompt = request.prompt();

        match self.source.complete(system_instruction(request.language), &prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(
                    "🧠 Answered \"{}\" [{}] in {}ms",
                    request.question_text(),
                    request.language.code(),
                    started.elapsed().as_millis()
                );
                Some(text)
            }
            Ok(_) => {
                error!("Model returned an empty answer for \"{}\"", request.question_text());
                None
            }
            Err(e) => {
                error!(
                    "Model call failed for {:?} / \"{}\" [{}]: {e}",
                    request.topic,
                    request.question_text(),
                    request.language.code()
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records calls and replays a canned result.
    struct Recorder {
        result: Result<String, ()>,
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl CompletionSource for Recorder {
        async fn complete(&self, system: &str, prompt: &str) -> Result<String, deepseek::Error> {
            self.calls.lock().unwrap().push((system.to_string(), prompt.to_string()));
            self.result.clone().map_err(|_| deepseek::Error::Http("connection refused".into()))
        }
    }

    fn recorder(result: Result<&str, ()>) -> Arc<Recorder> {
        Arc::new(Recorder {
            result: result.map(str::to_string),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn request(language: Language, question: Question) -> AnswerRequest {
        AnswerRequest {
            language,
            topic: Topic::About,
            question,
        }
    }

    #[test]
    fn test_prompt_embeds_topic_and_subtopic() {
        let req = request(Language::En, Question::Subtopic(Subtopic::WhatIsQubic));
        assert_eq!(
            req.prompt(),
            "Topic: 🤖 About Qubic. Question: What is Qubic?. Provide detailed but concise information about this aspect of Qubic project."
        );
    }

    #[test]
    fn test_prompt_uses_session_language_labels() {
        let req = request(Language::Ru, Question::Subtopic(Subtopic::KeyFeatures));
        let prompt = req.prompt();
        assert!(prompt.contains("Topic: 🤖 О Qubic."));
        assert!(prompt.contains("Question: Ключевые особенности."));
    }

    #[test]
    fn test_prompt_free_question() {
        let req = request(Language::En, Question::Free("who founded it".into()));
        assert!(req.prompt().contains("Question: who founded it."));
    }

    #[test]
    fn test_system_instruction_language() {
        assert!(system_instruction(Language::En).ends_with("Respond in English."));
        assert!(system_instruction(Language::Ru).ends_with("Отвечай на русском."));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let source = recorder(Ok("Qubic is a platform."));
        let generator = AnswerGenerator::new(source.clone());
        let req = request(Language::Ru, Question::Subtopic(Subtopic::WhatIsQubic));

        assert_eq!(generator.generate(&req).await.as_deref(), Some("Qubic is a platform."));

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, system_instruction(Language::Ru));
        assert_eq!(calls[0].1, req.prompt());
    }

    #[tokio::test]
    async fn test_generate_failure_is_none() {
        let generator = AnswerGenerator::new(recorder(Err(())));
        let req = request(Language::En, Question::Subtopic(Subtopic::WhatIsQubic));
        assert_eq!(generator.generate(&req).await, None);
    }

    #[tokio::test]
    async fn test_generate_blank_is_none() {
        let generator = AnswerGenerator::new(recorder(Ok("  \n")));
        let req = request(Language::En, Question::Subtopic(Subtopic::WhatIsQubic));
        assert_eq!(generator.generate(&req).await, None);
    }

    #[tokio::test]
    async fn test_no_caching_between_calls() {
        let source = recorder(Ok("answer"));
        let generator = AnswerGenerator::new(source.clone());
        let req = request(Language::En, Question::Subtopic(Subtopic::WhatIsQubic));
        generator.generate(&req).await;
        generator.generate(&req).await;
        assert_eq!(source.calls.lock().unwrap().len(), 2);
    }
}
