//! Dialogue controller: language choice → main menu → topic detail.
//!
//! The controller only decides what to say and how the session moves. Sending
//! messages is left to the caller, and the model call is split out into
//! [`Dialogue::answer`] so no session lock is held while waiting on it.

use tracing::debug;

use crate::assistant::answer::{AnswerGenerator, AnswerRequest, Question};
use crate::assistant::catalog::{LANGUAGE_BUTTONS, Language, Subtopic, Topic};
use crate::assistant::fallback::fallback;
use crate::assistant::phrases::{GREETING, Phrase};
use crate::assistant::session::{DialogueState, Session};

/// A reply keyboard, one `Vec` per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
    /// Hide the keyboard after one press.
    pub one_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// Leave whatever keyboard the user currently has.
    Keep,
    Keyboard(Keyboard),
    Remove,
}

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub markup: Markup,
}

impl Reply {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Keep,
        }
    }

    fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Keyboard(keyboard),
        }
    }
}

/// Result of feeding one text message to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Replies(Vec<Reply>),
    /// The user picked something that needs the model.
    Answer(AnswerRequest),
}

pub fn language_keyboard() -> Keyboard {
    Keyboard {
        rows: vec![LANGUAGE_BUTTONS.iter().map(|b| b.to_string()).collect()],
        one_time: true,
    }
}

pub fn main_menu_keyboard(language: Language) -> Keyboard {
    let mut rows: Vec<Vec<String>> = Topic::ALL.iter().map(|t| vec![t.label(language).to_string()]).collect();
    rows.push(vec![Phrase::Restart.text(language).to_string()]);
    Keyboard { rows, one_time: false }
}

pub fn topic_keyboard(language: Language, topic: Topic) -> Keyboard {
    let mut rows: Vec<Vec<String>> = topic
        .subtopics()
        .iter()
        .map(|s| vec![s.label(language).to_string()])
        .collect();
    rows.push(vec![Phrase::BackToMain.text(language).to_string()]);
    rows.push(vec![Phrase::Restart.text(language).to_string()]);
    Keyboard { rows, one_time: false }
}

pub struct Dialogue {
    generator: AnswerGenerator,
}

impl Dialogue {
    pub fn new(generator: AnswerGenerator) -> Self {
        Self { generator }
    }

    /// Opening message. The caller is expected to start a fresh session.
    pub fn start(&self) -> Vec<Reply> {
        vec![Reply::with_keyboard(GREETING, language_keyboard())]
    }

    pub fn step(&self, session: &mut Session, text: &str) -> Step {
        let text = text.trim();

        match session.state() {
            DialogueState::AwaitingLanguage => {
                let language = Language::from_choice(text);
                debug!("Language chosen: {}", language.code());
                session.set_state(DialogueState::MainMenu { language });
                let mut replies = vec![Reply::plain(Phrase::Welcome.text(language))];
                replies.push(main_menu(language));
                Step::Replies(replies)
            }
            DialogueState::MainMenu { language } => {
                if text == Phrase::Restart.text(language) {
                    return Step::Replies(self.restart(session, language));
                }
                match Topic::from_label(language, text) {
                    Some(topic) => {
                        session.set_state(DialogueState::TopicDetail { language, topic });
                        Step::Replies(vec![Reply::with_keyboard(
                            Phrase::SubtopicPrompt.text(language),
                            topic_keyboard(language, topic),
                        )])
                    }
                    None => Step::Replies(vec![Reply::plain(Phrase::Error.text(language)), main_menu(language)]),
                }
            }
            DialogueState::TopicDetail { language, topic } => {
                if text == Phrase::Restart.text(language) {
                    return Step::Replies(self.restart(session, language));
                }
                if text == Phrase::BackToMain.text(language) {
                    session.set_state(DialogueState::MainMenu { language });
                    return Step::Replies(vec![main_menu(language)]);
                }
                let question = match Subtopic::from_label(topic, language, text) {
                    Some(sub) => Question::Subtopic(sub),
                    None => Question::Free(text.to_string()),
                };
                Step::Answer(AnswerRequest {
                    language,
                    topic,
                    question,
                })
            }
        }
    }

    fn restart(&self, session: &mut Session, language: Language) -> Vec<Reply> {
        session.reset();
        let mut replies = vec![Reply::plain(Phrase::Restarting.text(language))];
        replies.extend(self.start());
        replies
    }

    /// Shown while the model is working; the caller removes it afterwards.
    pub fn pending_notice(&self, request: &AnswerRequest) -> Reply {
        Reply::plain(Phrase::WaitGeneration.text(request.language))
    }

    /// Generate the answer, substituting canned text when the model fails.
    pub async fn answer(&self, request: &AnswerRequest) -> Reply {
        let text = match self.generator.generate(request).await {
            Some(text) => text,
            None => fallback_text(request).to_string(),
        };
        Reply::with_keyboard(text, topic_keyboard(request.language, request.topic))
    }

    /// Goodbye message for `/cancel`. The caller drops the session.
    pub fn cancel(&self, language: Option<Language>) -> Reply {
        let language = language.unwrap_or(Language::En);
        Reply {
            text: Phrase::Farewell.text(language).to_string(),
            markup: Markup::Remove,
        }
    }
}

fn main_menu(language: Language) -> Reply {
    Reply::with_keyboard(Phrase::MainMenuPrompt.text(language), main_menu_keyboard(language))
}

fn fallback_text(request: &AnswerRequest) -> &'static str {
    match request.question {
        Question::Subtopic(sub) => fallback(request.language, sub),
        Question::Free(_) => None,
    }
    .unwrap_or_else(|| Phrase::Error.text(request.language))
}
