//! Localized UI phrases.

use crate::assistant::catalog::Language;

/// Greeting shown before a language is chosen.
pub const GREETING: &str =
    "👋 Hello! I'm Anna, your intelligent assistant for the Qubic project!\n\nPlease choose your preferred language:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    MainMenuPrompt,
    SubtopicPrompt,
    BackToMain,
    Restart,
    WaitGeneration,
    Welcome,
    Error,
    Restarting,
    Farewell,
}

impl Phrase {
    pub fn text(self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                Phrase::MainMenuPrompt => "Please choose a topic to explore:",
                Phrase::SubtopicPrompt => "What would you like to know about this topic?",
                Phrase::BackToMain => "🔙 Back to Main Menu",
                Phrase::Restart => "🔄 Restart",
                Phrase::WaitGeneration => "🔄 Generating response...",
                Phrase::Welcome => "Hello! I'm Anna, your intelligent assistant for the Qubic project!",
                Phrase::Error => "Sorry, I encountered an error. Please try again.",
                Phrase::Restarting => "🔄 Restarting conversation...",
                Phrase::Farewell => "Thank you for chatting with me! Use /start to begin again.",
            },
            Language::Ru => match self {
                Phrase::MainMenuPrompt => "Выберите тему для изучения:",
                Phrase::SubtopicPrompt => "Что бы вы хотели узнать по этой теме?",
                Phrase::BackToMain => "🔙 Назад в меню",
                Phrase::Restart => "🔄 Начать заново",
                Phrase::WaitGeneration => "🔄 Генерирую ответ...",
                Phrase::Welcome => "Привет! Я Анна, ваш интеллектуальный помощник по проекту Qubic!",
                Phrase::Error => "Извините, произошла ошибка. Пожалуйста, попробуйте снова.",
                Phrase::Restarting => "🔄 Перезапускаю разговор...",
                Phrase::Farewell => "Спасибо за беседу! Используйте /start чтобы начать снова.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_phrases_differ_from_topics() {
        use crate::assistant::catalog::Topic;
        for language in Language::ALL {
            for phrase in [Phrase::Restart, Phrase::BackToMain] {
                assert!(Topic::from_label(language, phrase.text(language)).is_none());
            }
            assert_ne!(Phrase::Restart.text(language), Phrase::BackToMain.text(language));
        }
    }

    #[test]
    fn test_farewell_mentions_start() {
        for language in Language::ALL {
            assert!(Phrase::Farewell.text(language).contains("/start"));
        }
    }
}
