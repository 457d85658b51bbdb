//! Static menu tables: languages, topics and their subtopics.
//!
//! Every table is an exhaustive match, so adding a language or a menu entry
//! without its translations fails to compile.

/// Conversation language, chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Ru,
}

impl Language {
    #[cfg(test)]
    pub const ALL: [Language; 2] = [Language::En, Language::Ru];

    /// Interpret the answer to the language prompt. Anything that doesn't
    /// mention Russian falls back to English.
    pub fn from_choice(text: &str) -> Self {
        if text.contains("Русский") || text.contains("Russian") {
            Language::Ru
        } else {
            Language::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

/// Buttons offered on the language prompt.
pub const LANGUAGE_BUTTONS: [&str; 2] = ["🇺🇸 English", "🇷🇺 Русский"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    About,
    Technology,
    Community,
    GetStarted,
}

impl Topic {
    /// Main menu order.
    pub const ALL: [Topic; 4] = [Topic::About, Topic::Technology, Topic::Community, Topic::GetStarted];

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Topic::About, Language::En) => "🤖 About Qubic",
            (Topic::About, Language::Ru) => "🤖 О Qubic",
            (Topic::Technology, Language::En) => "⚡ Technology",
            (Topic::Technology, Language::Ru) => "⚡ Технологии",
            (Topic::Community, Language::En) => "🌍 Community",
            (Topic::Community, Language::Ru) => "🌍 Сообщество",
            (Topic::GetStarted, Language::En) => "🚀 Get Started",
            (Topic::GetStarted, Language::Ru) => "🚀 Начать",
        }
    }

    pub fn subtopics(self) -> &'static [Subtopic] {
        match self {
            Topic::About => &[Subtopic::WhatIsQubic, Subtopic::ProjectVision, Subtopic::KeyFeatures],
            Topic::Technology => &[Subtopic::UsefulProofOfWork, Subtopic::AigarthAi, Subtopic::QuorumConsensus],
            Topic::Community => &[Subtopic::JoinCommunity, Subtopic::Resources, Subtopic::Development],
            Topic::GetStarted => &[Subtopic::HowToBegin, Subtopic::MiningGuide, Subtopic::DeveloperDocs],
        }
    }

    /// Look up a topic by its label in `language` only.
    pub fn from_label(language: Language, text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label(language) == text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtopic {
    WhatIsQubic,
    ProjectVision,
    KeyFeatures,
    UsefulProofOfWork,
    AigarthAi,
    QuorumConsensus,
    JoinCommunity,
    Resources,
    Development,
    HowToBegin,
    MiningGuide,
    DeveloperDocs,
}

impl Subtopic {
    pub fn label(self, language: Language) -> &'static str {
        use Language::{En, Ru};
        match (self, language) {
            (Subtopic::WhatIsQubic, En) => "What is Qubic?",
            (Subtopic::WhatIsQubic, Ru) => "Что такое Qubic?",
            (Subtopic::ProjectVision, En) => "Project Vision",
            (Subtopic::ProjectVision, Ru) => "Видение проекта",
            (Subtopic::KeyFeatures, En) => "Key Features",
            (Subtopic::KeyFeatures, Ru) => "Ключевые особенности",
            (Subtopic::UsefulProofOfWork, _) => "Useful Proof of Work",
            (Subtopic::AigarthAi, En) => "Aigarth AI",
            (Subtopic::AigarthAi, Ru) => "ИИ Aigarth",
            (Subtopic::QuorumConsensus, En) => "Quorum Consensus",
            (Subtopic::QuorumConsensus, Ru) => "Консенсус Quorum",
            (Subtopic::JoinCommunity, En) => "Join Community",
            (Subtopic::JoinCommunity, Ru) => "Присоединиться",
            (Subtopic::Resources, En) => "Resources",
            (Subtopic::Resources, Ru) => "Ресурсы",
            (Subtopic::Development, En) => "Development",
            (Subtopic::Development, Ru) => "Разработка",
            (Subtopic::HowToBegin, En) => "How to Begin",
            (Subtopic::HowToBegin, Ru) => "Как начать",
            (Subtopic::MiningGuide, En) => "Mining Guide",
            (Subtopic::MiningGuide, Ru) => "Гайд по майнингу",
            (Subtopic::DeveloperDocs, En) => "Developer Docs",
            (Subtopic::DeveloperDocs, Ru) => "Документация",
        }
    }

    /// Look up a subtopic of `topic` by its label in `language`.
    pub fn from_label(topic: Topic, language: Language, text: &str) -> Option<Self> {
        topic.subtopics().iter().copied().find(|s| s.label(language) == text)
    }
}
