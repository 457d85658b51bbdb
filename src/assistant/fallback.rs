//! Canned answers used when the model can't be reached.

use crate::assistant::catalog::{Language, Subtopic};

pub fn fallback(language: Language, subtopic: Subtopic) -> Option<&'static str> {
    use Language::{En, Ru};
    let text = match (subtopic, language) {
        (Subtopic::WhatIsQubic, En) => {
            "🤖 **Qubic** is a decentralized platform for creating Artificial General Intelligence (AGI) that uses Useful Proof of Work instead of wasteful computations."
        }
        (Subtopic::WhatIsQubic, Ru) => {
            "🤖 **Qubic** - это децентрализованная платформа для создания искусственного общего интеллекта (AGI), использующая Useful Proof of Work вместо бесполезных вычислений."
        }
        (Subtopic::UsefulProofOfWork, En) => {
            "⚡ **Useful Proof of Work (uPoW)** is an innovative consensus mechanism that performs meaningful computations instead of energy-wasting mining operations."
        }
        (Subtopic::UsefulProofOfWork, Ru) => {
            "⚡ **Useful Proof of Work (uPoW)** - это инновационный механизм консенсуса, который выполняет полезные вычисления вместо энергозатратного майнинга."
        }
        (Subtopic::AigarthAi, En) => {
            "🧠 **Aigarth** is the advanced artificial intelligence system developed by the Qubic project, designed to operate in a decentralized environment."
        }
        (Subtopic::AigarthAi, Ru) => {
            "🧠 **Aigarth** - это продвинутая система искусственного интеллекта, разработанная проектом Qubic для работы в децентрализованной среде."
        }
        (Subtopic::JoinCommunity, En) => {
            "🌍 Join our growing community! Connect with developers and enthusiasts through our Telegram groups and Discord server."
        }
        (Subtopic::JoinCommunity, Ru) => {
            "🌍 Присоединяйтесь к нашему растущему сообществу! Общайтесь с разработчиками и энтузиастами через наши группы в Telegram и Discord."
        }
        _ => return None,
    };
    Some(text)
}
