use serde::{Deserialize, Serialize};

/// Instruction wrapped around every question. `{question}` is replaced verbatim.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are a knowledgeable and helpful assistant. \
Answer the following question clearly, concisely and professionally. \
If the question is about a study topic, give detailed but understandable explanations. \
Do not write formulas in markdown. \
If the answer is too long, split it into several messages of at most 120 characters each. \
Do not make the messages overly short when you split, and try not to exceed 5 messages in total. \
If a single message is enough, send just one. \
The main topic of the questions is General Topology, but you must answer anything.\n\n\
Question: {question}\n\n\
Answer:";

/// Substitutes the question into the template.
pub fn build_prompt(template: &str, question: &str) -> String {
    template.replace("{question}", question)
}

/// A model answer, already split into chat-sized parts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub parts: Vec<String>,
}

impl Answer {
    /// Drops blank parts and trims the rest.
    pub fn new(parts: Vec<String>) -> Self {
        Self {
            parts: parts
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The whole answer as one string, parts separated by blank lines.
    pub fn text(&self) -> String {
        self.parts.join("\n\n")
    }

    /// Chat messages for forwarding: the question first, then each part,
    /// numbered when there is more than one.
    pub fn forward_messages(&self, question: &str) -> Vec<String> {
        let mut messages = Vec::with_capacity(self.parts.len() + 1);
        messages.push(format!("Question: {question}"));
        match self.parts.as_slice() {
            [single] => messages.push(format!("AI answer:\n{single}")),
            parts => {
                let total = parts.len();
                for (i, part) in parts.iter().enumerate() {
                    messages.push(format!("AI answer (part {}/{}):\n{}", i + 1, total, part));
                }
            }
        }
        messages
    }
}
