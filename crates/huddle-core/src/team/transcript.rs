use serde::{Deserialize, Serialize};

/// Closed set of tags attached to session messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Analysis,
    Plan,
    Implementation,
    Review,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Analysis => "analysis",
            Category::Plan => "plan",
            Category::Implementation => "implementation",
            Category::Review => "review",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One produced contribution. Fields are private so a message cannot change
/// after it has been appended.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMessage {
    agent: String,
    text: String,
    produced_at: i64,
    category: Option<Category>,
}

impl TeamMessage {
    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Epoch milliseconds.
    pub fn produced_at(&self) -> i64 {
        self.produced_at
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }
}

/// Append-only record of one session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<TeamMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current time, never earlier than the
    /// previous entry.
    pub fn append(
        &mut self,
        agent: impl Into<String>,
        text: impl Into<String>,
        category: Option<Category>,
    ) -> &TeamMessage {
        self.append_at(agent, text, category, chrono::Utc::now().timestamp_millis())
    }

    pub fn append_at(
        &mut self,
        agent: impl Into<String>,
        text: impl Into<String>,
        category: Option<Category>,
        timestamp: i64,
    ) -> &TeamMessage {
        let floor = self.messages.last().map_or(i64::MIN, |m| m.produced_at);
        self.messages.push(TeamMessage {
            agent: agent.into(),
            text: text.into(),
            produced_at: timestamp.max(floor),
            category,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// `"{agent}: {text}"` per entry, entries separated by a blank line.
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.agent, m.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn messages(&self) -> &[TeamMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&TeamMessage> {
        self.messages.last()
    }
}
