pub mod ai_helper;
pub mod catalog;
pub mod match_state;
pub mod offline;
pub mod session;
pub mod source;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    pub explanation: String,
}

impl Question {
    pub fn new(
        prompt: String,
        options: [String; OPTION_COUNT],
        correct_index: usize,
        explanation: String,
    ) -> Self {
        Self {
            prompt,
            options,
            correct_index,
            explanation,
        }
    }

    pub fn correct_option(&self) -> &str {
        // correct_index is validated on every construction path
        self.options
            .get(self.correct_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Keyboard labels, "1. Uruguay" and so on.
    pub fn option_labels(&self) -> Vec<String> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}. {}", i + 1, option))
            .collect()
    }

    /// Maps a player's reply to an option index.
    ///
    /// Accepts the bare number, the keyboard label or the option text. A
    /// number outside 1..=4 is matched against the option texts instead.
    pub fn parse_choice(&self, text: &str) -> Option<usize> {
        let text = text.trim();
        if let Some(n) = text
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=OPTION_COUNT).contains(n))
        {
            return Some(n - 1);
        }
        if let Some(i) = self.option_labels().iter().position(|l| l == text) {
            return Some(i);
        }
        self.options
            .iter()
            .position(|o| o.eq_ignore_ascii_case(text))
    }
}
