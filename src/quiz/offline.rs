//! Bundled questions served when the remote generator is unavailable.

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::quiz::catalog::Category;
use crate::quiz::Question;

pub struct OfflineEntry {
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub correct_answer_index: usize,
    pub explanation: &'static str,
}

impl OfflineEntry {
    pub fn to_question(&self) -> Question {
        Question::new(
            self.question.to_string(),
            self.options.map(str::to_string),
            self.correct_answer_index,
            self.explanation.to_string(),
        )
    }
}

/// Pool used for categories that have no entries of their own.
pub const DEFAULT_CATEGORY: Category = Category::Tournaments;

static TOURNAMENTS: [OfflineEntry; 3] = [
    OfflineEntry {
        question: "Which country won the first World Cup in history in 1930?",
        options: ["Argentina", "Uruguay", "Brazil", "Italy"],
        correct_answer_index: 1,
        explanation: "Uruguay hosted the tournament and became the first champion after beating Argentina in the final.",
    },
    OfflineEntry {
        question: "Which club has won the most European Cups / Champions League titles?",
        options: ["AC Milan", "Bayern Munich", "Liverpool", "Real Madrid"],
        correct_answer_index: 3,
        explanation: "Real Madrid holds the record, including five consecutive titles between 1956 and 1960.",
    },
    OfflineEntry {
        question: "Which national team won the first European Championship in 1960?",
        options: ["Soviet Union", "Spain", "Yugoslavia", "France"],
        correct_answer_index: 0,
        explanation: "The Soviet Union beat Yugoslavia 2-1 after extra time in Paris.",
    },
];

static CURIOSITIES: [OfflineEntry; 2] = [
    OfflineEntry {
        question: "Which national team holds the record for most consecutive matches without losing?",
        options: ["Brazil", "Italy", "Spain", "Argentina"],
        correct_answer_index: 1,
        explanation: "Italy, under Roberto Mancini, went 37 matches unbeaten between 2018 and 2021.",
    },
    OfflineEntry {
        question: "What was unusual about the ball used in the 1930 World Cup final?",
        options: [
            "It was orange",
            "Each half used a different team's ball",
            "It had no laces",
            "It was made of rubber",
        ],
        correct_answer_index: 1,
        explanation: "Argentina and Uruguay could not agree, so each half was played with one side's ball.",
    },
];

static TRANSFERS: [OfflineEntry; 2] = [
    OfflineEntry {
        question: "Who was the first player to cost more than 100 million euros?",
        options: ["Cristiano Ronaldo", "Gareth Bale", "Neymar Jr.", "Paul Pogba"],
        correct_answer_index: 1,
        explanation: "Gareth Bale's move to Real Madrid was the first transfer to officially pass 100 million.",
    },
    OfflineEntry {
        question: "Which club paid a world-record 222 million euros for Neymar in 2017?",
        options: ["Manchester City", "Real Madrid", "Paris Saint-Germain", "Chelsea"],
        correct_answer_index: 2,
        explanation: "PSG triggered Neymar's release clause at Barcelona.",
    },
];

/// Entries for `category`, or the default pool when it has none.
pub fn pool_for(category: Category) -> &'static [OfflineEntry] {
    match category {
        Category::Tournaments => &TOURNAMENTS,
        Category::Curiosities => &CURIOSITIES,
        Category::Transfers => &TRANSFERS,
        _ => pool_for(DEFAULT_CATEGORY),
    }
}

/// Picks a random entry, preferring prompts not listed in `exclude`.
pub fn pick(category: Category, exclude: &[String]) -> Question {
    let pool = pool_for(category);
    let fresh = pool
        .iter()
        .filter(|entry| !exclude.iter().any(|seen| seen == entry.question))
        .collect::<Vec<_>>();

    let mut rng = thread_rng();
    let entry = if fresh.is_empty() {
        pool.choose(&mut rng)
    } else {
        fresh.choose(&mut rng).copied()
    };

    entry.unwrap_or(&TOURNAMENTS[0]).to_question()
}
