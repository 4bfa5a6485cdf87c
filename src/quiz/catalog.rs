//! Static tables: categories, subcategories and difficulty tiers.

/// Lives granted on the easiest tier.
const EASY_LIVES: u32 = 5;
const MEDIUM_LIVES: u32 = 3;
const HARD_LIVES: u32 = 1;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tournaments,
    Leagues,
    Legends,
    Clubs,
    Curiosities,
    Transfers,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Tournaments,
        Category::Leagues,
        Category::Legends,
        Category::Clubs,
        Category::Curiosities,
        Category::Transfers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Tournaments => "Major Tournaments",
            Category::Leagues => "European Leagues",
            Category::Legends => "Legends",
            Category::Clubs => "Clubs",
            Category::Curiosities => "Records & Oddities",
            Category::Transfers => "Transfers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Tournaments => "Elite international competitions.",
            Category::Leagues => "The strongest leagues in the world.",
            Category::Legends => "The greatest of all time.",
            Category::Clubs => "Stadiums and crests.",
            Category::Curiosities => "Crazy and impossible facts.",
            Category::Transfers => "Record fees and moves.",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Tournaments => "🏆",
            Category::Leagues => "🇪🇺",
            Category::Legends => "🐐",
            Category::Clubs => "🛡️",
            Category::Curiosities => "🌀",
            Category::Transfers => "💸",
        }
    }

    /// Menu label, also used to recognize the player's pick.
    pub fn label(&self) -> String {
        format!("{} {}", self.icon(), self.name())
    }

    pub fn from_label(text: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.label() == text)
    }

    /// Subcategories offered for this category, empty when it has none.
    pub fn sub_categories(&self) -> &'static [SubCategory] {
        match self {
            Category::Leagues => &LEAGUES,
            Category::Tournaments => &TOURNAMENTS,
            _ => &[],
        }
    }

    /// Natural-language description of the question domain.
    ///
    /// A subcategory only refines the topic when it belongs to this
    /// category; anything else falls back to the category-level text.
    pub fn topic(&self, sub: Option<SubCategory>) -> String {
        match (self, sub) {
            (Category::Leagues, Some(sub)) => match sub.league_name() {
                Some(league) => format!("football in {league}"),
                None => "football in the European leagues".to_string(),
            },
            (Category::Tournaments, Some(sub)) => match sub.tournament_name() {
                Some(tournament) => format!("history, records and facts of {tournament}"),
                None => "history, records and facts of the great football competitions"
                    .to_string(),
            },
            _ => self.domain().to_string(),
        }
    }

    fn domain(&self) -> &'static str {
        match self {
            Category::Tournaments => "major international and club tournaments",
            Category::Leagues => "the best football leagues in the world",
            Category::Legends => {
                "historic football legends (Pelé, Maradona, Cruyff, Zidane, etc.)"
            }
            Category::Clubs => "history, stadiums and facts of football clubs worldwide",
            Category::Curiosities => "strange records, bizarre facts and football curiosities",
            Category::Transfers => "the transfer market, historic deals and record moves",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubCategory {
    // Leagues
    Global,
    LaLiga,
    Premier,
    SerieA,
    Bundesliga,
    Ligue1,
    // Tournaments
    WorldCup,
    Euro,
    Champions,
    CopaAmerica,
    EuropaLeague,
    Libertadores,
    MixedTournaments,
}

const LEAGUES: [SubCategory; 6] = [
    SubCategory::Global,
    SubCategory::LaLiga,
    SubCategory::Premier,
    SubCategory::SerieA,
    SubCategory::Bundesliga,
    SubCategory::Ligue1,
];

const TOURNAMENTS: [SubCategory; 7] = [
    SubCategory::WorldCup,
    SubCategory::Euro,
    SubCategory::Champions,
    SubCategory::CopaAmerica,
    SubCategory::EuropaLeague,
    SubCategory::Libertadores,
    SubCategory::MixedTournaments,
];

impl SubCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SubCategory::Global => "European Mix",
            SubCategory::LaLiga => "LaLiga",
            SubCategory::Premier => "Premier League",
            SubCategory::SerieA => "Serie A",
            SubCategory::Bundesliga => "Bundesliga",
            SubCategory::Ligue1 => "Ligue 1",
            SubCategory::WorldCup => "World Cup",
            SubCategory::Euro => "Euro",
            SubCategory::Champions => "Champions League",
            SubCategory::CopaAmerica => "Copa América",
            SubCategory::EuropaLeague => "Europa League",
            SubCategory::Libertadores => "Libertadores",
            SubCategory::MixedTournaments => "Mixed Tournaments",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SubCategory::Global => "🌍",
            SubCategory::LaLiga => "🇪🇸",
            SubCategory::Premier => "🏴",
            SubCategory::SerieA => "🇮🇹",
            SubCategory::Bundesliga => "🇩🇪",
            SubCategory::Ligue1 => "🇫🇷",
            SubCategory::WorldCup => "🏆",
            SubCategory::Euro => "🇪🇺",
            SubCategory::Champions => "⭐",
            SubCategory::CopaAmerica => "🌎",
            SubCategory::EuropaLeague => "🟧",
            SubCategory::Libertadores => "⚔️",
            SubCategory::MixedTournaments => "🎲",
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.icon(), self.name())
    }

    pub fn from_label(category: Category, text: &str) -> Option<SubCategory> {
        category
            .sub_categories()
            .iter()
            .copied()
            .find(|s| s.label() == text)
    }

    fn league_name(&self) -> Option<&'static str> {
        match self {
            SubCategory::LaLiga => Some("the Spanish league (LaLiga)"),
            SubCategory::Premier => Some("the English Premier League"),
            SubCategory::SerieA => Some("the Italian Serie A"),
            SubCategory::Bundesliga => Some("the German Bundesliga"),
            SubCategory::Ligue1 => Some("the French Ligue 1"),
            SubCategory::Global => Some("the elite European leagues combined"),
            _ => None,
        }
    }

    fn tournament_name(&self) -> Option<&'static str> {
        match self {
            SubCategory::WorldCup => Some("the FIFA World Cup"),
            SubCategory::Euro => Some("the UEFA European Championship"),
            SubCategory::Champions => Some("the UEFA Champions League"),
            SubCategory::CopaAmerica => Some("the CONMEBOL Copa América"),
            SubCategory::EuropaLeague => Some("the UEFA Europa League"),
            SubCategory::Libertadores => Some("the Copa Libertadores"),
            SubCategory::MixedTournaments => Some(
                "a varied mix of the biggest tournaments (World Cup, Euro, Champions League, Europa League and Libertadores)",
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lives a match starts with on this tier.
    pub fn lives(&self) -> u32 {
        match self {
            Difficulty::Easy => EASY_LIVES,
            Difficulty::Medium => MEDIUM_LIVES,
            Difficulty::Hard => HARD_LIVES,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Amateur",
            Difficulty::Medium => "Professional",
            Difficulty::Hard => "Legend",
        }
    }

    pub fn label(&self) -> String {
        let lives = self.lives();
        let noun = if lives == 1 { "life" } else { "lives" };
        format!("{} ({lives} {noun})", self.name())
    }

    pub fn from_label(text: &str) -> Option<Difficulty> {
        Self::ALL.into_iter().find(|d| d.label() == text)
    }

    /// Knowledge level the generator should aim for.
    pub fn calibration_hint(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY: facts known by casual fans.",
            Difficulty::Medium => "MEDIUM: facts for regular football followers.",
            Difficulty::Hard => {
                "HARD: obscure facts, rare statistics or old history for experts."
            }
        }
    }
}
