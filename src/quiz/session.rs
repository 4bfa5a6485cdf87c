//! Match orchestration: the facade the front end drives.
//!
//! Every fetch is issued through a [`FetchTicket`] stamped with the session
//! generation. `restart` and `start_match` bump the generation, so a
//! question that arrives for an abandoned match is dropped in `deliver`.

use std::collections::VecDeque;

use log::{debug, info};

use crate::quiz::catalog::{Category, Difficulty, SubCategory};
use crate::quiz::match_state::{AnswerOutcome, MatchState};
use crate::quiz::source::{QuestionSource, EXCLUDE_HINT_LEN};
use crate::quiz::Question;

/// Prompts remembered per match.
pub const RECENT_LOG_LEN: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecentQuestionLog {
    prompts: VecDeque<String>,
}

impl RecentQuestionLog {
    pub fn push(&mut self, prompt: String) {
        self.prompts.push_back(prompt);
        while self.prompts.len() > RECENT_LOG_LEN {
            self.prompts.pop_front();
        }
    }

    /// The last `n` prompts, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let skip = self.prompts.len().saturating_sub(n);
        self.prompts.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn clear(&mut self) {
        self.prompts.clear();
    }
}

/// A pending question request bound to the match it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub category: Category,
    pub sub_category: Option<SubCategory>,
    pub difficulty: Difficulty,
    pub exclude: Vec<String>,
}

impl FetchTicket {
    pub async fn fetch(&self, source: &QuestionSource) -> Question {
        source
            .fetch_question(
                self.category,
                self.sub_category,
                self.difficulty,
                &self.exclude,
            )
            .await
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Session {
    state: Option<MatchState>,
    question: Option<Question>,
    answer: Option<usize>,
    loading: bool,
    recent: RecentQuestionLog,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn answer(&self) -> Option<usize> {
        self.answer
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn recent(&self) -> &RecentQuestionLog {
        &self.recent
    }

    pub fn is_over(&self) -> bool {
        self.state.as_ref().is_some_and(MatchState::game_over)
    }

    pub async fn begin_match(
        &mut self,
        source: &QuestionSource,
        category: Category,
        difficulty: Difficulty,
        sub_category: Option<SubCategory>,
    ) {
        let ticket = self.start_match(category, difficulty, sub_category);
        let question = ticket.fetch(source).await;
        self.deliver(&ticket, question);
    }

    /// Resets to a fresh match and returns the ticket for its first question.
    pub fn start_match(
        &mut self,
        category: Category,
        difficulty: Difficulty,
        sub_category: Option<SubCategory>,
    ) -> FetchTicket {
        info!(
            "Starting match: {:?}/{:?} on {:?}",
            category, sub_category, difficulty
        );
        let state = MatchState::start(difficulty, category, sub_category);
        self.question = None;
        self.answer = None;
        self.recent.clear();
        self.generation += 1;
        self.loading = true;
        let ticket = self.ticket(&state);
        self.state = Some(state);
        ticket
    }

    /// No-op while loading, without a question, once answered or after the
    /// final whistle.
    pub fn submit_answer(&mut self, index: usize) -> Option<AnswerOutcome> {
        if self.loading || self.answer.is_some() {
            return None;
        }
        let question = self.question.as_ref()?;
        let before = self.state.as_ref().filter(|s| !s.game_over())?;

        let after = before.apply_answer(index, question.correct_index);
        let outcome = AnswerOutcome::between(before, &after);
        debug!("Answer {} -> {:?}", index, outcome);

        self.answer = Some(index);
        self.state = Some(after);
        outcome
    }

    pub async fn advance(&mut self, source: &QuestionSource) {
        if let Some(ticket) = self.next_round() {
            let question = ticket.fetch(source).await;
            self.deliver(&ticket, question);
        }
    }

    /// Moves to the next round, `None` when there is no live match.
    pub fn next_round(&mut self) -> Option<FetchTicket> {
        let state = self
            .state
            .as_ref()
            .filter(|s| !s.game_over())?
            .advance_round();
        self.answer = None;
        self.question = None;
        self.loading = true;
        let ticket = self.ticket(&state);
        self.state = Some(state);
        Some(ticket)
    }

    /// Stores a fetched question; stale tickets are discarded.
    pub fn deliver(&mut self, ticket: &FetchTicket, question: Question) -> bool {
        if ticket.generation != self.generation || self.state.is_none() {
            debug!(
                "Discarding question for generation {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.recent.push(question.prompt.clone());
        self.question = Some(question);
        self.loading = false;
        true
    }

    pub fn restart(&mut self) {
        self.state = None;
        self.question = None;
        self.answer = None;
        self.loading = false;
        self.recent.clear();
        self.generation += 1;
    }

    fn ticket(&self, state: &MatchState) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            category: state.category,
            sub_category: state.sub_category,
            difficulty: state.difficulty,
            exclude: self.recent.recent(EXCLUDE_HINT_LEN),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::quiz::match_state::MatchPhase;
    use crate::quiz::source::{FetchError, QuestionGenerator, QuestionRequest};

    /// Numbered questions whose correct answer is always option 0.
    #[derive(Default)]
    struct Scripted {
        served: Mutex<u32>,
        requests: Mutex<Vec<QuestionRequest>>,
    }

    #[async_trait]
    impl QuestionGenerator for Arc<Scripted> {
        async fn generate(&self, request: &QuestionRequest) -> Result<Question, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut served = self.served.lock().unwrap();
            *served += 1;
            Ok(Question::new(
                format!("q{}", *served),
                ["a", "b", "c", "d"].map(str::to_string),
                0,
                String::new(),
            ))
        }
    }

    fn scripted() -> (Arc<Scripted>, QuestionSource) {
        let script = Arc::new(Scripted::default());
        let source =
            QuestionSource::with_generator(Box::new(script.clone()), Duration::from_secs(1));
        (script, source)
    }

    async fn started(difficulty: Difficulty) -> (Arc<Scripted>, QuestionSource, Session) {
        let (script, source) = scripted();
        let mut session = Session::new();
        session
            .begin_match(&source, Category::Legends, difficulty, None)
            .await;
        (script, source, session)
    }

    #[test]
    fn test_log_keeps_last_twenty() {
        let mut log = RecentQuestionLog::default();
        for i in 1..=25 {
            log.push(format!("q{i}"));
        }
        assert_eq!(log.len(), RECENT_LOG_LEN);
        assert_eq!(log.recent(1), vec!["q25"]);
        assert_eq!(log.recent(100).first().map(String::as_str), Some("q6"));
        assert_eq!(log.recent(5), vec!["q21", "q22", "q23", "q24", "q25"]);
    }

    #[tokio::test]
    async fn test_begin_match_serves_first_question() {
        let (_, _, session) = started(Difficulty::Easy).await;
        let state = session.state().unwrap();
        assert_eq!(state.question_number, 1);
        assert_eq!(state.lives, 5);
        assert_eq!(session.question().unwrap().prompt, "q1");
        assert!(!session.is_loading());
        assert_eq!(session.recent().recent(20), vec!["q1"]);
    }

    #[tokio::test]
    async fn test_submit_answer_once_per_question() {
        let (_, _, mut session) = started(Difficulty::Easy).await;
        assert_eq!(
            session.submit_answer(0),
            Some(AnswerOutcome::Correct { streak: 1 })
        );
        assert_eq!(session.answer(), Some(0));
        assert_eq!(session.submit_answer(1), None);
        assert_eq!(session.state().unwrap().correct_in_stage, 1);
        assert_eq!(session.state().unwrap().lives, 5);
    }

    #[tokio::test]
    async fn test_submit_answer_does_not_fetch() {
        let (script, _, mut session) = started(Difficulty::Easy).await;
        session.submit_answer(2);
        assert_eq!(script.requests.lock().unwrap().len(), 1);
        assert_eq!(session.question().unwrap().prompt, "q1");
    }

    #[tokio::test]
    async fn test_submit_without_match_is_ignored() {
        let mut session = Session::new();
        assert_eq!(session.submit_answer(0), None);
        assert!(session.state().is_none());
    }

    #[tokio::test]
    async fn test_advance_fetches_next_question() {
        let (_, source, mut session) = started(Difficulty::Easy).await;
        session.submit_answer(0);
        session.advance(&source).await;

        assert_eq!(session.state().unwrap().question_number, 2);
        assert_eq!(session.answer(), None);
        assert_eq!(session.question().unwrap().prompt, "q2");
        assert_eq!(session.recent().recent(20), vec!["q1", "q2"]);
    }

    #[tokio::test]
    async fn test_full_win_through_session() {
        let (_, source, mut session) = started(Difficulty::Easy).await;
        let mut last = None;
        for _ in 0..25 {
            last = session.submit_answer(0);
            session.advance(&source).await;
        }
        assert_eq!(last, Some(AnswerOutcome::Victory));
        let state = session.state().unwrap();
        assert_eq!(state.goals_for, 5);
        assert_eq!(state.phase, MatchPhase::Won);
        assert!(session.is_over());
    }

    #[tokio::test]
    async fn test_advance_after_game_over_is_noop() {
        let (script, source, mut session) = started(Difficulty::Hard).await;
        assert_eq!(session.submit_answer(3), Some(AnswerOutcome::Defeat));
        assert!(session.is_over());

        session.advance(&source).await;
        assert_eq!(session.state().unwrap().question_number, 1);
        assert_eq!(session.question().unwrap().prompt, "q1");
        assert_eq!(script.requests.lock().unwrap().len(), 1);
        assert_eq!(session.submit_answer(0), None);
    }

    #[tokio::test]
    async fn test_exclude_hint_is_last_five_of_twenty() {
        let (script, source, mut session) = started(Difficulty::Easy).await;
        // 21 correct answers: four goals, still in progress
        for _ in 0..21 {
            session.submit_answer(0);
            session.advance(&source).await;
        }
        assert!(!session.is_over());
        assert_eq!(session.recent().len(), RECENT_LOG_LEN);

        let requests = script.requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.avoid, vec!["q17", "q18", "q19", "q20", "q21"]);
        assert_eq!(requests[0].avoid, Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_restart_clears_everything() {
        let (_, _, mut session) = started(Difficulty::Medium).await;
        session.submit_answer(0);
        session.restart();

        assert!(session.state().is_none());
        assert!(session.question().is_none());
        assert!(session.answer().is_none());
        assert!(!session.is_loading());
        assert!(session.recent().is_empty());
    }

    #[test]
    fn test_stale_fetch_after_restart_is_discarded() {
        let mut session = Session::new();
        let stale = session.start_match(Category::Clubs, Difficulty::Easy, None);
        assert!(session.is_loading());
        session.restart();

        let question = Question::new(
            "late".to_string(),
            ["a", "b", "c", "d"].map(str::to_string),
            0,
            String::new(),
        );
        assert!(!session.deliver(&stale, question.clone()));
        assert!(session.question().is_none());

        let fresh = session.start_match(Category::Transfers, Difficulty::Hard, None);
        assert!(!session.deliver(&stale, question.clone()));
        assert!(session.is_loading());
        assert!(session.deliver(&fresh, question));
        assert_eq!(session.question().unwrap().prompt, "late");
        assert!(!session.is_loading());
    }

    #[test]
    fn test_answers_ignored_while_loading() {
        let mut session = Session::new();
        let ticket = session.start_match(Category::Clubs, Difficulty::Easy, None);
        assert_eq!(session.submit_answer(0), None);
        assert_eq!(ticket.exclude, Vec::<String>::new());
        assert!(session.next_round().is_some());
        assert_eq!(session.state().unwrap().question_number, 2);
    }

    #[test]
    fn test_tickets_follow_the_match_settings() {
        let mut session = Session::new();
        assert!(session.next_round().is_none());

        let first = session.start_match(
            Category::Leagues,
            Difficulty::Hard,
            Some(SubCategory::SerieA),
        );
        assert_eq!(first.category, Category::Leagues);
        assert_eq!(first.sub_category, Some(SubCategory::SerieA));
        assert_eq!(first.difficulty, Difficulty::Hard);

        let next = session.next_round().unwrap();
        assert_eq!(next.generation, first.generation);
        assert_eq!(next.category, Category::Leagues);
        assert_eq!(next.sub_category, Some(SubCategory::SerieA));
        assert_eq!(next.difficulty, Difficulty::Hard);
    }

    #[tokio::test]
    async fn test_offline_session_plays() {
        let source = QuestionSource::offline();
        let mut session = Session::new();
        session
            .begin_match(&source, Category::Curiosities, Difficulty::Medium, None)
            .await;
        let correct = session.question().unwrap().correct_index;
        assert!(session.submit_answer(correct).unwrap().was_correct());
    }
}
