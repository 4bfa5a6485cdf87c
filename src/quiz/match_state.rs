use log::warn;

use crate::quiz::catalog::{Category, Difficulty, SubCategory};

/// Correct answers in a row needed to score a goal.
pub const ANSWERS_PER_GOAL: u32 = 5;
/// Goals needed to win the match.
pub const GOALS_TO_WIN: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MatchPhase {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchState {
    pub goals_for: u32,
    pub goals_against: u32,
    /// Streak toward the next goal, always below `ANSWERS_PER_GOAL`.
    pub correct_in_stage: u32,
    pub lives: u32,
    pub max_lives: u32,
    /// 1-based number of the question on screen.
    pub question_number: u32,
    pub category: Category,
    pub sub_category: Option<SubCategory>,
    pub difficulty: Difficulty,
    pub phase: MatchPhase,
}

impl MatchState {
    pub fn start(
        difficulty: Difficulty,
        category: Category,
        sub_category: Option<SubCategory>,
    ) -> Self {
        let lives = difficulty.lives();
        Self {
            goals_for: 0,
            goals_against: 0,
            correct_in_stage: 0,
            lives,
            max_lives: lives,
            question_number: 1,
            category,
            sub_category,
            difficulty,
            phase: MatchPhase::InProgress,
        }
    }

    pub fn game_over(&self) -> bool {
        self.phase != MatchPhase::InProgress
    }

    /// Applies one answer and returns the resulting state.
    ///
    /// A terminal state is returned unchanged.
    pub fn apply_answer(&self, chosen_index: usize, correct_index: usize) -> MatchState {
        if self.game_over() {
            warn!(
                "Answer {} ignored, match already finished ({:?})",
                chosen_index, self.phase
            );
            return self.clone();
        }

        let mut next = self.clone();
        if chosen_index == correct_index {
            next.correct_in_stage += 1;
            if next.correct_in_stage == ANSWERS_PER_GOAL {
                next.correct_in_stage = 0;
                next.goals_for += 1;
                if next.goals_for == GOALS_TO_WIN {
                    next.phase = MatchPhase::Won;
                }
            }
        } else {
            next.goals_against += 1;
            next.lives = next.lives.saturating_sub(1);
            if next.lives == 0 {
                next.phase = MatchPhase::Lost;
            }
        }
        next
    }

    pub fn advance_round(&self) -> MatchState {
        if self.game_over() {
            warn!("Advance ignored, match already finished ({:?})", self.phase);
            return self.clone();
        }
        MatchState {
            question_number: self.question_number + 1,
            ..self.clone()
        }
    }
}

/// What a single answer did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct { streak: u32 },
    Goal { goals_for: u32 },
    Victory,
    Conceded { lives_left: u32 },
    Defeat,
}

impl AnswerOutcome {
    /// Classifies the transition `before -> after`, `None` if nothing moved.
    pub fn between(before: &MatchState, after: &MatchState) -> Option<AnswerOutcome> {
        match after.phase {
            MatchPhase::Won if !before.game_over() => return Some(AnswerOutcome::Victory),
            MatchPhase::Lost if !before.game_over() => return Some(AnswerOutcome::Defeat),
            _ => {}
        }
        if after.goals_for > before.goals_for {
            Some(AnswerOutcome::Goal {
                goals_for: after.goals_for,
            })
        } else if after.goals_against > before.goals_against {
            Some(AnswerOutcome::Conceded {
                lives_left: after.lives,
            })
        } else if after.correct_in_stage > before.correct_in_stage {
            Some(AnswerOutcome::Correct {
                streak: after.correct_in_stage,
            })
        } else {
            None
        }
    }

    pub fn was_correct(&self) -> bool {
        matches!(
            self,
            AnswerOutcome::Correct { .. } | AnswerOutcome::Goal { .. } | AnswerOutcome::Victory
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy() -> MatchState {
        MatchState::start(Difficulty::Easy, Category::Legends, None)
    }

    fn answer_correctly(state: MatchState, times: usize) -> MatchState {
        (0..times).fold(state, |s, _| s.apply_answer(2, 2))
    }

    #[test]
    fn test_start_uses_difficulty_lives() {
        let state = MatchState::start(
            Difficulty::Medium,
            Category::Leagues,
            Some(SubCategory::SerieA),
        );
        assert_eq!(state.lives, 3);
        assert_eq!(state.max_lives, 3);
        assert_eq!(state.question_number, 1);
        assert_eq!(state.goals_for, 0);
        assert_eq!(state.goals_against, 0);
        assert_eq!(state.correct_in_stage, 0);
        assert_eq!(state.sub_category, Some(SubCategory::SerieA));
        assert_eq!(state.phase, MatchPhase::InProgress);
        assert!(!state.game_over());
    }

    #[test]
    fn test_five_correct_score_a_goal() {
        let state = answer_correctly(easy(), 5);
        assert_eq!(state.goals_for, 1);
        assert_eq!(state.correct_in_stage, 0);
        assert!(!state.game_over());
    }

    #[test]
    fn test_streak_cycles_and_goals_only_every_fifth() {
        let mut state = easy();
        for n in 1..=24u32 {
            state = state.apply_answer(0, 0);
            assert_eq!(state.correct_in_stage, n % 5);
            assert_eq!(state.goals_for, n / 5);
            assert!(state.correct_in_stage < ANSWERS_PER_GOAL);
        }
        assert!(!state.game_over());
    }

    #[test]
    fn test_twenty_five_correct_win() {
        let state = answer_correctly(easy(), 25);
        assert_eq!(state.goals_for, 5);
        assert_eq!(state.phase, MatchPhase::Won);
        assert!(state.game_over());
    }

    #[test]
    fn test_wrong_answers_cost_lives() {
        let mut state = easy();
        for n in 1..=4u32 {
            state = state.apply_answer(0, 1);
            assert_eq!(state.lives, 5 - n);
            assert_eq!(state.goals_against, n);
            assert!(!state.game_over());
        }
        state = state.apply_answer(3, 1);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, MatchPhase::Lost);
    }

    #[test]
    fn test_hard_single_mistake_loses() {
        let state = MatchState::start(Difficulty::Hard, Category::Clubs, None).apply_answer(0, 3);
        assert_eq!(state.lives, 0);
        assert_eq!(state.goals_against, 1);
        assert!(state.game_over());
        assert_eq!(state.phase, MatchPhase::Lost);
    }

    #[test]
    fn test_wrong_answer_keeps_streak() {
        let state = answer_correctly(easy(), 3).apply_answer(1, 0);
        assert_eq!(state.correct_in_stage, 3);
        assert_eq!(state.goals_for, 0);
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let lost = MatchState::start(Difficulty::Hard, Category::Clubs, None).apply_answer(0, 1);
        assert_eq!(lost.apply_answer(1, 1), lost);
        assert_eq!(lost.apply_answer(0, 1), lost);
        assert_eq!(lost.advance_round(), lost);

        let won = answer_correctly(easy(), 25);
        assert_eq!(won.apply_answer(0, 1), won);
        assert_eq!(won.advance_round().question_number, won.question_number);
    }

    #[test]
    fn test_advance_round_only_bumps_question_number() {
        let state = answer_correctly(easy(), 3);
        let next = state.advance_round();
        assert_eq!(next.question_number, 2);
        assert_eq!(
            MatchState {
                question_number: 1,
                ..next
            },
            state
        );
    }

    #[test]
    fn test_outcome_classification() {
        let start = easy();
        let one = start.apply_answer(1, 1);
        assert_eq!(
            AnswerOutcome::between(&start, &one),
            Some(AnswerOutcome::Correct { streak: 1 })
        );

        let four = answer_correctly(easy(), 4);
        let goal = four.apply_answer(1, 1);
        assert_eq!(
            AnswerOutcome::between(&four, &goal),
            Some(AnswerOutcome::Goal { goals_for: 1 })
        );

        let miss = start.apply_answer(0, 1);
        assert_eq!(
            AnswerOutcome::between(&start, &miss),
            Some(AnswerOutcome::Conceded { lives_left: 4 })
        );

        let almost = answer_correctly(easy(), 24);
        let won = almost.apply_answer(2, 2);
        assert_eq!(AnswerOutcome::between(&almost, &won), Some(AnswerOutcome::Victory));
        assert_eq!(AnswerOutcome::between(&won, &won), None);

        let hard = MatchState::start(Difficulty::Hard, Category::Clubs, None);
        let lost = hard.apply_answer(0, 1);
        assert_eq!(AnswerOutcome::between(&hard, &lost), Some(AnswerOutcome::Defeat));
        assert!(!AnswerOutcome::Defeat.was_correct());
        assert!(AnswerOutcome::Victory.was_correct());
    }
}
