mod config;
mod quiz;
mod scoreboard;

use std::sync::{Arc, Mutex};

use config::Config;
use dotenv::dotenv;
use log::{info, warn};
use quiz::{
    ai_helper::QuizHelper,
    catalog::{Category, Difficulty, SubCategory},
    match_state::{AnswerOutcome, MatchPhase, MatchState, ANSWERS_PER_GOAL, GOALS_TO_WIN},
    session::Session,
    source::QuestionSource,
};
use scoreboard::ScoreBoard;
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type QuizStorage = std::sync::Arc<ErasedStorage<State>>;
type Scores = Arc<Mutex<ScoreBoard>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveCategory,
    ReceiveSubCategory {
        category: Category,
    },
    ReceiveDifficulty {
        category: Category,
        sub_category: Option<SubCategory>,
    },
    Playing {
        session: Session,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    pretty_env_logger::init();
    log::info!("Starting football trivia bot...");

    let config = Config::from_env();
    let bot = Bot::from_env();

    info!("Opening dialogue storage at {}", config.db_path.display());
    let storage: QuizStorage = SqliteStorage::open(&config.db_path.to_string_lossy(), Json)
        .await?
        .erase();

    let source = Arc::new(question_source(&config));
    info!("Remote question generation enabled: {}", source.is_online());
    let scores: Scores = Arc::new(Mutex::new(ScoreBoard::load_or_empty(&config.scores_path)));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::filter(|msg: Message| msg.text() == Some(HELP_COMMAND)).endpoint(help))
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveCategory].endpoint(receive_category))
            .branch(
                dptree::case![State::ReceiveSubCategory { category }]
                    .endpoint(receive_sub_category),
            )
            .branch(
                dptree::case![State::ReceiveDifficulty {
                    category,
                    sub_category
                }]
                .endpoint(receive_difficulty),
            )
            .branch(dptree::case![State::Playing { session }].endpoint(playing)),
    )
    .dependencies(dptree::deps![storage, source, scores])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

fn question_source(config: &Config) -> QuestionSource {
    let Some(api_key) = &config.chatgpt_api_key else {
        info!("CHATGPT_API_KEY is not set, serving offline questions");
        return QuestionSource::offline();
    };

    match QuizHelper::connect(api_key, &config.chatgpt_engine, config.request_timeout) {
        Ok(helper) => {
            info!("Generating questions with {}", config.chatgpt_engine);
            QuestionSource::with_generator(Box::new(helper), config.request_timeout)
        }
        Err(e) => {
            warn!("Unable to set up ChatGPT ({}), serving offline questions", e);
            QuestionSource::offline()
        }
    }
}

const HELP_COMMAND: &str = "/help";
const BACK_BUTTON: &str = "⬅️ Back";
const NEXT_BUTTON: &str = "Next question ➡️";
const RESTART_BUTTON: &str = "🔄 Restart";
const PLAY_AGAIN_BUTTON: &str = "Play again";

const GREETING_TEXT: &str = "Hi! I'm the football trivia bot. Answer questions, score goals, and don't run out of lives!";
const RULES_TEXT: &str = "How to play:
• Every 5 correct answers in a row you score a goal.
• Every wrong answer concedes a goal and costs a life.
• Score 5 goals to win. Run out of lives and you lose.
• Amateur gives you 5 lives, Professional 3 and Legend just 1.
Answer with the buttons or by sending 1-4.";

async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, RULES_TEXT).await?;
    Ok(())
}

async fn start(bot: Bot, dialogue: QuizDialogue, scores: Scores, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    show_categories(&bot, &dialogue, &scores, msg.chat.id).await
}

async fn show_categories(
    bot: &Bot,
    dialogue: &QuizDialogue,
    scores: &Scores,
    chat_id: ChatId,
) -> HandlerResult {
    let keyboard = KeyboardMarkup::new(
        Category::ALL
            .chunks(2)
            .map(|row| row.iter().map(|c| KeyboardButton::new(c.label())).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    );

    bot.send_message(chat_id, category_menu_text(scores))
        .reply_markup(keyboard)
        .await?;

    dialogue.update(State::ReceiveCategory).await?;
    Ok(())
}

fn category_menu_text(scores: &Scores) -> String {
    let mut text = String::from("Pick a category:");
    let Ok(board) = scores.lock() else {
        warn!("Score table lock poisoned");
        return text;
    };
    for category in Category::ALL {
        let best = board
            .best(category)
            .map(|goals| format!("best {goals}"))
            .unwrap_or_else(|| "not played yet".to_string());
        text.push_str(&format!(
            "\n{}: {} ({})",
            category.label(),
            category.description(),
            best
        ));
    }
    text
}

async fn receive_category(
    bot: Bot,
    dialogue: QuizDialogue,
    scores: Scores,
    msg: Message,
) -> HandlerResult {
    let Some(category) = msg.text().and_then(Category::from_label) else {
        bot.send_message(msg.chat.id, "Please pick one of the categories")
            .await?;
        return show_categories(&bot, &dialogue, &scores, msg.chat.id).await;
    };

    if category.sub_categories().is_empty() {
        return show_difficulties(&bot, &dialogue, msg.chat.id, category, None).await;
    }
    show_sub_categories(&bot, &dialogue, msg.chat.id, category).await
}

async fn show_sub_categories(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat_id: ChatId,
    category: Category,
) -> HandlerResult {
    let mut rows = category
        .sub_categories()
        .chunks(2)
        .map(|row| row.iter().map(|s| KeyboardButton::new(s.label())).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    rows.push(vec![KeyboardButton::new(BACK_BUTTON)]);

    bot.send_message(chat_id, format!("{}: which one?", category.name()))
        .reply_markup(KeyboardMarkup::new(rows))
        .await?;

    dialogue
        .update(State::ReceiveSubCategory { category })
        .await?;
    Ok(())
}

async fn receive_sub_category(
    bot: Bot,
    dialogue: QuizDialogue,
    category: Category,
    scores: Scores,
    msg: Message,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    if text == BACK_BUTTON {
        return show_categories(&bot, &dialogue, &scores, msg.chat.id).await;
    }

    match SubCategory::from_label(category, text) {
        Some(sub) => show_difficulties(&bot, &dialogue, msg.chat.id, category, Some(sub)).await,
        None => {
            bot.send_message(msg.chat.id, "Please pick one of the options")
                .await?;
            Ok(())
        }
    }
}

async fn show_difficulties(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat_id: ChatId,
    category: Category,
    sub_category: Option<SubCategory>,
) -> HandlerResult {
    let mut rows = Difficulty::ALL
        .iter()
        .map(|d| vec![KeyboardButton::new(d.label())])
        .collect::<Vec<_>>();
    rows.push(vec![KeyboardButton::new(BACK_BUTTON)]);

    bot.send_message(chat_id, "Choose your difficulty")
        .reply_markup(KeyboardMarkup::new(rows))
        .await?;

    dialogue
        .update(State::ReceiveDifficulty {
            category,
            sub_category,
        })
        .await?;
    Ok(())
}

async fn receive_difficulty(
    bot: Bot,
    dialogue: QuizDialogue,
    (category, sub_category): (Category, Option<SubCategory>),
    source: Arc<QuestionSource>,
    scores: Scores,
    msg: Message,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    if text == BACK_BUTTON {
        if sub_category.is_some() {
            return show_sub_categories(&bot, &dialogue, msg.chat.id, category).await;
        }
        return show_categories(&bot, &dialogue, &scores, msg.chat.id).await;
    }

    let Some(difficulty) = Difficulty::from_label(text) else {
        bot.send_message(msg.chat.id, "Please pick a difficulty")
            .await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, "Kick-off! ⚽").await?;
    // The indicator is cosmetic, a failure here is not worth surfacing
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let mut session = Session::new();
    session
        .begin_match(&source, category, difficulty, sub_category)
        .await;

    send_question(&bot, msg.chat.id, &session).await?;
    dialogue.update(State::Playing { session }).await?;
    Ok(())
}

async fn playing(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: Session,
    source: Arc<QuestionSource>,
    scores: Scores,
    msg: Message,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();

    if text == RESTART_BUTTON || text == PLAY_AGAIN_BUTTON {
        session.restart();
        return show_categories(&bot, &dialogue, &scores, msg.chat.id).await;
    }

    if session.is_over() {
        bot.send_message(msg.chat.id, "The match is over.")
            .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(
                PLAY_AGAIN_BUTTON,
            )]]))
            .await?;
        return Ok(());
    }

    if session.answer().is_some() {
        if text != NEXT_BUTTON {
            bot.send_message(msg.chat.id, "Press \"Next question\" to continue")
                .await?;
            return Ok(());
        }
        let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
        session.advance(&source).await;
        send_question(&bot, msg.chat.id, &session).await?;
        dialogue.update(State::Playing { session }).await?;
        return Ok(());
    }

    let Some(question) = session.question().cloned() else {
        bot.send_message(msg.chat.id, "Still warming up, try again in a moment")
            .await?;
        return Ok(());
    };
    let Some(choice) = question.parse_choice(text) else {
        bot.send_message(msg.chat.id, "Answer with one of the options (1-4)")
            .await?;
        return Ok(());
    };
    let Some(outcome) = session.submit_answer(choice) else {
        return Ok(());
    };

    let mut reply = outcome_text(outcome, question.correct_option());
    if !question.explanation.is_empty() {
        reply.push_str(&format!("\n\n{}", question.explanation));
    }

    let keyboard = match session.state().filter(|s| s.game_over()) {
        Some(state) => {
            let new_best = record_result(&scores, state);
            reply.push_str(&format!("\n\n{}", final_text(state, new_best)));
            KeyboardMarkup::new(vec![vec![KeyboardButton::new(PLAY_AGAIN_BUTTON)]])
        }
        None => KeyboardMarkup::new(vec![
            vec![KeyboardButton::new(NEXT_BUTTON)],
            vec![KeyboardButton::new(RESTART_BUTTON)],
        ]),
    };

    bot.send_message(msg.chat.id, reply)
        .reply_markup(keyboard)
        .await?;

    dialogue.update(State::Playing { session }).await?;
    Ok(())
}

async fn send_question(bot: &Bot, chat_id: ChatId, session: &Session) -> HandlerResult {
    let (Some(state), Some(question)) = (session.state(), session.question()) else {
        return Ok(());
    };

    let text = format!(
        "Question #{}\n{}\n\n{}",
        state.question_number,
        scoreline(state),
        question.prompt
    );

    let mut rows = question
        .option_labels()
        .into_iter()
        .map(|label| vec![KeyboardButton::new(label)])
        .collect::<Vec<_>>();
    rows.push(vec![KeyboardButton::new(RESTART_BUTTON)]);

    bot.send_message(chat_id, text)
        .reply_markup(KeyboardMarkup::new(rows))
        .await?;
    Ok(())
}

fn scoreline(state: &MatchState) -> String {
    format!(
        "⚽ {} - {} | ❤️ {}/{} | Next goal: {}/{}",
        state.goals_for,
        state.goals_against,
        state.lives,
        state.max_lives,
        state.correct_in_stage,
        ANSWERS_PER_GOAL
    )
}

fn outcome_text(outcome: AnswerOutcome, correct_option: &str) -> String {
    match outcome {
        AnswerOutcome::Correct { streak } => {
            format!("✅ Correct! {streak}/{ANSWERS_PER_GOAL} towards the next goal.")
        }
        AnswerOutcome::Goal { goals_for } => {
            format!("⚽ GOAL! That's {goals_for}/{GOALS_TO_WIN}.")
        }
        AnswerOutcome::Victory => "🏆 GOAL! That's the fifth one, you win the match!".to_string(),
        AnswerOutcome::Conceded { lives_left } => format!(
            "❌ Wrong! The answer was {correct_option}. Lives left: {lives_left}."
        ),
        AnswerOutcome::Defeat => format!(
            "❌ Wrong! The answer was {correct_option}. No lives left."
        ),
    }
}

fn final_text(state: &MatchState, new_best: bool) -> String {
    let headline = match state.phase {
        MatchPhase::Won => "Full time: victory!",
        _ => "Full time: defeat.",
    };
    let mut text = format!(
        "{headline} Final score {} - {}.",
        state.goals_for, state.goals_against
    );
    if new_best {
        text.push_str(&format!(" New best for {}!", state.category.name()));
    }
    text
}

/// Returns whether the finished match set a new best worth announcing.
fn record_result(scores: &Scores, state: &MatchState) -> bool {
    let Ok(mut board) = scores.lock() else {
        warn!("Score table lock poisoned, result not recorded");
        return false;
    };
    match board.record(state.category, state.goals_for) {
        Ok(new_best) => new_best,
        Err(e) => {
            warn!("Unable to save best scores: {}", e);
            false
        }
    }
}
