//! Interactive exercise runs.
//!
//! Each run fetches content from the server, walks the learner through the
//! session in the terminal and returns a [`ResultsReport`]. Countdowns tick
//! once a second alongside stdin.

use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use tokio::time::{interval_at, Interval};

use eduint_exercise::{
    format_clock, Advance, Countdown, ExerciseKind, GameOutcome, GameSession, GameType,
    ListeningSession, Module, QuizSession, ResultsReport, SpeakingPart, SpeakingSession, Tick,
    WritingSession, WritingTask, MOCK_TEST_SECONDS,
};

use crate::client::ApiClient;
use crate::console::{self, Console};

fn one_second_ticker() -> Interval {
    let period = Duration::from_secs(1);
    interval_at(tokio::time::Instant::now() + period, period)
}

fn elapsed_secs(started: Instant) -> u64 {
    started.elapsed().as_secs()
}

/// Announces remaining time at each minute and during the last ten seconds.
fn should_announce(remaining: u32) -> bool {
    remaining > 0 && (remaining % 60 == 0 || remaining <= 10)
}

// ============================================================================
// Quizzes
// ============================================================================

/// Common controls of the plain quiz and the listening quiz.
trait QuizControls {
    fn quiz(&self) -> &QuizSession;
    fn select(&mut self, option: &str) -> eduint_exercise::Result<()>;
    fn advance(&mut self) -> eduint_exercise::Result<Advance>;
    fn back(&mut self) -> eduint_exercise::Result<usize>;
    fn end(&mut self);
}

impl QuizControls for QuizSession {
    fn quiz(&self) -> &QuizSession {
        self
    }
    fn select(&mut self, option: &str) -> eduint_exercise::Result<()> {
        self.select_answer(option)
    }
    fn advance(&mut self) -> eduint_exercise::Result<Advance> {
        self.next()
    }
    fn back(&mut self) -> eduint_exercise::Result<usize> {
        self.previous()
    }
    fn end(&mut self) {
        self.finish();
    }
}

impl QuizControls for ListeningSession {
    fn quiz(&self) -> &QuizSession {
        ListeningSession::quiz(self)
    }
    fn select(&mut self, option: &str) -> eduint_exercise::Result<()> {
        self.select_answer(option)
    }
    fn advance(&mut self) -> eduint_exercise::Result<Advance> {
        self.next()
    }
    fn back(&mut self) -> eduint_exercise::Result<usize> {
        self.previous()
    }
    fn end(&mut self) {
        self.finish();
    }
}

fn show_current<Q: QuizControls>(session: &Q) {
    let quiz = session.quiz();
    println!();
    print!(
        "{}",
        console::render_question(
            quiz.current_index() + 1,
            quiz.len(),
            quiz.current_question(),
            quiz.selected(),
        )
    );
    println!("Answer with a letter, 'p' for previous, 'q' to finish.");
}

/// Handles one line of quiz input. Returns `true` once the quiz is over.
fn handle_quiz_input<Q: QuizControls>(session: &mut Q, input: &str) -> bool {
    match input {
        "q" | "quit" => {
            session.end();
            return true;
        }
        "p" | "prev" | "previous" => {
            if let Err(e) = session.back() {
                println!("{e}");
            }
        }
        "n" | "next" => match session.advance() {
            Ok(Advance::Finished) => return true,
            Ok(Advance::Moved(_)) => {}
            Err(e) => println!("{e}"),
        },
        _ => {
            let options = &session.quiz().current_question().options;
            let Some(option) = console::resolve_option(input, options).map(str::to_string) else {
                println!("'{input}' is not one of the options");
                return false;
            };
            if let Err(e) = session.select(&option) {
                println!("{e}");
                return false;
            }
            match session.advance() {
                Ok(Advance::Finished) => return true,
                Ok(Advance::Moved(_)) => {}
                Err(e) => println!("{e}"),
            }
        }
    }
    show_current(session);
    false
}

/// Runs a quiz to completion, optionally against a countdown.
async fn run_quiz<Q: QuizControls>(
    console: &mut Console,
    session: &mut Q,
    mut countdown: Option<Countdown>,
) -> anyhow::Result<()> {
    let mut ticker = one_second_ticker();
    show_current(session);
    loop {
        tokio::select! {
            line = console.next_line() => {
                let Some(line) = line? else {
                    session.end();
                    return Ok(());
                };
                if handle_quiz_input(session, &line) {
                    return Ok(());
                }
            }
            _ = ticker.tick(), if countdown.is_some() => {
                let Some(clock) = countdown.as_mut() else { continue };
                match clock.tick() {
                    Tick::Expired => {
                        println!("Time's up!");
                        session.end();
                        return Ok(());
                    }
                    Tick::Running(remaining) if should_announce(remaining) => {
                        println!("Time left: {}", format_clock(remaining));
                    }
                    Tick::Running(_) | Tick::Paused => {}
                }
            }
        }
    }
}

/// Practice questions for one module.
pub async fn practice(
    api: &ApiClient,
    console: &mut Console,
    module: Module,
    count: Option<u32>,
) -> anyhow::Result<ResultsReport> {
    println!("Generating {module} practice questions...");
    let questions = api.practice_questions(module, count).await?;
    let mut quiz = QuizSession::new(questions)?;
    run_quiz(console, &mut quiz, None).await?;
    Ok(ResultsReport::from_quiz(
        ExerciseKind::Practice,
        format!("{module} Practice"),
        &quiz,
    ))
}

/// Fifteen-question mock test against a fifteen-minute countdown.
pub async fn mock_test(api: &ApiClient, console: &mut Console) -> anyhow::Result<ResultsReport> {
    println!("Generating your mock test...");
    let questions = api.test_questions().await?;
    let mut quiz = QuizSession::new(questions)?;
    println!(
        "{} questions, {} on the clock.",
        quiz.len(),
        format_clock(MOCK_TEST_SECONDS)
    );
    run_quiz(console, &mut quiz, Some(Countdown::started(MOCK_TEST_SECONDS))).await?;
    Ok(ResultsReport::from_quiz(
        ExerciseKind::MockTest,
        "IELTS Mock Test",
        &quiz,
    ))
}

/// Listening exercise: play the transcript, then answer.
pub async fn listening(api: &ApiClient, console: &mut Console) -> anyhow::Result<ResultsReport> {
    println!("Generating listening content...");
    let content = api.listening_content().await?;
    let mut session = ListeningSession::new(content)?;

    println!("Press Enter to play the recording.");
    if console.next_line().await?.is_none() {
        bail!("Listening exercise cancelled");
    }
    session.play()?;
    println!();
    println!("{}", session.transcript());
    session.stop();

    run_quiz(console, &mut session, None).await?;
    Ok(ResultsReport::from_quiz(
        ExerciseKind::Listening,
        "Listening Practice",
        session.quiz(),
    ))
}

// ============================================================================
// Games
// ============================================================================

/// A mini-game: answer each round before its timer runs out.
pub async fn game(
    api: &ApiClient,
    console: &mut Console,
    game: GameType,
    count: Option<u32>,
) -> anyhow::Result<ResultsReport> {
    println!("Generating {game} rounds...");
    let items = api.game_content(game, count).await?;
    let started = Instant::now();
    let mut session = GameSession::new(game, items)?;
    let mut ticker = one_second_ticker();

    show_round(&session);
    while !session.is_over() {
        tokio::select! {
            line = console.next_line() => {
                let Some(line) = line? else { break };
                let options = &session.current_item().options;
                let Some(option) = console::resolve_option(&line, options).map(str::to_string) else {
                    println!("'{line}' is not one of the options");
                    continue;
                };
                match session.answer(&option)? {
                    GameOutcome::Correct { points, game_over } => {
                        println!("Correct! +{points}");
                        if !game_over {
                            show_round(&session);
                        }
                    }
                    GameOutcome::Wrong { penalty } => {
                        println!("Wrong answer, -{penalty}. Try again.");
                    }
                }
            }
            _ = ticker.tick() => {
                match session.tick() {
                    Tick::Expired => println!("Time's up!"),
                    Tick::Running(remaining) if remaining <= 5 => println!("{remaining}..."),
                    Tick::Running(_) | Tick::Paused => {}
                }
            }
        }
    }

    println!("Final score: {}", session.score());
    Ok(ResultsReport::from_game(&session, elapsed_secs(started)))
}

fn show_round(session: &GameSession) {
    println!();
    print!(
        "{}",
        console::render_round(
            session.round() + 1,
            session.rounds(),
            session.current_item(),
            session.time_left(),
            session.score(),
        )
    );
}

// ============================================================================
// Writing and Speaking
// ============================================================================

/// Essay practice with a countdown of the topic's time limit.
pub async fn writing(
    api: &ApiClient,
    console: &mut Console,
    task: WritingTask,
) -> anyhow::Result<ResultsReport> {
    println!("Generating a {task} topic...");
    let topic = api.writing_topic(task).await?;
    println!();
    println!("{}", topic.topic);
    if !topic.instructions.is_empty() {
        println!("{}", topic.instructions);
    }
    println!(
        "Write at least {} words in {} minutes. Finish with a line containing only /submit.",
        topic.word_limit, topic.time_limit
    );

    let started = Instant::now();
    let mut session = WritingSession::new(topic);
    let mut ticker = one_second_ticker();

    let words = loop {
        tokio::select! {
            line = console.next_line() => {
                let Some(line) = line? else {
                    bail!("Writing exercise cancelled");
                };
                if let Some(words) = handle_essay_input(&mut session, &line) {
                    break words;
                }
            }
            _ = ticker.tick() => {
                match session.tick() {
                    Tick::Expired => {
                        println!("Time's up! Finish your essay and type /submit.");
                    }
                    Tick::Running(remaining) if should_announce(remaining) => {
                        println!("Time left: {}", format_clock(remaining));
                    }
                    Tick::Running(_) | Tick::Paused => {}
                }
            }
        }
    };

    println!("Evaluating {words} words...");
    let evaluation = api
        .evaluate_writing(&session.topic().topic, session.essay(), task)
        .await?;
    session.record_evaluation(evaluation.clone());
    Ok(ResultsReport::from_writing(
        session.topic(),
        evaluation,
        elapsed_secs(started),
    ))
}

/// Handles one line of essay input. Returns the word count once `/submit`
/// passes validation.
fn handle_essay_input(session: &mut WritingSession, line: &str) -> Option<usize> {
    if line == "/submit" {
        match session.validate_submission() {
            Ok(words) => return Some(words),
            Err(e) => println!("{e}"),
        }
    } else {
        session.push_line(line);
    }
    None
}

/// Speaking practice. Each typed line stands in for a final recognition
/// result while recording.
pub async fn speaking(
    api: &ApiClient,
    console: &mut Console,
    part: SpeakingPart,
) -> anyhow::Result<ResultsReport> {
    println!("Generating a {part} topic...");
    let topic = api.speaking_topic(part).await?;
    println!();
    println!("{}", topic.topic);
    for prompt in topic.questions.iter().chain(&topic.prompts) {
        println!("  - {prompt}");
    }
    if !topic.instructions.is_empty() {
        println!("{}", topic.instructions);
    }
    println!("Commands: /record to start, /stop to stop, /submit to evaluate.");

    let started = Instant::now();
    let mut session = SpeakingSession::new(topic);

    let transcript = loop {
        let Some(line) = console.next_line().await? else {
            bail!("Speaking exercise cancelled");
        };
        match line.as_str() {
            "/record" => match session.start_recording() {
                Ok(()) => println!("Recording... speak now."),
                Err(e) => println!("{e}"),
            },
            "/stop" => match session.stop_recording() {
                Ok(()) => println!("Recording stopped."),
                Err(e) => println!("{e}"),
            },
            "/submit" => {
                if session.stop_recording().is_ok() {
                    println!("Recording stopped.");
                }
                match session.validate_submission() {
                    Ok(transcript) => break transcript.to_string(),
                    Err(e) => println!("{e}"),
                }
            }
            text => {
                if !session.push_recognition(text, true) {
                    println!("Type /record to start recording.");
                }
            }
        }
    };

    println!("Evaluating your response...");
    let evaluation = api
        .evaluate_speaking(&transcript, &session.topic().topic, part)
        .await
        .context("Speaking evaluation failed")?;
    session.record_evaluation(evaluation.clone());
    Ok(ResultsReport::from_speaking(
        session.topic(),
        evaluation,
        elapsed_secs(started),
    ))
}
