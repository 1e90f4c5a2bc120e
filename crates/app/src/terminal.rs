//! Line-based front end: one question per screen, answers typed as y/n.

use quiz_core::QuizStep;
use quiz_core::summary::format_best_game;
use services::{AppServices, ErrorReport, GameReport, QuizLoopError, QuizUpdate};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Question,
    Waiting,
    Results,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Yes,
    No,
    Empty,
    Quit,
    Other,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Self::Yes,
            "n" | "no" => Self::No,
            "" => Self::Empty,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Other,
        }
    }
}

fn show_step(step: &QuizStep) -> Screen {
    println!();
    println!("Question {}", step.counter);
    println!("[poster: {} bytes]", step.image.len());
    println!("{}", step.text);
    println!("Answer y/n (q to quit):");
    Screen::Question
}

fn show_report(report: &GameReport) -> Screen {
    println!();
    println!("{}", report.title);
    println!("{}", report.summary);
    println!("{}? [Y/n]", report.button_text);
    Screen::Results
}

fn show_error(err: &QuizLoopError) -> Screen {
    log::warn!("{err}");
    let report = ErrorReport::from_error(err);
    println!();
    println!("{}: {}", report.title, report.message);
    println!("{}? [Y/n]", report.button_text);
    Screen::Failed
}

/// Run games until the player quits or stdin closes.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn play(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let (mut quiz, mut events) = services.quiz_loop();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Loading movies...");
    let mut screen = match quiz.start().await {
        Ok(step) => show_step(&step),
        Err(err) => show_error(&err),
    };

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = Input::parse(&line);
                screen = match (screen, input) {
                    (_, Input::Quit) => break,
                    (Screen::Question, Input::Yes | Input::No) => {
                        match quiz.answer(input == Input::Yes) {
                            Some(outcome) if outcome.is_correct => {
                                println!("Correct!");
                                Screen::Waiting
                            }
                            Some(_) => {
                                println!("Wrong!");
                                Screen::Waiting
                            }
                            None => screen,
                        }
                    }
                    (Screen::Results | Screen::Failed, Input::Yes | Input::Empty) => {
                        match quiz.restart().await {
                            Ok(step) => show_step(&step),
                            Err(err) => show_error(&err),
                        }
                    }
                    (Screen::Results | Screen::Failed, Input::No) => break,
                    (Screen::Waiting, _) => screen,
                    (_, _) => {
                        println!("Please type y or n (q to quit).");
                        screen
                    }
                };
            }
            Some(event) = events.recv() => {
                screen = match quiz.handle_event(event).await {
                    Ok(Some(QuizUpdate::Question(step))) => show_step(&step),
                    Ok(Some(QuizUpdate::Finished(report))) => show_report(&report),
                    Ok(None) => screen,
                    Err(err) => show_error(&err),
                };
            }
        }
    }

    println!("Bye!");
    Ok(())
}

/// Print the stored statistics without playing.
///
/// # Errors
///
/// Returns an error if the statistics cannot be loaded.
pub async fn print_stats(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let record = services.statistics().load().await?;
    if record.games_played() == 0 {
        println!("No games played yet.");
        return Ok(());
    }

    println!("Quizzes played: {}", record.games_played());
    println!("Record: {}", format_best_game(record.best_game()));
    println!("Average accuracy: {:.2}%", record.accuracy());
    Ok(())
}
