use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, QuizUpdate, StaticMovieProvider};

async fn play_full_game(services: &AppServices, choice: bool) -> services::GameReport {
    let (mut quiz, mut events) = services.quiz_loop();
    quiz.start().await.unwrap();

    loop {
        quiz.answer(choice).expect("question is shown");
        let event = events.recv().await.expect("advance scheduled");
        match quiz.handle_event(event).await.unwrap() {
            Some(QuizUpdate::Question(_)) => {}
            Some(QuizUpdate::Finished(report)) => return report,
            None => panic!("advance event was stale"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn quiz_loop_persists_statistics_between_games() {
    let services = AppServices::in_memory(
        Clock::fixed(fixed_now()),
        Arc::new(StaticMovieProvider::demo()),
    )
    .with_advance_delay(Duration::from_millis(250));

    let first = play_full_game(&services, true).await;
    assert_eq!(first.record.games_played(), 1);
    assert_eq!(first.result.total(), 10);

    let second = play_full_game(&services, false).await;
    assert_eq!(second.record.games_played(), 2);
    assert_eq!(
        second.record.total_correct(),
        first.result.correct() + second.result.correct()
    );

    let best = second.record.best_game().correct();
    assert_eq!(best, first.result.correct().max(second.result.correct()));

    let stored = services.statistics().load().await.unwrap();
    assert_eq!(stored, second.record);
}

#[tokio::test]
async fn sqlite_statistics_survive_new_services() {
    let url = "sqlite:file:memdb_quiz_smoke?mode=memory&cache=shared";
    let provider = Arc::new(StaticMovieProvider::demo());
    let services = AppServices::new_sqlite(url, Clock::fixed(fixed_now()), provider.clone())
        .await
        .unwrap();

    let stats = services.statistics();
    let t1 = fixed_now();
    stats
        .record_game(quiz_core::model::GameResult::new(8, 10, t1).unwrap())
        .await
        .unwrap();

    let t2 = t1 + ChronoDuration::hours(1);
    let reopened = AppServices::new_sqlite(url, Clock::fixed(t2), provider)
        .await
        .unwrap();
    let record = reopened
        .statistics()
        .record_game(quiz_core::model::GameResult::new(5, 10, t2).unwrap())
        .await
        .unwrap();

    assert_eq!(record.games_played(), 2);
    assert_eq!(record.best_game().correct(), 8);
    assert_eq!(record.best_game().played_at(), t1);
    assert_eq!(format!("{:.2}", record.accuracy()), "65.00");
    drop(services);
}
