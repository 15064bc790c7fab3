use std::sync::Arc;

use chrono::NaiveDate;
use kittens_scoreboard_lib::db::DbPool;
use kittens_scoreboard_lib::models::game::{GameActionInput, GameUpsertInput};
use kittens_scoreboard_lib::models::period::Period;
use kittens_scoreboard_lib::models::player::{PlayerCreateInput, PlayerRecord};
use kittens_scoreboard_lib::models::scoring::{ActionKind, PointWeights};
use kittens_scoreboard_lib::models::settings::ScoringRulesUpdate;
use kittens_scoreboard_lib::services::game_service::GameService;
use kittens_scoreboard_lib::services::player_service::PlayerService;
use kittens_scoreboard_lib::services::player_stats_service::PlayerStatsService;
use kittens_scoreboard_lib::services::scoring_rules_service::ScoringRulesService;
use tempfile::tempdir;

struct Fixture {
    _dir: tempfile::TempDir,
    players: PlayerService,
    games: GameService,
    rules: Arc<ScoringRulesService>,
    stats: PlayerStatsService,
}

fn fixture() -> Fixture {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("stats.sqlite")).expect("db pool");
    let rules = Arc::new(ScoringRulesService::new(pool.clone()));
    Fixture {
        players: PlayerService::new(pool.clone()),
        games: GameService::new(pool.clone()),
        stats: PlayerStatsService::new(pool, Arc::clone(&rules)),
        rules,
        _dir: dir,
    }
}

fn add_player(service: &PlayerService, name: &str) -> PlayerRecord {
    service
        .create_player(PlayerCreateInput {
            name: name.into(),
            color: None,
        })
        .expect("create player")
}

fn january_2025() -> Period {
    Period::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    )
    .unwrap()
}

fn play(
    games: &GameService,
    date: &str,
    participants: &[&PlayerRecord],
    actions: &[(&PlayerRecord, ActionKind)],
) -> String {
    games
        .create_game(GameUpsertInput {
            game_date: Some(date.into()),
            round: None,
            participants: participants.iter().map(|p| p.id.clone()).collect(),
            actions: actions
                .iter()
                .map(|(player, kind)| GameActionInput {
                    player_id: player.id.clone(),
                    action_type: *kind,
                })
                .collect(),
        })
        .expect("create game")
        .id
}

#[test]
fn stats_cover_totals_and_per_game_breakdown() {
    let fx = fixture();
    let artash = add_player(&fx.players, "Artash");
    let ani = add_player(&fx.players, "Ani");

    let early = play(
        &fx.games,
        "2025-01-04",
        &[&artash, &ani],
        &[(&artash, ActionKind::Win), (&artash, ActionKind::FirstDead)],
    );
    play(&fx.games, "2025-01-11", &[&ani], &[(&ani, ActionKind::Win)]);
    let late = play(
        &fx.games,
        "2025-01-18",
        &[&artash, &ani],
        &[(&artash, ActionKind::BarkingDead), (&ani, ActionKind::Win)],
    );
    play(&fx.games, "2025-02-01", &[&artash], &[(&artash, ActionKind::Win)]);

    let stats = fx
        .stats
        .fetch_player_stats(&artash.id, january_2025())
        .expect("player stats");

    assert_eq!(stats.player.name, "Artash");
    assert_eq!(stats.total_games, 3);
    assert_eq!(stats.games_played, 2);
    assert!((stats.absence_rate - 100.0 / 3.0).abs() < 1e-9);
    // (10 - 1 - 3) * 2 / 3
    assert_eq!(stats.total_points, 4.0);
    assert_eq!(stats.stats.win, 1);
    assert_eq!(stats.stats.first_dead, 1);
    assert_eq!(stats.stats.barking_dead, 1);

    assert_eq!(stats.game_breakdown.len(), 2);
    assert_eq!(stats.game_breakdown[0].game_id, late);
    assert_eq!(stats.game_breakdown[0].actions.len(), 1);
    assert_eq!(stats.game_breakdown[0].actions[0].action_type, "barking_dead");
    assert_eq!(stats.game_breakdown[0].actions[0].points, -3);

    assert_eq!(stats.game_breakdown[1].game_id, early);
    let early_points: Vec<(&str, i64)> = stats.game_breakdown[1]
        .actions
        .iter()
        .map(|a| (a.action_type.as_str(), a.points))
        .collect();
    assert_eq!(early_points, vec![("win", 10), ("first_dead", -1)]);
}

#[test]
fn breakdown_follows_the_active_weight_table() {
    let fx = fixture();
    let davo = add_player(&fx.players, "Davo");
    play(
        &fx.games,
        "2025-01-20",
        &[&davo],
        &[(&davo, ActionKind::FirstDead)],
    );

    let custom = PointWeights {
        first_dead: -7,
        ..PointWeights::version_a()
    };
    fx.rules
        .update(ScoringRulesUpdate {
            preset: None,
            weights: Some(custom),
        })
        .expect("custom rules");

    let stats = fx
        .stats
        .fetch_player_stats(&davo.id, january_2025())
        .expect("player stats");
    assert_eq!(stats.total_points, -7.0);
    assert_eq!(stats.game_breakdown[0].actions[0].points, -7);
}

#[test]
fn player_without_games_has_zero_points_and_full_absence() {
    let fx = fixture();
    let idle = add_player(&fx.players, "Idle");
    let busy = add_player(&fx.players, "Busy");
    play(&fx.games, "2025-01-02", &[&busy], &[(&busy, ActionKind::Win)]);

    let stats = fx
        .stats
        .fetch_player_stats(&idle.id, january_2025())
        .expect("player stats");
    assert_eq!(stats.total_points, 0.0);
    assert_eq!(stats.games_played, 0);
    assert_eq!(stats.absence_rate, 100.0);
    assert!(stats.game_breakdown.is_empty());
}

#[test]
fn unknown_player_is_not_found() {
    let fx = fixture();
    let err = fx
        .stats
        .fetch_player_stats("ghost", january_2025())
        .unwrap_err();
    assert!(err.is_not_found());
}
