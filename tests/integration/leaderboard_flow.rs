use std::sync::Arc;

use chrono::NaiveDate;
use kittens_scoreboard_lib::db::DbPool;
use kittens_scoreboard_lib::models::game::{GameActionInput, GameUpsertInput};
use kittens_scoreboard_lib::models::period::Period;
use kittens_scoreboard_lib::models::player::{PlayerCreateInput, PlayerRecord};
use kittens_scoreboard_lib::models::scoring::ActionKind;
use kittens_scoreboard_lib::models::settings::{ScoringPreset, ScoringRulesUpdate};
use kittens_scoreboard_lib::services::game_service::GameService;
use kittens_scoreboard_lib::services::leaderboard_service::LeaderboardService;
use kittens_scoreboard_lib::services::player_service::PlayerService;
use kittens_scoreboard_lib::services::scoring_rules_service::ScoringRulesService;
use tempfile::tempdir;

struct Fixture {
    _dir: tempfile::TempDir,
    pool: DbPool,
    players: PlayerService,
    games: GameService,
    rules: Arc<ScoringRulesService>,
    leaderboard: LeaderboardService,
}

fn fixture() -> Fixture {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("leaderboard.sqlite")).expect("db pool");
    let rules = Arc::new(ScoringRulesService::new(pool.clone()));
    Fixture {
        players: PlayerService::new(pool.clone()),
        games: GameService::new(pool.clone()),
        leaderboard: LeaderboardService::new(pool.clone(), Arc::clone(&rules)),
        rules,
        pool,
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

fn action(player: &PlayerRecord, kind: ActionKind) -> GameActionInput {
    GameActionInput {
        player_id: player.id.clone(),
        action_type: kind,
    }
}

fn march_2024() -> Period {
    Period::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
    )
    .expect("period")
}

/// Alice and Bob both reach 15 points, Carol attends one of two games with a
/// penalty, Dana never plays. A game on April 1st falls outside March.
fn seed_march(fx: &Fixture) -> [PlayerRecord; 4] {
    let alice = add_player(&fx.players, "Alice");
    let bob = add_player(&fx.players, "Bob");
    let carol = add_player(&fx.players, "Carol");
    let dana = add_player(&fx.players, "Dana");

    fx.games
        .create_game(GameUpsertInput {
            game_date: Some("2024-03-05".into()),
            round: Some("1".into()),
            participants: vec![alice.id.clone(), bob.id.clone()],
            actions: vec![
                action(&alice, ActionKind::Win),
                action(&bob, ActionKind::SecondPlace),
            ],
        })
        .expect("first game");

    fx.games
        .create_game(GameUpsertInput {
            game_date: Some("2024-03-10".into()),
            round: None,
            participants: vec![alice.id.clone(), bob.id.clone(), carol.id.clone()],
            actions: vec![
                action(&bob, ActionKind::Win),
                action(&alice, ActionKind::SecondPlace),
                action(&carol, ActionKind::FirstExploded),
            ],
        })
        .expect("second game");

    fx.games
        .create_game(GameUpsertInput {
            game_date: Some("2024-04-01".into()),
            round: None,
            participants: vec![carol.id.clone(), dana.id.clone()],
            actions: vec![action(&carol, ActionKind::Win)],
        })
        .expect("april game");

    [alice, bob, carol, dana]
}

#[test]
fn leaderboard_orders_players_and_weights_participation() {
    let fx = fixture();
    let [alice, bob, carol, dana] = seed_march(&fx);

    let response = fx.leaderboard.fetch_leaderboard(march_2024()).expect("leaderboard");
    assert_eq!(response.total_games, 2);

    let entries = response.leaderboard.entries();
    let order: Vec<&str> = entries.iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(order, vec!["Alice", "Bob", "Dana", "Carol"]);

    assert_eq!(entries[0].player_id, alice.id);
    assert_eq!(entries[0].total_points, 15.0);
    assert_eq!(entries[0].stats.win, 1);
    assert_eq!(entries[0].stats.second_place, 1);
    assert_eq!(entries[0].absence_rate, 0.0);

    assert_eq!(entries[1].player_id, bob.id);
    assert_eq!(entries[1].total_points, 15.0);

    assert_eq!(entries[2].player_id, dana.id);
    assert_eq!(entries[2].total_points, 0.0);
    assert_eq!(entries[2].games_played, 0);
    assert_eq!(entries[2].absence_rate, 100.0);

    assert_eq!(entries[3].player_id, carol.id);
    assert_eq!(entries[3].total_points, -1.5);
    assert_eq!(entries[3].games_played, 1);
    assert_eq!(entries[3].total_games, 2);
    assert_eq!(entries[3].absence_rate, 50.0);
    assert_eq!(entries[3].stats.first_exploded, 1);
    assert_eq!(entries[3].stats.win, 0, "april win must not leak into march");
}

#[test]
fn unknown_tags_and_non_participant_actions_are_ignored() {
    let fx = fixture();
    let [_, bob, _, dana] = seed_march(&fx);
    let first_game = fx
        .games
        .list_games(Some(&march_2024()))
        .expect("list games")
        .into_iter()
        .find(|game| game.game_date == "2024-03-05")
        .expect("first game present");

    fx.pool
        .with_connection(|conn| {
            conn.execute(
                "INSERT INTO game_actions (game_id, player_id, action_type) VALUES (?1, ?2, 'double_kitten')",
                (&first_game.id, &bob.id),
            )?;
            conn.execute(
                "INSERT INTO game_actions (game_id, player_id, action_type) VALUES (?1, ?2, 'barking_dead')",
                (&first_game.id, &dana.id),
            )?;
            Ok(())
        })
        .expect("raw inserts");

    let response = fx.leaderboard.fetch_leaderboard(march_2024()).expect("leaderboard");
    let entries = response.leaderboard.entries();

    let bob_entry = entries.iter().find(|e| e.player_id == bob.id).expect("bob");
    assert_eq!(bob_entry.total_points, 15.0);

    let dana_entry = entries.iter().find(|e| e.player_id == dana.id).expect("dana");
    assert_eq!(dana_entry.total_points, 0.0);
    assert_eq!(dana_entry.stats.barking_dead, 0);
}

#[test]
fn switching_presets_rescores_the_same_history() {
    let fx = fixture();
    let [_, _, carol, _] = seed_march(&fx);

    fx.rules
        .update(ScoringRulesUpdate {
            preset: Some(ScoringPreset::VersionB),
            weights: None,
        })
        .expect("switch preset");

    let response = fx.leaderboard.fetch_leaderboard(march_2024()).expect("leaderboard");
    let entries = response.leaderboard.entries();
    assert_eq!(entries[0].total_points, 15.0);

    let carol_entry = entries.iter().find(|e| e.player_id == carol.id).expect("carol");
    assert_eq!(carol_entry.total_points, -0.5);
    assert_eq!(response.leaderboard.position_of(&carol.id), Some(3));
}

#[test]
fn empty_period_lists_every_player_with_zero_points() {
    let fx = fixture();
    seed_march(&fx);

    let period = Period::new(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
    )
    .unwrap();
    let response = fx.leaderboard.fetch_leaderboard(period).expect("leaderboard");

    assert_eq!(response.total_games, 0);
    assert_eq!(response.leaderboard.len(), 4);
    for entry in response.leaderboard.entries() {
        assert_eq!(entry.total_points, 0.0);
        assert_eq!(entry.absence_rate, 0.0);
    }
    let order: Vec<&str> = response
        .leaderboard
        .entries()
        .iter()
        .map(|e| e.player_name.as_str())
        .collect();
    assert_eq!(order, vec!["Alice", "Bob", "Carol", "Dana"]);
}

#[test]
fn unreadable_store_degrades_to_empty_board() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("broken.sqlite");
    let pool = DbPool::new(&db_path).expect("db pool");
    let rules = Arc::new(ScoringRulesService::new(pool.clone()));
    let service = LeaderboardService::new(pool, rules);

    std::fs::remove_file(&db_path).expect("remove db file");
    let _ = std::fs::remove_file(dir.path().join("broken.sqlite-wal"));
    let _ = std::fs::remove_file(dir.path().join("broken.sqlite-shm"));
    std::fs::create_dir(&db_path).expect("directory in place of db");

    assert!(service.fetch_leaderboard(march_2024()).is_err());

    let response = service.fetch_leaderboard_or_empty(march_2024());
    assert_eq!(response.total_games, 0);
    assert!(response.leaderboard.is_empty());
    assert_eq!(response.period, march_2024());
}
