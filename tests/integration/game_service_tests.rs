use chrono::NaiveDate;
use kittens_scoreboard_lib::db::DbPool;
use kittens_scoreboard_lib::error::AppError;
use kittens_scoreboard_lib::models::game::{GameActionInput, GameUpsertInput};
use kittens_scoreboard_lib::models::period::Period;
use kittens_scoreboard_lib::models::player::{PlayerCreateInput, PlayerRecord};
use kittens_scoreboard_lib::models::scoring::ActionKind;
use kittens_scoreboard_lib::services::game_service::GameService;
use kittens_scoreboard_lib::services::player_service::PlayerService;
use tempfile::tempdir;

fn setup() -> (GameService, PlayerService, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("games.sqlite")).expect("db pool");
    (
        GameService::new(pool.clone()),
        PlayerService::new(pool),
        dir,
    )
}

fn add_player(service: &PlayerService, name: &str) -> PlayerRecord {
    service
        .create_player(PlayerCreateInput {
            name: name.into(),
            color: Some("#00aa11".into()),
        })
        .expect("create player")
}

fn game_on(date: &str, participants: &[&PlayerRecord]) -> GameUpsertInput {
    GameUpsertInput {
        game_date: Some(date.into()),
        round: None,
        participants: participants.iter().map(|p| p.id.clone()).collect(),
        actions: Vec::new(),
    }
}

#[test]
fn game_crud_flow() {
    let (games, players, _dir) = setup();
    let ani = add_player(&players, "Ani");
    let davo = add_player(&players, "Davo");
    assert_eq!(ani.color, "#00AA11");

    // create
    let mut payload = game_on("2025-02-14", &[&davo, &ani]);
    payload.round = Some(" final ".into());
    payload.actions = vec![
        GameActionInput {
            player_id: davo.id.clone(),
            action_type: ActionKind::Win,
        },
        GameActionInput {
            player_id: ani.id.clone(),
            action_type: ActionKind::BarkingDiffuse,
        },
    ];
    let created = games.create_game(payload).expect("create game");
    assert_eq!(created.game_date, "2025-02-14");
    assert_eq!(created.round.as_deref(), Some("final"));
    let names: Vec<&str> = created.participants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ani", "Davo"]);
    assert_eq!(created.actions.len(), 2);
    assert_eq!(created.actions[0].action_type, "win");
    assert_eq!(created.actions[0].player_name, "Davo");

    // get
    let fetched = games.get_game(&created.id).expect("get game");
    assert_eq!(fetched, created);

    // update replaces the roster
    let mut update = game_on("2025-02-15", &[&ani]);
    update.actions = vec![GameActionInput {
        player_id: ani.id.clone(),
        action_type: ActionKind::SecondPlace,
    }];
    let updated = games.update_game(&created.id, update).expect("update game");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.game_date, "2025-02-15");
    assert_eq!(updated.round, None);
    assert_eq!(updated.participants.len(), 1);
    assert_eq!(updated.actions.len(), 1);
    assert_eq!(updated.actions[0].action_type, "second_place");

    // delete
    games.delete_game(&created.id).expect("delete game");
    assert!(games.get_game(&created.id).unwrap_err().is_not_found());
    assert!(games.delete_game(&created.id).unwrap_err().is_not_found());
}

#[test]
fn update_without_date_keeps_existing_date() {
    let (games, players, _dir) = setup();
    let ani = add_player(&players, "Ani");
    let created = games
        .create_game(game_on("2024-12-31", &[&ani]))
        .expect("create game");

    let mut update = game_on("", &[&ani]);
    update.game_date = None;
    let updated = games.update_game(&created.id, update).expect("update game");
    assert_eq!(updated.game_date, "2024-12-31");
}

#[test]
fn rejects_invalid_games() {
    let (games, players, _dir) = setup();
    let ani = add_player(&players, "Ani");
    let arev = add_player(&players, "Arev");

    let no_participants = games.create_game(GameUpsertInput::default());
    assert!(matches!(no_participants, Err(AppError::Validation { .. })));

    let mut unknown_player = game_on("2025-01-01", &[&ani]);
    unknown_player.participants.push("missing-player".into());
    assert!(matches!(
        games.create_game(unknown_player),
        Err(AppError::Validation { .. })
    ));

    let mut absent_actor = game_on("2025-01-01", &[&ani]);
    absent_actor.actions.push(GameActionInput {
        player_id: arev.id.clone(),
        action_type: ActionKind::Win,
    });
    assert!(matches!(
        games.create_game(absent_actor),
        Err(AppError::Validation { .. })
    ));

    let mut bad_date = game_on("01/02/2025", &[&ani]);
    bad_date.actions.clear();
    assert!(matches!(
        games.create_game(bad_date),
        Err(AppError::Validation { .. })
    ));

    assert!(games.list_games(None).expect("list games").is_empty());

    let missing = games.update_game("nope", game_on("2025-01-01", &[&ani]));
    assert!(missing.unwrap_err().is_not_found());
}

#[test]
fn list_games_filters_by_half_open_period_newest_first() {
    let (games, players, _dir) = setup();
    let ani = add_player(&players, "Ani");
    for date in ["2025-03-01", "2025-03-31", "2025-04-01", "2025-02-28", "2025-03-15"] {
        games.create_game(game_on(date, &[&ani])).expect("create game");
    }

    let march = Period::new(
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
    )
    .unwrap();
    let dates: Vec<String> = games
        .list_games(Some(&march))
        .expect("list games")
        .into_iter()
        .map(|game| game.game_date)
        .collect();
    assert_eq!(dates, vec!["2025-03-31", "2025-03-15", "2025-03-01"]);

    assert_eq!(games.list_games(None).expect("all games").len(), 5);
}

#[test]
fn delete_all_games_keeps_players() {
    let (games, players, _dir) = setup();
    let ani = add_player(&players, "Ani");
    let arev = add_player(&players, "Arev");
    let mut payload = game_on("2025-05-05", &[&ani, &arev]);
    payload.actions.push(GameActionInput {
        player_id: arev.id.clone(),
        action_type: ActionKind::FirstDead,
    });
    games.create_game(payload).expect("create game");
    games
        .create_game(game_on("2025-05-06", &[&ani]))
        .expect("create game");

    assert_eq!(games.delete_all_games().expect("delete all"), 2);
    assert!(games.list_games(None).expect("list games").is_empty());
    assert_eq!(players.list_players().expect("list players").len(), 2);
}

#[test]
fn deleting_a_player_removes_their_participation() {
    let (games, players, _dir) = setup();
    let ani = add_player(&players, "Ani");
    let arev = add_player(&players, "Arev");
    let mut payload = game_on("2025-06-01", &[&ani, &arev]);
    payload.actions.push(GameActionInput {
        player_id: arev.id.clone(),
        action_type: ActionKind::Win,
    });
    let game = games.create_game(payload).expect("create game");

    players.delete_player(&arev.id).expect("delete player");

    let reloaded = games.get_game(&game.id).expect("get game");
    assert_eq!(reloaded.participants.len(), 1);
    assert_eq!(reloaded.participants[0].id, ani.id);
    assert!(reloaded.actions.is_empty());
}
