use std::collections::HashSet;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info};

use crate::db::repositories::game_repository::{GameActionRow, GameRepository, GameRow};
use crate::db::repositories::player_repository::PlayerRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::game::{GameRecord, GameUpsertInput};
use crate::models::period::{parse_date, Period, DATE_FORMAT};

#[derive(Clone)]
pub struct GameService {
    db: DbPool,
}

/// Validated form of a [`GameUpsertInput`].
#[derive(Debug)]
struct GameDraft {
    game_date: NaiveDate,
    round: Option<String>,
    participants: Vec<String>,
    actions: Vec<GameActionRow>,
}

impl GameService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_game(&self, input: GameUpsertInput) -> AppResult<GameRecord> {
        let draft = build_draft(input, Local::now().date_naive())?;
        let row = GameRow {
            id: uuid::Uuid::new_v4().to_string(),
            game_date: draft.game_date.format(DATE_FORMAT).to_string(),
            round: draft.round.clone(),
            created_at: Utc::now().to_rfc3339(),
        };

        let record = self.db.with_transaction(|conn| {
            ensure_players_exist(conn, &draft.participants)?;
            GameRepository::insert(conn, &row)?;
            GameRepository::replace_roster(conn, &row.id, &draft.participants, &draft.actions)?;
            GameRepository::load_record(conn, row.clone())
        })?;

        info!(
            target: "app::games",
            game_id = %record.id,
            game_date = %record.game_date,
            participants = record.participants.len(),
            actions = record.actions.len(),
            "game created"
        );
        Ok(record)
    }

    /// Replaces date, round, participants and actions of an existing game.
    pub fn update_game(&self, id: &str, input: GameUpsertInput) -> AppResult<GameRecord> {
        let existing = self
            .db
            .with_connection(|conn| GameRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        let fallback_date = parse_date(&existing.game_date)?;
        let draft = build_draft(input, fallback_date)?;

        let row = GameRow {
            game_date: draft.game_date.format(DATE_FORMAT).to_string(),
            round: draft.round.clone(),
            ..existing
        };

        let record = self.db.with_transaction(|conn| {
            ensure_players_exist(conn, &draft.participants)?;
            if GameRepository::update_header(conn, &row)? == 0 {
                return Err(AppError::not_found());
            }
            GameRepository::replace_roster(conn, &row.id, &draft.participants, &draft.actions)?;
            GameRepository::load_record(conn, row.clone())
        })?;

        info!(target: "app::games", game_id = %record.id, "game updated");
        Ok(record)
    }

    pub fn delete_game(&self, id: &str) -> AppResult<()> {
        let deleted = self
            .db
            .with_connection(|conn| GameRepository::delete(conn, id))?;
        if deleted == 0 {
            return Err(AppError::not_found());
        }
        info!(target: "app::games", game_id = %id, "game deleted");
        Ok(())
    }

    /// Wipes the whole game history. Players are kept.
    pub fn delete_all_games(&self) -> AppResult<usize> {
        let deleted = self.db.with_transaction(GameRepository::delete_all)?;
        info!(target: "app::games", deleted, "game history cleared");
        Ok(deleted)
    }

    pub fn get_game(&self, id: &str) -> AppResult<GameRecord> {
        self.db.with_connection(|conn| {
            let row = GameRepository::find_by_id(conn, id)?.ok_or_else(AppError::not_found)?;
            GameRepository::load_record(conn, row)
        })
    }

    pub fn list_games(&self, period: Option<&Period>) -> AppResult<Vec<GameRecord>> {
        let games = self.db.with_connection(|conn| {
            GameRepository::list(conn, period)?
                .into_iter()
                .map(|row| GameRepository::load_record(conn, row))
                .collect::<AppResult<Vec<_>>>()
        })?;
        debug!(target: "app::games", count = games.len(), "games listed");
        Ok(games)
    }
}

fn build_draft(input: GameUpsertInput, default_date: NaiveDate) -> AppResult<GameDraft> {
    let game_date = match input
        .game_date
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        Some(raw) => parse_date(raw)?,
        None => default_date,
    };

    let round = input
        .round
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let mut seen = HashSet::new();
    let participants: Vec<String> = input
        .participants
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect();
    if participants.is_empty() {
        return Err(AppError::validation("at least one participant is required"));
    }

    let mut kinds = HashSet::new();
    let mut actions = Vec::with_capacity(input.actions.len());
    for action in input.actions {
        if !kinds.insert(action.action_type) {
            return Err(AppError::validation_with_details(
                "each action type can only be assigned once per game",
                serde_json::json!({ "actionType": action.action_type.as_str() }),
            ));
        }
        let player_id = action.player_id.trim().to_string();
        if !participants.contains(&player_id) {
            return Err(AppError::validation_with_details(
                "actions can only be assigned to participants",
                serde_json::json!({
                    "actionType": action.action_type.as_str(),
                    "playerId": player_id,
                }),
            ));
        }
        actions.push(GameActionRow {
            player_id,
            action_type: action.action_type.as_str().to_string(),
        });
    }

    Ok(GameDraft {
        game_date,
        round,
        participants,
        actions,
    })
}

fn ensure_players_exist(conn: &rusqlite::Connection, participants: &[String]) -> AppResult<()> {
    let found = PlayerRepository::count_existing(conn, participants)?;
    if found != participants.len() {
        return Err(AppError::validation_with_details(
            "unknown participant",
            serde_json::json!({ "expected": participants.len(), "found": found }),
        ));
    }
    Ok(())
}
