use chrono::Utc;
use tracing::{debug, info};

use crate::db::repositories::player_repository::{PlayerRepository, PlayerRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::player::{
    PlayerCreateInput, PlayerRecord, PlayerUpdateInput, DEFAULT_PLAYER_COLOR,
};

const MAX_NAME_LENGTH: usize = 64;

#[derive(Clone)]
pub struct PlayerService {
    db: DbPool,
}

impl PlayerService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_player(&self, input: PlayerCreateInput) -> AppResult<PlayerRecord> {
        let record = PlayerRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: normalize_name(&input.name)?,
            color: normalize_color(input.color)?,
            created_at: Utc::now().to_rfc3339(),
        };

        let row = PlayerRow::from_record(&record);
        self.db
            .with_connection(|conn| PlayerRepository::insert(conn, &row))
            .map_err(|err| match err {
                AppError::Conflict { .. } => {
                    AppError::conflict(format!("player `{}` already exists", record.name))
                }
                other => other,
            })?;
        info!(target: "app::players", player_id = %record.id, name = %record.name, "player created");
        Ok(record)
    }

    pub fn update_player(&self, id: &str, input: PlayerUpdateInput) -> AppResult<PlayerRecord> {
        let mut existing = self.get_player(id)?;
        existing.name = normalize_name(&input.name)?;
        existing.color = normalize_color(input.color)?;

        let row = PlayerRow::from_record(&existing);
        let updated = self
            .db
            .with_connection(|conn| PlayerRepository::update(conn, &row))
            .map_err(|err| match err {
                AppError::Conflict { .. } => {
                    AppError::conflict(format!("player `{}` already exists", existing.name))
                }
                other => other,
            })?;
        if updated == 0 {
            return Err(AppError::not_found());
        }
        info!(target: "app::players", player_id = %existing.id, "player updated");
        Ok(existing)
    }

    /// Removing a player also removes their participation and actions.
    pub fn delete_player(&self, id: &str) -> AppResult<()> {
        let deleted = self
            .db
            .with_connection(|conn| PlayerRepository::delete(conn, id))?;
        if deleted == 0 {
            return Err(AppError::not_found());
        }
        info!(target: "app::players", player_id = %id, "player deleted");
        Ok(())
    }

    pub fn get_player(&self, id: &str) -> AppResult<PlayerRecord> {
        let row = self
            .db
            .with_connection(|conn| PlayerRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        Ok(row.into_record())
    }

    pub fn list_players(&self) -> AppResult<Vec<PlayerRecord>> {
        let rows = self
            .db
            .with_connection(|conn| PlayerRepository::list_all(conn))?;
        let players: Vec<PlayerRecord> = rows.into_iter().map(PlayerRow::into_record).collect();
        debug!(target: "app::players", count = players.len(), "players listed");
        Ok(players)
    }

    /// Adds every name not yet registered. Returns how many were inserted.
    pub fn seed_players<I, S>(&self, names: I) -> AppResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows = Vec::new();
        for name in names {
            let now = Utc::now().to_rfc3339();
            rows.push(PlayerRow {
                id: uuid::Uuid::new_v4().to_string(),
                name: normalize_name(name.as_ref())?,
                color: DEFAULT_PLAYER_COLOR.to_string(),
                created_at: now,
            });
        }

        let inserted = self.db.with_transaction(|conn| {
            let mut inserted = 0;
            for row in &rows {
                if PlayerRepository::insert_if_missing(conn, row)? {
                    inserted += 1;
                }
            }
            Ok(inserted)
        })?;
        info!(target: "app::players", requested = rows.len(), inserted, "players seeded");
        Ok(inserted)
    }
}

fn normalize_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("player name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "player name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn normalize_color(raw: Option<String>) -> AppResult<String> {
    let Some(color) = raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    else {
        return Ok(DEFAULT_PLAYER_COLOR.to_string());
    };

    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::validation_with_details(
            "player color must look like #RRGGBB",
            serde_json::json!({ "color": color }),
        ));
    }
    Ok(color.to_uppercase())
}
