use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::game::{GameActionRecord, GameParticipant, GameRecord};
use crate::models::period::Period;

const BASE_SELECT: &str = r#"
    SELECT
        id,
        game_date,
        round,
        created_at
    FROM games
"#;

#[derive(Debug, Clone)]
pub struct GameRow {
    pub id: String,
    pub game_date: String,
    pub round: Option<String>,
    pub created_at: String,
}

impl TryFrom<&Row<'_>> for GameRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            game_date: row.get("game_date")?,
            round: row.get("round")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GameActionRow {
    pub player_id: String,
    pub action_type: String,
}

pub struct GameRepository;

impl GameRepository {
    pub fn insert(conn: &Connection, row: &GameRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO games (id, game_date, round, created_at)
                VALUES (:id, :game_date, :round, :created_at)
            "#,
            named_params! {
                ":id": &row.id,
                ":game_date": &row.game_date,
                ":round": &row.round,
                ":created_at": &row.created_at,
            },
        )?;
        Ok(())
    }

    pub fn update_header(conn: &Connection, row: &GameRow) -> AppResult<usize> {
        let updated = conn.execute(
            r#"
                UPDATE games
                SET game_date = :game_date, round = :round
                WHERE id = :id
            "#,
            named_params! {
                ":id": &row.id,
                ":game_date": &row.game_date,
                ":round": &row.round,
            },
        )?;
        Ok(updated)
    }

    /// Replaces the participants and actions of a game.
    pub fn replace_roster(
        conn: &Connection,
        game_id: &str,
        participants: &[String],
        actions: &[GameActionRow],
    ) -> AppResult<()> {
        conn.execute("DELETE FROM game_participants WHERE game_id = ?1", [game_id])?;
        conn.execute("DELETE FROM game_actions WHERE game_id = ?1", [game_id])?;

        let mut insert_participant = conn.prepare(
            "INSERT INTO game_participants (game_id, player_id) VALUES (?1, ?2)",
        )?;
        for player_id in participants {
            insert_participant.execute((game_id, player_id))?;
        }

        let mut insert_action = conn.prepare(
            "INSERT INTO game_actions (game_id, player_id, action_type) VALUES (?1, ?2, ?3)",
        )?;
        for action in actions {
            insert_action.execute((game_id, &action.player_id, &action.action_type))?;
        }

        Ok(())
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<usize> {
        let deleted = conn.execute("DELETE FROM games WHERE id = ?1", [id])?;
        Ok(deleted)
    }

    pub fn delete_all(conn: &Connection) -> AppResult<usize> {
        conn.execute("DELETE FROM game_actions", [])?;
        conn.execute("DELETE FROM game_participants", [])?;
        let deleted = conn.execute("DELETE FROM games", [])?;
        Ok(deleted)
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<GameRow>> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE id = :id"))?;
        let row = stmt
            .query_row(named_params! {":id": id}, |row| GameRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    /// Newest first. Without a period every game is returned.
    pub fn list(conn: &Connection, period: Option<&Period>) -> AppResult<Vec<GameRow>> {
        let rows = match period {
            Some(period) => {
                let mut stmt = conn.prepare(&format!(
                    "{BASE_SELECT}
                    WHERE game_date >= :start AND game_date < :end
                    ORDER BY game_date DESC, created_at DESC"
                ))?;
                let rows = stmt
                    .query_map(
                        named_params! {
                            ":start": period.start_key(),
                            ":end": period.end_key(),
                        },
                        |row| GameRow::try_from(row),
                    )?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "{BASE_SELECT} ORDER BY game_date DESC, created_at DESC"
                ))?;
                let rows = stmt
                    .query_map([], |row| GameRow::try_from(row))?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    }

    pub fn list_participants(conn: &Connection, game_id: &str) -> AppResult<Vec<GameParticipant>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT p.id, p.name
                FROM game_participants gp
                INNER JOIN players p ON p.id = gp.player_id
                WHERE gp.game_id = ?1
                ORDER BY p.name ASC
            "#,
        )?;
        let participants = stmt
            .query_map([game_id], |row| {
                Ok(GameParticipant {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(participants)
    }

    pub fn list_actions(conn: &Connection, game_id: &str) -> AppResult<Vec<GameActionRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT ga.id, ga.player_id, p.name, ga.action_type
                FROM game_actions ga
                INNER JOIN players p ON p.id = ga.player_id
                WHERE ga.game_id = ?1
                ORDER BY ga.id ASC
            "#,
        )?;
        let actions = stmt
            .query_map([game_id], |row| {
                Ok(GameActionRecord {
                    id: row.get(0)?,
                    player_id: row.get(1)?,
                    player_name: row.get(2)?,
                    action_type: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(actions)
    }

    pub fn load_record(conn: &Connection, row: GameRow) -> AppResult<GameRecord> {
        let participants = Self::list_participants(conn, &row.id)?;
        let actions = Self::list_actions(conn, &row.id)?;
        Ok(GameRecord {
            id: row.id,
            game_date: row.game_date,
            round: row.round,
            created_at: row.created_at,
            participants,
            actions,
        })
    }
}
