use std::collections::HashMap;

use rusqlite::{named_params, Connection};

use crate::error::AppResult;
use crate::models::period::Period;

/// Number of times a player performed one action type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCountRow {
    pub player_id: String,
    pub action_type: String,
    pub count: i64,
}

/// A game the player attended, with the raw tags of their actions in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerGameRow {
    pub game_id: String,
    pub game_date: String,
    pub action_types: Vec<String>,
}

/// Period aggregates consumed by the scoring engine.
pub struct StandingsRepository;

impl StandingsRepository {
    pub fn count_games(conn: &Connection, period: &Period) -> AppResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM games WHERE game_date >= :start AND game_date < :end",
            named_params! {":start": period.start_key(), ":end": period.end_key()},
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Distinct games attended, keyed by player id. Players with no games are absent.
    pub fn games_played_by_player(
        conn: &Connection,
        period: &Period,
    ) -> AppResult<HashMap<String, i64>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT gp.player_id, COUNT(DISTINCT gp.game_id)
                FROM game_participants gp
                INNER JOIN games g ON g.id = gp.game_id
                WHERE g.game_date >= :start AND g.game_date < :end
                GROUP BY gp.player_id
            "#,
        )?;
        let counts = stmt
            .query_map(
                named_params! {":start": period.start_key(), ":end": period.end_key()},
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(counts)
    }

    pub fn games_played(conn: &Connection, player_id: &str, period: &Period) -> AppResult<i64> {
        let count = conn.query_row(
            r#"
                SELECT COUNT(DISTINCT gp.game_id)
                FROM game_participants gp
                INNER JOIN games g ON g.id = gp.game_id
                WHERE gp.player_id = :player_id
                  AND g.game_date >= :start AND g.game_date < :end
            "#,
            named_params! {
                ":player_id": player_id,
                ":start": period.start_key(),
                ":end": period.end_key(),
            },
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Action counts per player and type. Only actions from games the player
    /// attended are counted.
    pub fn action_counts(conn: &Connection, period: &Period) -> AppResult<Vec<ActionCountRow>> {
        Self::query_action_counts(conn, period, None)
    }

    pub fn action_counts_for_player(
        conn: &Connection,
        player_id: &str,
        period: &Period,
    ) -> AppResult<Vec<ActionCountRow>> {
        Self::query_action_counts(conn, period, Some(player_id))
    }

    fn query_action_counts(
        conn: &Connection,
        period: &Period,
        player_id: Option<&str>,
    ) -> AppResult<Vec<ActionCountRow>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT ga.player_id, ga.action_type, COUNT(*)
                FROM game_actions ga
                INNER JOIN games g ON g.id = ga.game_id
                INNER JOIN game_participants gp
                    ON gp.game_id = ga.game_id AND gp.player_id = ga.player_id
                WHERE g.game_date >= :start AND g.game_date < :end
                  AND (:player_id IS NULL OR ga.player_id = :player_id)
                GROUP BY ga.player_id, ga.action_type
                ORDER BY ga.player_id, ga.action_type
            "#,
        )?;
        let rows = stmt
            .query_map(
                named_params! {
                    ":start": period.start_key(),
                    ":end": period.end_key(),
                    ":player_id": player_id,
                },
                |row| {
                    Ok(ActionCountRow {
                        player_id: row.get(0)?,
                        action_type: row.get(1)?,
                        count: row.get(2)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Games the player attended in the period, newest first.
    pub fn player_games(
        conn: &Connection,
        player_id: &str,
        period: &Period,
    ) -> AppResult<Vec<PlayerGameRow>> {
        let mut games_stmt = conn.prepare(
            r#"
                SELECT g.id, g.game_date
                FROM games g
                INNER JOIN game_participants gp ON gp.game_id = g.id
                WHERE gp.player_id = :player_id
                  AND g.game_date >= :start AND g.game_date < :end
                ORDER BY g.game_date DESC, g.created_at DESC
            "#,
        )?;
        let games = games_stmt
            .query_map(
                named_params! {
                    ":player_id": player_id,
                    ":start": period.start_key(),
                    ":end": period.end_key(),
                },
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let mut actions_stmt = conn.prepare(
            r#"
                SELECT action_type
                FROM game_actions
                WHERE game_id = ?1 AND player_id = ?2
                ORDER BY id ASC
            "#,
        )?;

        let mut rows = Vec::with_capacity(games.len());
        for (game_id, game_date) in games {
            let action_types = actions_stmt
                .query_map((&game_id, player_id), |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(PlayerGameRow {
                game_id,
                game_date,
                action_types,
            });
        }
        Ok(rows)
    }
}
