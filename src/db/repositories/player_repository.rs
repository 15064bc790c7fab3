use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::player::PlayerRecord;

const BASE_SELECT: &str = r#"
    SELECT
        id,
        name,
        color,
        created_at
    FROM players
"#;

#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

impl PlayerRow {
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            color: record.color.clone(),
            created_at: record.created_at.clone(),
        }
    }

    pub fn into_record(self) -> PlayerRecord {
        PlayerRecord {
            id: self.id,
            name: self.name,
            color: self.color,
            created_at: self.created_at,
        }
    }
}

impl TryFrom<&Row<'_>> for PlayerRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            color: row.get("color")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct PlayerRepository;

impl PlayerRepository {
    pub fn insert(conn: &Connection, row: &PlayerRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO players (id, name, color, created_at)
                VALUES (:id, :name, :color, :created_at)
            "#,
            named_params! {
                ":id": &row.id,
                ":name": &row.name,
                ":color": &row.color,
                ":created_at": &row.created_at,
            },
        )?;
        Ok(())
    }

    /// Inserts unless a player with the same name exists. Returns whether a
    /// row was written.
    pub fn insert_if_missing(conn: &Connection, row: &PlayerRow) -> AppResult<bool> {
        let inserted = conn.execute(
            r#"
                INSERT INTO players (id, name, color, created_at)
                VALUES (:id, :name, :color, :created_at)
                ON CONFLICT(name) DO NOTHING
            "#,
            named_params! {
                ":id": &row.id,
                ":name": &row.name,
                ":color": &row.color,
                ":created_at": &row.created_at,
            },
        )?;
        Ok(inserted > 0)
    }

    pub fn update(conn: &Connection, row: &PlayerRow) -> AppResult<usize> {
        let updated = conn.execute(
            r#"
                UPDATE players
                SET name = :name, color = :color
                WHERE id = :id
            "#,
            named_params! {
                ":id": &row.id,
                ":name": &row.name,
                ":color": &row.color,
            },
        )?;
        Ok(updated)
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<usize> {
        let deleted = conn.execute("DELETE FROM players WHERE id = ?1", [id])?;
        Ok(deleted)
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<PlayerRow>> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE id = :id"))?;
        let row = stmt
            .query_row(named_params! {":id": id}, |row| PlayerRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<PlayerRow>> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} ORDER BY name ASC"))?;
        let rows = stmt
            .query_map([], |row| PlayerRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_existing(conn: &Connection, ids: &[String]) -> AppResult<usize> {
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM players WHERE id = ?1")?;
        let mut found = 0;
        for id in ids {
            let count: i64 = stmt.query_row([id], |row| row.get(0))?;
            if count > 0 {
                found += 1;
            }
        }
        Ok(found)
    }
}
