use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, BASE_DB_VERSION,
};

use super::models::{
    EventEntry, EventFrequency, NewUser, SkillEntry, SkillFrequency, UserProfile, UserUpdate,
};
use super::registry_store::RegistryStore;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "user",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const USER_TABLE: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("company", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("phone", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_user_email", "email")],
    unique_constraints: &[],
};

const SKILL_TABLE: Table = Table {
    name: "skill",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("skill", &SqlType::Text, non_null = true),
        sqlite_column!("rating", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_skill_user_id", "user_id"), ("idx_skill_skill", "skill")],
    unique_constraints: &[],
};

const EVENT_TABLE: Table = Table {
    name: "event",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("event", &SqlType::Text, non_null = true),
        sqlite_column!("category", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_event_user_id", "user_id")],
    unique_constraints: &[&["user_id", "event", "category"]],
};

const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[USER_TABLE, SKILL_TABLE, EVENT_TABLE],
}];

#[derive(Clone)]
pub struct SqliteRegistryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRegistryStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = if db_path.as_ref().exists() {
            let conn = Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;

            let db_version = conn
                .query_row("PRAGMA user_version;", [], |row| row.get::<usize, i64>(0))
                .context("Failed to read database version")?
                - BASE_DB_VERSION as i64;

            if db_version < 0 {
                bail!(
                    "Database version {} is too old, does not contain base db version {}",
                    db_version,
                    BASE_DB_VERSION
                );
            }
            if db_version >= VERSIONED_SCHEMAS.len() as i64 {
                bail!("Database version {} is too new", db_version);
            }
            VERSIONED_SCHEMAS
                .get(db_version as usize)
                .context("Failed to get schema")?
                .validate(&conn)?;
            conn
        } else {
            let conn = Connection::open(db_path)?;
            VERSIONED_SCHEMAS.last().unwrap().create(&conn)?;
            conn
        };

        // Cascade deletes rely on this; it is per-connection state.
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;

        Ok(SqliteRegistryStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl RegistryStore for SqliteRegistryStore {
    fn get_all_users(&self) -> Result<Vec<UserProfile>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT id, name, company, email, phone FROM {} ORDER BY id",
            USER_TABLE.name
        ))?;
        let mut users: Vec<UserProfile> = stmt
            .query_map([], |row| {
                Ok(UserProfile {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    company: row.get(2)?,
                    email: row.get(3)?,
                    phone: row.get(4)?,
                    skills: Vec::new(),
                    events: Vec::new(),
                })
            })?
            .collect::<Result<_, _>>()?;

        let mut skills_by_user: HashMap<i64, Vec<SkillEntry>> = HashMap::new();
        let mut stmt = conn.prepare(&format!(
            "SELECT user_id, skill, rating FROM {} ORDER BY id",
            SKILL_TABLE.name
        ))?;
        let skill_rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                SkillEntry {
                    skill: row.get(1)?,
                    rating: row.get(2)?,
                },
            ))
        })?;
        for row in skill_rows {
            let (user_id, entry) = row?;
            skills_by_user.entry(user_id).or_default().push(entry);
        }

        let mut events_by_user: HashMap<i64, Vec<EventEntry>> = HashMap::new();
        let mut stmt = conn.prepare(&format!(
            "SELECT user_id, event, category FROM {} ORDER BY id",
            EVENT_TABLE.name
        ))?;
        let event_rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                EventEntry {
                    event: row.get(1)?,
                    category: row.get(2)?,
                },
            ))
        })?;
        for row in event_rows {
            let (user_id, entry) = row?;
            events_by_user.entry(user_id).or_default().push(entry);
        }

        for user in users.iter_mut() {
            if let Some(skills) = skills_by_user.remove(&user.id) {
                user.skills = skills;
            }
            if let Some(events) = events_by_user.remove(&user.id) {
                user.events = events;
            }
        }

        Ok(users)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let conn = self.conn.lock().unwrap();

        let user = conn
            .query_row(
                &format!(
                    "SELECT id, name, company, email, phone FROM {} WHERE email = ?1",
                    USER_TABLE.name
                ),
                params![email],
                |row| {
                    Ok(UserProfile {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        company: row.get(2)?,
                        email: row.get(3)?,
                        phone: row.get(4)?,
                        skills: Vec::new(),
                        events: Vec::new(),
                    })
                },
            )
            .optional()?;

        let mut user = match user {
            Some(user) => user,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare(&format!(
            "SELECT skill, rating FROM {} WHERE user_id = ?1 ORDER BY id",
            SKILL_TABLE.name
        ))?;
        user.skills = stmt
            .query_map(params![user.id], |row| {
                Ok(SkillEntry {
                    skill: row.get(0)?,
                    rating: row.get(1)?,
                })
            })?
            .collect::<Result<_, _>>()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT event, category FROM {} WHERE user_id = ?1 ORDER BY id",
            EVENT_TABLE.name
        ))?;
        user.events = stmt
            .query_map(params![user.id], |row| {
                Ok(EventEntry {
                    event: row.get(0)?,
                    category: row.get(1)?,
                })
            })?
            .collect::<Result<_, _>>()?;

        Ok(Some(user))
    }

    fn create_user_with_skills(&self, user: &NewUser, skills: &[SkillEntry]) -> Result<i64> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO {} (name, company, email, phone) VALUES (?1, ?2, ?3, ?4)",
                USER_TABLE.name
            ),
            params![user.name, user.company, user.email, user.phone],
        )
        .with_context(|| format!("Failed to create user {}", user.email))?;
        let user_id = tx.last_insert_rowid();

        for skill in skills {
            tx.execute(
                &format!(
                    "INSERT INTO {} (user_id, skill, rating) VALUES (?1, ?2, ?3)",
                    SKILL_TABLE.name
                ),
                params![user_id, skill.skill, skill.rating],
            )?;
        }

        tx.commit()?;
        Ok(user_id)
    }

    fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        if let Some(name) = &update.name {
            tx.execute(
                &format!("UPDATE {} SET name = ?1 WHERE id = ?2", USER_TABLE.name),
                params![name, user_id],
            )?;
        }
        if let Some(company) = &update.company {
            tx.execute(
                &format!("UPDATE {} SET company = ?1 WHERE id = ?2", USER_TABLE.name),
                params![company, user_id],
            )?;
        }
        if let Some(email) = &update.email {
            tx.execute(
                &format!("UPDATE {} SET email = ?1 WHERE id = ?2", USER_TABLE.name),
                params![email, user_id],
            )?;
        }
        if let Some(phone) = &update.phone {
            tx.execute(
                &format!("UPDATE {} SET phone = ?1 WHERE id = ?2", USER_TABLE.name),
                params![phone, user_id],
            )?;
        }

        if let Some(skills) = &update.skills {
            tx.execute(
                &format!("DELETE FROM {} WHERE user_id = ?1", SKILL_TABLE.name),
                params![user_id],
            )?;
            for skill in skills {
                tx.execute(
                    &format!(
                        "INSERT INTO {} (user_id, skill, rating) VALUES (?1, ?2, ?3)",
                        SKILL_TABLE.name
                    ),
                    params![user_id, skill.skill, skill.rating],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_user(&self, email: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            &format!("DELETE FROM {} WHERE email = ?1", USER_TABLE.name),
            params![email],
        )?;
        Ok(deleted > 0)
    }

    fn get_user_events(&self, user_id: i64) -> Result<Vec<EventEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT event, category FROM {} WHERE user_id = ?1 ORDER BY id",
            EVENT_TABLE.name
        ))?;
        let events = stmt
            .query_map(params![user_id], |row| {
                Ok(EventEntry {
                    event: row.get(0)?,
                    category: row.get(1)?,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(events)
    }

    fn has_user_event(&self, user_id: i64, event: &str, category: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE user_id = ?1 AND event = ?2 AND category = ?3",
                EVENT_TABLE.name
            ),
            params![user_id, event, category],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn add_user_event(&self, user_id: i64, event: &str, category: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO {} (user_id, event, category) VALUES (?1, ?2, ?3)",
                EVENT_TABLE.name
            ),
            params![user_id, event, category],
        )
        .with_context(|| format!("Failed to register event {} for user {}", event, user_id))?;
        Ok(())
    }

    fn skill_frequencies(&self) -> Result<Vec<SkillFrequency>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT skill, COUNT(*) AS count FROM {} GROUP BY skill ORDER BY count DESC, skill ASC",
            SKILL_TABLE.name
        ))?;
        let frequencies = stmt
            .query_map([], |row| {
                Ok(SkillFrequency {
                    skill: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(frequencies)
    }

    fn event_frequencies(&self) -> Result<Vec<EventFrequency>> {
        let conn = self.conn.lock().unwrap();
        // The retained category per group is the first-inserted row's, which
        // keeps the grouped representation deterministic.
        let mut stmt = conn.prepare(&format!(
            "SELECT e.event, \
             (SELECT e2.category FROM {table} e2 WHERE e2.event = e.event ORDER BY e2.id LIMIT 1), \
             COUNT(*) AS count \
             FROM {table} e GROUP BY e.event ORDER BY count DESC, e.event ASC",
            table = EVENT_TABLE.name
        ))?;
        let frequencies = stmt
            .query_map([], |row| {
                Ok(EventFrequency {
                    event: row.get(0)?,
                    category: row.get(1)?,
                    count: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(frequencies)
    }

    fn wipe(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        VERSIONED_SCHEMAS.last().unwrap().recreate(&conn)
    }
}
