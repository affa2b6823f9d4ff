//! Habit storage.
//!
//! Persists habits and completions to the local database and implements
//! the [`HabitStore`] contract over it.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::{debug, info};

use super::Database;
use crate::core::{format_timestamp, DayBoundary, HabitStore};
use crate::error::HabitError;
use crate::habits::{
    validation, Completion, CreateHabitData, Frequency, Habit, HabitId, Toggle, UpdateHabitData,
    DEFAULT_HABIT_COLOR, DEFAULT_REMINDER_TIME,
};

const HABIT_COLUMNS: &str = "id, user_id, name, description, target_frequency, color, \
                             reminder_enabled, reminder_time, created_at, updated_at";

/// `SQLite`-backed habit store.
pub struct HabitStorage {
    db: Database,
}

impl HabitStorage {
    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Open storage at a specific database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &std::path::Path) -> Result<Self, HabitError> {
        Database::open_at(path).map(Self::with_database)
    }

    fn fetch_habit(&self, row_id: i64) -> Result<Option<Habit>, HabitError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"))
            .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([row_id], read_habit_row)
            .optional()
            .map_err(|e| HabitError::Database(format!("Failed to query habit: {e}")))?
            .map(HabitRow::into_habit)
            .transpose()
    }
}

impl HabitStore for HabitStorage {
    fn list_habits(&self, owner: &str) -> Result<Vec<Habit>, HabitError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {HABIT_COLUMNS} FROM habits
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([owner], read_habit_row)
            .map_err(|e| HabitError::Database(format!("Failed to query habits: {e}")))?;

        let mut habits = Vec::new();
        for row in rows {
            let row = row.map_err(|e| HabitError::Database(e.to_string()))?;
            habits.push(row.into_habit()?);
        }

        Ok(habits)
    }

    fn list_completions(&self, habit_ids: &[HabitId]) -> Result<Vec<Completion>, HabitError> {
        // Ids that are not row ids cannot have completions.
        let row_ids: Vec<i64> = habit_ids
            .iter()
            .filter_map(|id| id.as_str().parse().ok())
            .collect();
        if row_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; row_ids.len()].join(", ");
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, habit_id, completed_at FROM habit_completions
                 WHERE habit_id IN ({placeholders})
                 ORDER BY completed_at DESC"
            ))
            .map_err(|e| HabitError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params_from_iter(row_ids.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(|e| HabitError::Database(format!("Failed to query completions: {e}")))?;

        let mut completions = Vec::new();
        for row in rows {
            let (id, habit_id, completed_at) =
                row.map_err(|e| HabitError::Database(e.to_string()))?;
            completions.push(Completion {
                id: id.to_string(),
                habit_id: HabitId::new(habit_id.to_string()),
                completed_at: parse_stored(&completed_at)?,
            });
        }

        Ok(completions)
    }

    fn get_habit(&self, id: &HabitId) -> Result<Habit, HabitError> {
        self.fetch_habit(row_id(id)?)?
            .ok_or_else(|| HabitError::NotFound(format!("Habit {id}")))
    }

    fn create_habit(
        &self,
        owner: &str,
        data: &CreateHabitData,
        now: DateTime<Utc>,
    ) -> Result<Habit, HabitError> {
        let data = data.validate()?;
        let conn = self.db.connection();
        let stamp = format_timestamp(now);

        conn.execute(
            r"INSERT INTO habits
              (user_id, name, description, target_frequency, color,
               reminder_enabled, reminder_time, created_at, updated_at)
              VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?7)",
            params![
                owner,
                data.name,
                data.description.filter(|d| !d.is_empty()),
                data.target_frequency.as_str(),
                data.color.as_deref().unwrap_or(DEFAULT_HABIT_COLOR),
                DEFAULT_REMINDER_TIME,
                stamp,
            ],
        )
        .map_err(|e| HabitError::Database(format!("Failed to insert habit: {e}")))?;

        let id = HabitId::new(conn.last_insert_rowid().to_string());
        info!(%id, owner, "created habit");
        self.get_habit(&id)
    }

    fn update_habit(
        &self,
        id: &HabitId,
        patch: &UpdateHabitData,
        now: DateTime<Utc>,
    ) -> Result<Habit, HabitError> {
        let patch = patch.validate()?;
        let mut habit = self.get_habit(id)?;

        if let Some(name) = patch.name {
            habit.name = name;
        }
        if let Some(description) = patch.description {
            habit.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(frequency) = patch.target_frequency {
            habit.target_frequency = frequency;
        }
        if let Some(color) = patch.color {
            habit.color = color;
        }
        habit.updated_at = now;

        self.db
            .connection()
            .execute(
                r"UPDATE habits SET
                  name = ?1,
                  description = ?2,
                  target_frequency = ?3,
                  color = ?4,
                  updated_at = ?5
                  WHERE id = ?6",
                params![
                    habit.name,
                    habit.description,
                    habit.target_frequency.as_str(),
                    habit.color,
                    format_timestamp(now),
                    row_id(id)?,
                ],
            )
            .map_err(|e| HabitError::Database(format!("Failed to update habit: {e}")))?;

        info!(%id, "updated habit");
        Ok(habit)
    }

    fn delete_habit(&self, id: &HabitId) -> Result<(), HabitError> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM habits WHERE id = ?1", [row_id(id)?])
            .map_err(|e| HabitError::Database(format!("Failed to delete habit: {e}")))?;

        if rows == 0 {
            return Err(HabitError::NotFound(format!("Habit {id}")));
        }

        info!(%id, "deleted habit");
        Ok(())
    }

    fn toggle_completion(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        now: DateTime<Utc>,
        boundary: &DayBoundary,
    ) -> Result<Toggle, HabitError> {
        let row = row_id(habit_id)?;
        if self.fetch_habit(row)?.is_none() {
            return Err(HabitError::NotFound(format!("Habit {habit_id}")));
        }

        let today = boundary.today(now);
        if day > today {
            return Err(HabitError::Validation(format!(
                "Cannot complete a habit on a future day ({day})"
            )));
        }

        let tx = self
            .db
            .connection()
            .unchecked_transaction()
            .map_err(|e| HabitError::Database(format!("Failed to begin transaction: {e}")))?;

        let removed = tx
            .execute(
                r"DELETE FROM habit_completions
                  WHERE habit_id = ?1 AND completed_at >= ?2 AND completed_at <= ?3",
                params![
                    row,
                    format_timestamp(boundary.start_of_day(day)),
                    format_timestamp(boundary.end_of_day(day)),
                ],
            )
            .map_err(|e| HabitError::Database(format!("Failed to delete completions: {e}")))?;

        let outcome = if removed > 0 {
            Toggle::Uncompleted
        } else {
            let completed_at = if day == today { now } else { boundary.midday(day) };
            tx.execute(
                r"INSERT INTO habit_completions (habit_id, completed_at, created_at)
                  VALUES (?1, ?2, ?3)",
                params![row, format_timestamp(completed_at), format_timestamp(now)],
            )
            .map_err(|e| HabitError::Database(format!("Failed to insert completion: {e}")))?;
            Toggle::Completed
        };

        tx.commit()
            .map_err(|e| HabitError::Database(format!("Failed to commit toggle: {e}")))?;

        debug!(%habit_id, %day, removed, ?outcome, "toggled completion");
        Ok(outcome)
    }

    fn set_reminder(
        &self,
        owner: &str,
        id: &HabitId,
        enabled: bool,
        time: &str,
        now: DateTime<Utc>,
    ) -> Result<Habit, HabitError> {
        validation::validate_reminder_time(time)?;

        let mut habit = self.get_habit(id)?;
        if habit.owner != owner {
            return Err(HabitError::NotFound(format!("Habit {id}")));
        }

        self.db
            .connection()
            .execute(
                r"UPDATE habits SET reminder_enabled = ?1, reminder_time = ?2, updated_at = ?3
                  WHERE id = ?4 AND user_id = ?5",
                params![enabled, time, format_timestamp(now), row_id(id)?, owner],
            )
            .map_err(|e| HabitError::Database(format!("Failed to update reminder: {e}")))?;

        habit.reminder_enabled = enabled;
        habit.reminder_time = time.to_string();
        habit.updated_at = now;

        info!(%id, enabled, time, "updated reminder preference");
        Ok(habit)
    }
}

/// Raw column values of a `habits` row, before validation.
struct HabitRow {
    id: i64,
    user_id: String,
    name: String,
    description: Option<String>,
    target_frequency: String,
    color: String,
    reminder_enabled: bool,
    reminder_time: String,
    created_at: String,
    updated_at: String,
}

impl HabitRow {
    fn into_habit(self) -> Result<Habit, HabitError> {
        Ok(Habit {
            id: HabitId::new(self.id.to_string()),
            owner: self.user_id,
            name: self.name,
            description: self.description,
            target_frequency: self.target_frequency.parse::<Frequency>()?,
            color: self.color,
            reminder_enabled: self.reminder_enabled,
            reminder_time: self.reminder_time,
            created_at: parse_stored(&self.created_at)?,
            updated_at: parse_stored(&self.updated_at)?,
        })
    }
}

fn read_habit_row(row: &Row<'_>) -> Result<HabitRow, rusqlite::Error> {
    Ok(HabitRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        target_frequency: row.get(4)?,
        color: row.get(5)?,
        reminder_enabled: row.get(6)?,
        reminder_time: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Row id for a habit id. Non-numeric ids can never exist.
fn row_id(id: &HabitId) -> Result<i64, HabitError> {
    id.as_str()
        .parse()
        .map_err(|_| HabitError::NotFound(format!("Habit {id}")))
}

fn parse_stored(value: &str) -> Result<DateTime<Utc>, HabitError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| HabitError::Parse(format!("Invalid stored timestamp '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn create_test_storage() -> HabitStorage {
        let db = Database::open_in_memory().unwrap();
        HabitStorage::with_database(db)
    }

    fn create(storage: &HabitStorage, owner: &str, name: &str) -> Habit {
        storage
            .create_habit(owner, &CreateHabitData::new(name, Frequency::Daily), now())
            .unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let storage = create_test_storage();
        let habit = create(&storage, "alice", "  Read 10 pages ");

        assert_eq!(habit.name, "Read 10 pages");
        assert_eq!(habit.owner, "alice");
        assert_eq!(habit.color, DEFAULT_HABIT_COLOR);
        assert_eq!(habit.reminder_time, DEFAULT_REMINDER_TIME);
        assert!(!habit.reminder_enabled);
        assert_eq!(habit.created_at, now());

        let loaded = storage.get_habit(&habit.id).unwrap();
        assert_eq!(loaded, habit);
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let storage = create_test_storage();
        let mut data = CreateHabitData::new("", Frequency::Weekly);
        assert!(matches!(
            storage.create_habit("alice", &data, now()),
            Err(HabitError::Validation(_))
        ));

        data.name = "Run".to_string();
        data.color = Some("red".to_string());
        assert!(storage.create_habit("alice", &data, now()).is_err());
        assert!(storage.list_habits("alice").unwrap().is_empty());
    }

    #[test]
    fn test_list_habits_scoped_and_newest_first() {
        let storage = create_test_storage();
        let first = create(&storage, "alice", "First");
        let second = storage
            .create_habit(
                "alice",
                &CreateHabitData::new("Second", Frequency::Weekly),
                now() + Duration::minutes(1),
            )
            .unwrap();
        create(&storage, "bob", "Not yours");

        let habits = storage.list_habits("alice").unwrap();
        let ids: Vec<_> = habits.iter().map(|h| h.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_update_habit() {
        let storage = create_test_storage();
        let habit = create(&storage, "alice", "Walk");
        let later = now() + Duration::hours(1);

        let patch = UpdateHabitData {
            name: Some("Walk outside".to_string()),
            description: Some("At least 20 minutes".to_string()),
            target_frequency: Some(Frequency::Weekly),
            color: Some("#10b981".to_string()),
        };
        let updated = storage.update_habit(&habit.id, &patch, later).unwrap();

        assert_eq!(updated.name, "Walk outside");
        assert_eq!(updated.target_frequency, Frequency::Weekly);
        assert_eq!(updated.updated_at, later);
        assert_eq!(storage.get_habit(&habit.id).unwrap(), updated);

        let clear = UpdateHabitData {
            description: Some(String::new()),
            ..Default::default()
        };
        let cleared = storage.update_habit(&habit.id, &clear, later).unwrap();
        assert!(cleared.description.is_none());
    }

    #[test]
    fn test_update_missing_habit() {
        let storage = create_test_storage();
        let result = storage.update_habit(&HabitId::new("42"), &UpdateHabitData::default(), now());
        assert!(matches!(result, Err(HabitError::NotFound(_))));

        let result = storage.get_habit(&HabitId::new("not-a-row"));
        assert!(matches!(result, Err(HabitError::NotFound(_))));
    }

    #[test]
    fn test_toggle_today_twice() {
        let storage = create_test_storage();
        let boundary = DayBoundary::utc();
        let habit = create(&storage, "alice", "Floss");
        let today = boundary.today(now());

        let first = storage.toggle_completion(&habit.id, today, now(), &boundary).unwrap();
        assert_eq!(first, Toggle::Completed);

        let completions = storage.list_completions(&[habit.id.clone()]).unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].completed_at, now());

        let second = storage.toggle_completion(&habit.id, today, now(), &boundary).unwrap();
        assert_eq!(second, Toggle::Uncompleted);
        assert!(storage.list_completions(&[habit.id]).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_past_day_backfills_midday() {
        let storage = create_test_storage();
        let boundary = DayBoundary::utc();
        let habit = create(&storage, "alice", "Floss");
        let yesterday = boundary.today(now()) - Duration::days(1);

        storage
            .toggle_completion(&habit.id, yesterday, now(), &boundary)
            .unwrap();
        let completions = storage.list_completions(&[habit.id]).unwrap();
        assert_eq!(completions[0].completed_at, boundary.midday(yesterday));
    }

    #[test]
    fn test_toggle_removes_every_completion_that_day() {
        let storage = create_test_storage();
        let boundary = DayBoundary::utc();
        let habit = create(&storage, "alice", "Water");
        let today = boundary.today(now());

        let conn = storage.db.connection();
        for hour in [1, 9, 23] {
            let at = boundary.start_of_day(today) + Duration::hours(hour);
            conn.execute(
                "INSERT INTO habit_completions (habit_id, completed_at, created_at) VALUES (?1, ?2, ?2)",
                params![habit.id.as_str().parse::<i64>().unwrap(), format_timestamp(at)],
            )
            .unwrap();
        }
        let yesterday_noon = boundary.midday(today - Duration::days(1));
        conn.execute(
            "INSERT INTO habit_completions (habit_id, completed_at, created_at) VALUES (?1, ?2, ?2)",
            params![habit.id.as_str().parse::<i64>().unwrap(), format_timestamp(yesterday_noon)],
        )
        .unwrap();

        let outcome = storage.toggle_completion(&habit.id, today, now(), &boundary).unwrap();
        assert_eq!(outcome, Toggle::Uncompleted);

        let remaining = storage.list_completions(&[habit.id]).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].completed_at, yesterday_noon);
    }

    #[test]
    fn test_toggle_respects_offset_day() {
        let storage = create_test_storage();
        // UTC-5: 09:30 UTC is 04:30 local on the same day
        let boundary = DayBoundary::from_offset_minutes(-300).unwrap();
        let habit = create(&storage, "alice", "Journal");
        let today = boundary.today(now());

        storage.toggle_completion(&habit.id, today, now(), &boundary).unwrap();
        // The previous local day runs until 05:00 UTC today and must be untouched
        let previous = storage
            .toggle_completion(&habit.id, today - Duration::days(1), now(), &boundary)
            .unwrap();
        assert_eq!(previous, Toggle::Completed);
        assert_eq!(storage.list_completions(&[habit.id]).unwrap().len(), 2);
    }

    #[test]
    fn test_toggle_future_day_rejected() {
        let storage = create_test_storage();
        let boundary = DayBoundary::utc();
        let habit = create(&storage, "alice", "Floss");
        let tomorrow = boundary.today(now()) + Duration::days(1);

        let result = storage.toggle_completion(&habit.id, tomorrow, now(), &boundary);
        assert!(matches!(result, Err(HabitError::Validation(_))));
    }

    #[test]
    fn test_toggle_missing_habit() {
        let storage = create_test_storage();
        let boundary = DayBoundary::utc();
        let result =
            storage.toggle_completion(&HabitId::new("7"), boundary.today(now()), now(), &boundary);
        assert!(matches!(result, Err(HabitError::NotFound(_))));
    }

    #[test]
    fn test_delete_cascades_completions() {
        let storage = create_test_storage();
        let boundary = DayBoundary::utc();
        let habit = create(&storage, "alice", "Stretch");
        storage
            .toggle_completion(&habit.id, boundary.today(now()), now(), &boundary)
            .unwrap();

        storage.delete_habit(&habit.id).unwrap();

        let orphans: i64 = storage
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM habit_completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
        assert!(matches!(
            storage.delete_habit(&habit.id),
            Err(HabitError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_completions_for_several_habits() {
        let storage = create_test_storage();
        let boundary = DayBoundary::utc();
        let a = create(&storage, "alice", "A");
        let b = create(&storage, "alice", "B");
        let today = boundary.today(now());

        storage.toggle_completion(&a.id, today, now(), &boundary).unwrap();
        storage
            .toggle_completion(&b.id, today - Duration::days(2), now(), &boundary)
            .unwrap();

        let all = storage.list_completions(&[a.id.clone(), b.id.clone()]).unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].habit_id, a.id);

        assert!(storage.list_completions(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_set_reminder() {
        let storage = create_test_storage();
        let habit = create(&storage, "alice", "Vitamins");

        let updated = storage
            .set_reminder("alice", &habit.id, true, "21:15", now())
            .unwrap();
        assert!(updated.reminder_enabled);
        assert_eq!(updated.reminder_time, "21:15");
        assert_eq!(storage.get_habit(&habit.id).unwrap(), updated);

        assert!(matches!(
            storage.set_reminder("mallory", &habit.id, false, "08:00", now()),
            Err(HabitError::NotFound(_))
        ));
        assert!(matches!(
            storage.set_reminder("alice", &habit.id, true, "25:00", now()),
            Err(HabitError::Validation(_))
        ));
    }

    #[test]
    fn test_corrupt_timestamp_is_rejected() {
        let storage = create_test_storage();
        let habit = create(&storage, "alice", "Sleep early");
        storage
            .db
            .connection()
            .execute(
                "INSERT INTO habit_completions (habit_id, completed_at, created_at) VALUES (?1, 'yesterday', 'x')",
                [habit.id.as_str().parse::<i64>().unwrap()],
            )
            .unwrap();

        assert!(matches!(
            storage.list_completions(&[habit.id]),
            Err(HabitError::Parse(_))
        ));
    }
}
