//! Database operations for spacing trackers
//!
//! Handles SQLite database initialization and save/load of the two persisted
//! tracker fields: the interval and the due date. Whole-collection scheduling
//! queries live with the caller, not here.

use crate::models::SpacingTracker;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Initializes the SQLite database with the spacing table
pub fn init_database() -> Result<Connection> {
    let conn = Connection::open("db.sqlite3")?;
    create_tables(&conn)?;
    Ok(conn)
}

/// Creates the spacing table on an existing connection
///
/// One row per tracked item, keyed by the item's name. The due date is stored
/// as unix seconds.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS spacing (
            item TEXT PRIMARY KEY,
            days_until_repetition INTEGER NOT NULL DEFAULT 0,
            due_date INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Saves a tracker's state under the given item name, replacing any previous row
pub fn save_tracker(item: &str, tracker: &SpacingTracker, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO spacing (item, days_until_repetition, due_date)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(item) DO UPDATE SET days_until_repetition = ?2, due_date = ?3",
        params![
            item,
            tracker.days_until_repetition(),
            tracker.due_date().timestamp()
        ],
    )?;

    Ok(())
}

/// Loads a tracker's state by item name
///
/// Returns `Ok(None)` when the item has never been saved. A malformed interval
/// column falls back to zero; an out-of-range due date aborts the load since a
/// tracker cannot be restored without one.
pub fn load_tracker(item: &str, conn: &Connection) -> Result<Option<SpacingTracker>> {
    conn.query_row(
        "SELECT days_until_repetition, due_date FROM spacing WHERE item = ?1",
        params![item],
        |row| {
            let days: u32 = row.get(0).unwrap_or(0);
            let secs: i64 = row.get(1)?;

            let due_date = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Integer,
                        format!("due date timestamp out of range: {secs}").into(),
                    )
                })?
                .with_timezone(&Local);

            Ok(SpacingTracker::from_parts(days, due_date))
        },
    )
    .optional()
}

/// Retrieves all item names with saved spacing state
pub fn get_all_items(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT item FROM spacing ORDER BY item")?;
    let items = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let conn = test_connection();

        let mut tracker = SpacingTracker::new();
        tracker.increase_spacing();
        tracker.increase_spacing();

        save_tracker("cześć", &tracker, &conn).unwrap();
        let restored = load_tracker("cześć", &conn).unwrap().unwrap();

        assert_eq!(
            restored.days_until_repetition(),
            tracker.days_until_repetition()
        );
        // Stored at seconds precision
        assert_eq!(
            restored.due_date().timestamp(),
            tracker.due_date().timestamp()
        );
    }

    #[test]
    fn test_load_unknown_item_returns_none() {
        let conn = test_connection();
        let result = load_tracker("never saved", &conn).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_replaces_previous_state() {
        let conn = test_connection();

        let mut tracker = SpacingTracker::new();
        save_tracker("dziękuję", &tracker, &conn).unwrap();

        tracker.increase_spacing();
        save_tracker("dziękuję", &tracker, &conn).unwrap();

        let restored = load_tracker("dziękuję", &conn).unwrap().unwrap();
        assert_eq!(restored.days_until_repetition(), 1);
    }

    #[test]
    fn test_malformed_interval_column_defaults_to_zero() {
        let conn = test_connection();

        let due = Local::now().checked_add_days(Days::new(3)).unwrap();
        conn.execute(
            "INSERT INTO spacing (item, days_until_repetition, due_date) VALUES (?1, ?2, ?3)",
            params!["corrupt", "seven", due.timestamp()],
        )
        .unwrap();

        let restored = load_tracker("corrupt", &conn).unwrap().unwrap();
        assert_eq!(restored.days_until_repetition(), 0);
        assert_eq!(restored.due_date().timestamp(), due.timestamp());
    }

    #[test]
    fn test_get_all_items() {
        let conn = test_connection();

        save_tracker("b", &SpacingTracker::new(), &conn).unwrap();
        save_tracker("a", &SpacingTracker::new(), &conn).unwrap();

        let items = get_all_items(&conn).unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }
}
