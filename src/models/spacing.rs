//! Leitner-style spacing tracker.
//!
//! A `SpacingTracker` owns a "days until repetition" counter and the date the
//! item is next due:
//! - Correct recall roughly doubles the interval (`n * 2 + 1`)
//! - Incorrect recall halves it (integer division)
//!
//! The due date is always recomputed from the interval; callers never set it
//! directly.

use chrono::{DateTime, Days, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpacingTracker {
    /// Starts at zero
    #[serde(
        rename = "daysUntilRepetition",
        default,
        deserialize_with = "lenient_days"
    )]
    days_until_repetition: u32,

    /// Starts at today
    #[serde(rename = "dueDate")]
    due_date: DateTime<Local>,
}

impl SpacingTracker {
    /// Creates a tracker with a zero interval, due immediately.
    pub fn new() -> Self {
        Self {
            days_until_repetition: 0,
            due_date: Local::now(),
        }
    }

    /// Rebuilds a tracker from previously persisted state.
    pub fn from_parts(days_until_repetition: u32, due_date: DateTime<Local>) -> Self {
        Self {
            days_until_repetition,
            due_date,
        }
    }

    pub fn days_until_repetition(&self) -> u32 {
        self.days_until_repetition
    }

    pub fn due_date(&self) -> DateTime<Local> {
        self.due_date
    }

    /// Call this after an item is recalled correctly to increment the spacing.
    pub fn increase_spacing(&mut self) {
        // Saturates rather than overflowing, so the operation never fails.
        self.days_until_repetition = self.days_until_repetition.saturating_mul(2).saturating_add(1);
        self.adjust_due_date(self.days_until_repetition);
    }

    /// Call this after an item is recalled incorrectly to decrement the spacing.
    pub fn decrease_spacing(&mut self) {
        // Integer division discards any remainder, that is intentional.
        self.days_until_repetition /= 2;
        self.adjust_due_date(self.days_until_repetition);
    }

    /// Recomputes the due date for the just-updated interval.
    ///
    /// A zero interval means the item is due right now. Otherwise the interval
    /// is added to the previous due date (not to "now") in calendar days, so
    /// month/year boundaries and DST transitions are respected. If the day
    /// addition fails the due date is left as it was.
    fn adjust_due_date(&mut self, spacing: u32) {
        if spacing == 0 {
            self.due_date = Local::now();
        } else if let Some(next_due_date) = self.due_date.checked_add_days(Days::new(spacing as u64))
        {
            self.due_date = next_due_date;
        }
    }
}

impl Default for SpacingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpacingTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Days until repetition: {}\nDue date: {}",
            self.days_until_repetition, self.due_date
        )
    }
}

/// Accepts a missing or malformed interval field by falling back to zero.
/// Only the due date is required to restore a tracker.
fn lenient_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0))
}
