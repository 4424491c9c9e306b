use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A stored reservation, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub field: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied data for a new reservation. `phone` and `comment` are
/// optional on the wire and default to empty text.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReservationInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub comment: String,
}

/// One bookable unit: a field at a given date and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub date: String,
    pub time: String,
    pub field: String,
}

impl ReservationInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: date.into(),
            time: time.into(),
            field: field.into(),
            ..Default::default()
        }
    }

    /// Mandatory fields must be present and non-blank.
    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        for (label, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("date", &self.date),
            ("time", &self.time),
            ("field", &self.field),
        ] {
            if value.trim().is_empty() {
                missing.push(label);
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingFields(missing))
        }
    }

    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date.clone(),
            time: self.time.clone(),
            field: self.field.clone(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field {} on {} at {}", self.field, self.date, self.time)
    }
}
