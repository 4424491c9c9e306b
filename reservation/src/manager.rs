use crate::{ReservationId, ReservationManager, Rsvp};
use abi::{Error, Reservation, ReservationInput};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

#[async_trait]
impl Rsvp for ReservationManager {
    async fn reserve(&self, input: ReservationInput) -> Result<Reservation, Error> {
        input.validate()?;

        // fail fast on an occupied slot; the unique index on
        // (date, time, field) remains the authoritative check
        if self
            .find_by_slot(&input.date, &input.time, &input.field)
            .await?
            .is_some()
        {
            return Err(Error::SlotTaken(input.slot()));
        }

        let created_at = Utc::now();
        let row = sqlx::query(
            "INSERT INTO reservations (name, email, phone, date, time, field, comment, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.date)
        .bind(&input.time)
        .bind(&input.field)
        .bind(&input.comment)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // two concurrent reserves may both pass the pre-check; the
            // constraint violation is then the real conflict signal
            if Error::is_unique_violation(&e) {
                Error::SlotTaken(input.slot())
            } else {
                e.into()
            }
        })?;

        let id: i64 = row.get(0);
        debug!(id, slot = %input.slot(), "reservation committed");

        Ok(Reservation {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            date: input.date,
            time: input.time,
            field: input.field,
            comment: input.comment,
            created_at,
        })
    }

    async fn find_by_slot(
        &self,
        date: &str,
        time: &str,
        field: &str,
    ) -> Result<Option<Reservation>, Error> {
        let rsvp = sqlx::query_as(
            "SELECT * FROM reservations WHERE date = ? AND time = ? AND field = ?",
        )
        .bind(date)
        .bind(time)
        .bind(field)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rsvp)
    }

    async fn is_available(
        &self,
        date: &str,
        time: &str,
        field: &str,
    ) -> Result<bool, Error> {
        Ok(self.find_by_slot(date, time, field).await?.is_none())
    }

    async fn occupied_times(&self, date: &str, field: &str) -> Result<Vec<String>, Error> {
        let times = sqlx::query_scalar(
            "SELECT time FROM reservations WHERE date = ? AND field = ?",
        )
        .bind(date)
        .bind(field)
        .fetch_all(&self.pool)
        .await?;
        Ok(times)
    }

    async fn list_all(&self) -> Result<Vec<Reservation>, Error> {
        let rsvps = sqlx::query_as("SELECT * FROM reservations ORDER BY date, time")
            .fetch_all(&self.pool)
            .await?;
        Ok(rsvps)
    }

    async fn delete(&self, id: ReservationId) -> Result<bool, Error> {
        let res = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
