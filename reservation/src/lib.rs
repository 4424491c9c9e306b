mod manager;

use abi::{DbConfig, Reservation, ReservationInput};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub type ReservationId = i64;

#[derive(Debug, Clone)]
pub struct ReservationManager {
    pool: SqlitePool,
}

#[async_trait]
pub trait Rsvp: Send + Sync {
    /// make a reservation; rejects conflicting slots
    async fn reserve(&self, input: ReservationInput) -> Result<Reservation, abi::Error>;
    /// exact-match lookup of a slot
    async fn find_by_slot(
        &self,
        date: &str,
        time: &str,
        field: &str,
    ) -> Result<Option<Reservation>, abi::Error>;
    /// true iff the slot is free; pure read
    async fn is_available(&self, date: &str, time: &str, field: &str)
        -> Result<bool, abi::Error>;
    /// times already booked for a date/field pair, unordered
    async fn occupied_times(&self, date: &str, field: &str) -> Result<Vec<String>, abi::Error>;
    /// all reservations ordered by (date, time) ascending
    async fn list_all(&self) -> Result<Vec<Reservation>, abi::Error>;
    /// delete by id; true if a row was removed
    async fn delete(&self, id: ReservationId) -> Result<bool, abi::Error>;
}

impl ReservationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool from config and bring the schema up to date.
    pub async fn from_config(config: &DbConfig) -> Result<Self, abi::Error> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
