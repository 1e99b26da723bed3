//! `PostgreSQL` booking store for Tourbook.
//!
//! This crate implements the `BookingStore` trait from `tourbook-core` on top
//! of sqlx. It provides:
//!
//! - Catalog reads (experiences, slots, promo codes)
//! - Transactional booking writes with row-level slot locking
//! - Embedded schema migrations
//!
//! # Example
//!
//! ```no_run
//! use tourbook_postgres::PostgresBookingStore;
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgres://localhost/tourbook").await?;
//! let store = PostgresBookingStore::new(pool);
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::PgPool;
use tourbook_core::booking::ensure_capacity;
use tourbook_core::{
    Booking, BookingCode, BookingDetail, BookingDraft, BookingError, BookingStatus, BookingStore,
    Experience, ExperienceId, Money, PromoCode, Slot, SlotId, StoreError, StoreFuture,
};
use tracing::Instrument;

const EXPERIENCE_COLUMNS: &str = "id, title, description, location, price_cents, duration, \
     category, rating, reviews, image_url, created_at";

const SLOT_COLUMNS: &str = "id, experience_id, date, time, available_spots, total_spots";

const BOOKING_COLUMNS: &str = "id, booking_id, experience_id, slot_id, name, email, phone, \
     guests, promo_code, discount_cents, total_amount_cents, status, created_at";

/// `PostgreSQL` booking store.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Migration failed: {e}")))
    }

    async fn fetch_experience(&self, id: ExperienceId) -> Result<Option<Experience>, StoreError> {
        let row: Option<ExperienceRow> = sqlx::query_as(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to load experience: {e}")))?;

        row.map(Experience::try_from).transpose()
    }

    async fn fetch_slot(&self, id: SlotId) -> Result<Option<Slot>, StoreError> {
        let row: Option<SlotRow> =
            sqlx::query_as(&format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = $1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::DatabaseError(format!("Failed to load slot: {e}")))?;

        row.map(Slot::try_from).transpose()
    }

    async fn write_booking(&self, draft: BookingDraft) -> Result<Booking, BookingError> {
        let request = &draft.request;

        let mut tx = self.pool.begin().await.map_err(|e| {
            StoreError::DatabaseError(format!("Failed to start transaction: {e}"))
        })?;

        // Concurrent bookings for this slot queue here until we commit or roll back
        let locked: Option<(i32, i64)> = sqlx::query_as(
            "SELECT s.available_spots, e.price_cents
             FROM slots s
             JOIN experiences e ON e.id = s.experience_id
             WHERE s.id = $1 AND s.experience_id = $2
             FOR UPDATE OF s",
        )
        .bind(request.slot_id.get())
        .bind(request.experience_id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to lock slot: {e}")))?;

        // Returning early drops `tx`, which rolls it back
        let (available, price_cents) = locked.ok_or(BookingError::SlotNotFound(request.slot_id))?;
        let available = to_count(available, "available_spots")?;
        ensure_capacity(available, request.guests)?;

        let guests = i32::try_from(request.guests)
            .map_err(|_| StoreError::CorruptRecord(format!("guests out of range: {}", request.guests)))?;
        let quote = draft.quote(Money::from_cents(price_cents));

        sqlx::query("UPDATE slots SET available_spots = available_spots - $2 WHERE id = $1")
            .bind(request.slot_id.get())
            .bind(guests)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to update slot: {e}")))?;

        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO bookings
                (booking_id, experience_id, slot_id, name, email, phone, guests,
                 promo_code, discount_cents, total_amount_cents, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING id",
        )
        .bind(draft.booking_code.as_str())
        .bind(request.experience_id.get())
        .bind(request.slot_id.get())
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.phone.as_deref())
        .bind(guests)
        .bind(request.promo_code.as_deref())
        .bind(quote.discount.cents())
        .bind(quote.total.cents())
        .bind(BookingStatus::Confirmed.as_str())
        .bind(draft.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to insert booking: {e}")))?;

        tx.commit().await.map_err(|e| {
            StoreError::DatabaseError(format!("Failed to commit transaction: {e}"))
        })?;

        tracing::debug!(id, remaining = available - request.guests, "Booking committed");
        Ok(draft.into_booking(id, quote))
    }

    async fn read_booking(&self, code: BookingCode) -> Result<Option<BookingDetail>, StoreError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to load booking: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let booking = Booking::try_from(row)?;

        let experience = self.fetch_experience(booking.experience_id).await?.ok_or_else(|| {
            StoreError::CorruptRecord(format!("booking {code} references a missing experience"))
        })?;
        let slot = self.fetch_slot(booking.slot_id).await?.ok_or_else(|| {
            StoreError::CorruptRecord(format!("booking {code} references a missing slot"))
        })?;

        Ok(Some(BookingDetail {
            booking,
            experience,
            slot,
        }))
    }
}

impl BookingStore for PostgresBookingStore {
    fn ping(&self) -> StoreFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| StoreError::DatabaseError(format!("Ping failed: {e}")))
        })
    }

    fn list_experiences(&self) -> StoreFuture<'_, Result<Vec<Experience>, StoreError>> {
        Box::pin(async move {
            let rows: Vec<ExperienceRow> = sqlx::query_as(&format!(
                "SELECT {EXPERIENCE_COLUMNS} FROM experiences ORDER BY created_at DESC, id DESC"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to list experiences: {e}")))?;

            rows.into_iter().map(Experience::try_from).collect()
        })
    }

    fn find_experience(
        &self,
        id: ExperienceId,
    ) -> StoreFuture<'_, Result<Option<Experience>, StoreError>> {
        Box::pin(self.fetch_experience(id))
    }

    fn list_slots(
        &self,
        experience_id: ExperienceId,
        after: NaiveDateTime,
    ) -> StoreFuture<'_, Result<Vec<Slot>, StoreError>> {
        Box::pin(async move {
            let rows: Vec<SlotRow> = sqlx::query_as(&format!(
                "SELECT {SLOT_COLUMNS} FROM slots
                 WHERE experience_id = $1
                   AND (date > $2 OR (date = $2 AND time > $3))
                 ORDER BY date ASC, time ASC"
            ))
            .bind(experience_id.get())
            .bind(after.date())
            .bind(after.time())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to list slots: {e}")))?;

            rows.into_iter().map(Slot::try_from).collect()
        })
    }

    fn find_active_promo(
        &self,
        code: String,
    ) -> StoreFuture<'_, Result<Option<PromoCode>, StoreError>> {
        Box::pin(async move {
            let row: Option<(String, i64, bool)> = sqlx::query_as(
                "SELECT code, discount_cents, active FROM promo_codes
                 WHERE code = $1 AND active = true",
            )
            .bind(&code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to look up promo code: {e}")))?;

            Ok(row.map(|(code, discount_cents, active)| PromoCode {
                code,
                discount: Money::from_cents(discount_cents),
                active,
            }))
        })
    }

    fn create_booking(&self, draft: BookingDraft) -> StoreFuture<'_, Result<Booking, BookingError>> {
        let span = tracing::debug_span!(
            "create_booking",
            booking_id = %draft.booking_code,
            slot_id = %draft.request.slot_id,
            guests = draft.request.guests,
        );
        Box::pin(self.write_booking(draft).instrument(span))
    }

    fn find_booking(
        &self,
        code: BookingCode,
    ) -> StoreFuture<'_, Result<Option<BookingDetail>, StoreError>> {
        Box::pin(self.read_booking(code))
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn to_count(value: i32, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value)
        .map_err(|_| StoreError::CorruptRecord(format!("negative {column}: {value}")))
}

#[derive(sqlx::FromRow)]
struct ExperienceRow {
    id: i64,
    title: String,
    description: String,
    location: String,
    price_cents: i64,
    duration: String,
    category: String,
    rating: f64,
    reviews: i32,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ExperienceRow> for Experience {
    type Error = StoreError;

    fn try_from(row: ExperienceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ExperienceId::new(row.id),
            title: row.title,
            description: row.description,
            location: row.location,
            price: Money::from_cents(row.price_cents),
            duration: row.duration,
            category: row.category,
            rating: row.rating,
            reviews: row.reviews,
            image_url: row.image_url,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SlotRow {
    id: i64,
    experience_id: i64,
    date: NaiveDate,
    time: NaiveTime,
    available_spots: i32,
    total_spots: i32,
}

impl TryFrom<SlotRow> for Slot {
    type Error = StoreError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SlotId::new(row.id),
            experience_id: ExperienceId::new(row.experience_id),
            date: row.date,
            time: row.time,
            available_spots: to_count(row.available_spots, "available_spots")?,
            total_spots: to_count(row.total_spots, "total_spots")?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    booking_id: String,
    experience_id: i64,
    slot_id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    guests: i32,
    promo_code: Option<String>,
    discount_cents: i64,
    total_amount_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status).ok_or_else(|| {
            StoreError::CorruptRecord(format!("unknown booking status: {}", row.status))
        })?;

        Ok(Self {
            id: row.id,
            booking_id: BookingCode::new(row.booking_id),
            experience_id: ExperienceId::new(row.experience_id),
            slot_id: SlotId::new(row.slot_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            guests: to_count(row.guests, "guests")?,
            promo_code: row.promo_code,
            discount: Money::from_cents(row.discount_cents),
            total_amount: Money::from_cents(row.total_amount_cents),
            status,
            created_at: row.created_at,
        })
    }
}
