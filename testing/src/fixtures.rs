//! Builders for catalog data and a ready-made seeded store.

#![allow(clippy::unwrap_used)] // Fixtures take literal dates and times
#![allow(clippy::missing_panics_doc)] // Panics only on malformed literals

use crate::mocks::FixedClock;
use crate::store::InMemoryBookingStore;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta};
use tourbook_core::{Experience, ExperienceId, Money, PromoCode, Slot, SlotId};

/// Experience in the seeded catalog priced at 89.
pub const DESERT_SAFARI: ExperienceId = ExperienceId(1);
/// Experience in the seeded catalog priced at 45.
pub const KAYAK_TOUR: ExperienceId = ExperienceId(2);
/// Experience in the seeded catalog with no slots.
pub const COOKING_CLASS: ExperienceId = ExperienceId(3);

/// Desert safari slot today at 08:00, already started at the clock's 10:30.
pub const STARTED_TODAY_SLOT: SlotId = SlotId(9);
/// Desert safari slot dated the day before the clock.
pub const PAST_SLOT: SlotId = SlotId(10);
/// Desert safari slot tomorrow at 09:00, 8 of 8 spots left.
pub const MORNING_SLOT: SlotId = SlotId(11);
/// Desert safari slot tomorrow at 16:30, 1 of 6 spots left.
pub const LAST_SPOT_SLOT: SlotId = SlotId(12);
/// Desert safari slot in three days at 07:00, fully booked.
pub const SOLD_OUT_SLOT: SlotId = SlotId(13);
/// Kayak tour slot tomorrow at 10:00, 12 of 12 spots left.
pub const KAYAK_SLOT: SlotId = SlotId(20);

/// An experience with the given id, title and whole-unit price.
///
/// `created_at` grows with the id, so higher ids list first.
#[must_use]
pub fn experience(id: i64, title: &str, price: i64) -> Experience {
    Experience {
        id: ExperienceId::new(id),
        title: title.to_string(),
        description: format!("{title}, guided and fully equipped."),
        location: "Dubai".to_string(),
        price: Money::from_major(price),
        duration: "4 hours".to_string(),
        category: "Adventure".to_string(),
        rating: 4.8,
        reviews: 120,
        image_url: format!("https://images.example.com/{id}.jpg"),
        created_at: DateTime::UNIX_EPOCH + TimeDelta::days(id),
    }
}

/// A slot with all `spots` still available.
///
/// `date` is `YYYY-MM-DD`, `time` is `HH:MM` (24-hour).
#[must_use]
pub fn slot(id: i64, experience_id: i64, date: &str, time: &str, spots: u32) -> Slot {
    Slot {
        id: SlotId::new(id),
        experience_id: ExperienceId::new(experience_id),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        available_spots: spots,
        total_spots: spots,
    }
}

/// A promo code worth `discount` whole units.
#[must_use]
pub fn promo(code: &str, discount: i64, active: bool) -> PromoCode {
    PromoCode {
        code: code.to_string(),
        discount: Money::from_major(discount),
        active,
    }
}

/// A store holding a small catalog laid out around `clock`'s date.
///
/// Active promo codes are `SAVE10`, `FLAT100` and `WELCOME20`; `EXPIRED5` is
/// switched off.
#[must_use]
pub fn seeded_store(clock: &FixedClock) -> InMemoryBookingStore {
    let today = clock.today();
    let day = |offset: i64| {
        let date = if offset < 0 {
            today.checked_sub_days(Days::new(offset.unsigned_abs()))
        } else {
            today.checked_add_days(Days::new(offset.unsigned_abs()))
        };
        date.unwrap().format("%Y-%m-%d").to_string()
    };

    let store = InMemoryBookingStore::new();
    store.insert_experience(experience(DESERT_SAFARI.get(), "Desert Safari", 89));
    store.insert_experience(experience(KAYAK_TOUR.get(), "Mangrove Kayak Tour", 45));
    store.insert_experience(experience(COOKING_CLASS.get(), "Emirati Cooking Class", 60));

    store.insert_slot(slot(STARTED_TODAY_SLOT.get(), DESERT_SAFARI.get(), &day(0), "08:00", 8));
    store.insert_slot(slot(PAST_SLOT.get(), DESERT_SAFARI.get(), &day(-1), "09:00", 8));
    store.insert_slot(slot(MORNING_SLOT.get(), DESERT_SAFARI.get(), &day(1), "09:00", 8));

    let mut last_spot = slot(LAST_SPOT_SLOT.get(), DESERT_SAFARI.get(), &day(1), "16:30", 6);
    last_spot.available_spots = 1;
    store.insert_slot(last_spot);

    let mut sold_out = slot(SOLD_OUT_SLOT.get(), DESERT_SAFARI.get(), &day(3), "07:00", 4);
    sold_out.available_spots = 0;
    store.insert_slot(sold_out);

    store.insert_slot(slot(KAYAK_SLOT.get(), KAYAK_TOUR.get(), &day(1), "10:00", 12));

    store.insert_promo(promo("SAVE10", 10, true));
    store.insert_promo(promo("FLAT100", 100, true));
    store.insert_promo(promo("WELCOME20", 20, true));
    store.insert_promo(promo("EXPIRED5", 5, false));
    store
}
