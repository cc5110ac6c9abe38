use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::db::ClinicStore;
use crate::errors::StoreResult;
use crate::models::DayAvailability;

const OUTLOOK_DAYS: i64 = 7;

/// Next date falling on `target`, one to seven days after `today`.
pub fn date_from_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let offset = match (wanted - current).rem_euclid(7) {
        0 => 7,
        n => n,
    };
    today + Duration::days(offset)
}

pub fn availability_outlook(
    store: &dyn ClinicStore,
    today: NaiveDate,
) -> StoreResult<Vec<DayAvailability>> {
    let mut days = Vec::with_capacity(OUTLOOK_DAYS as usize - 1);
    for i in 1..=OUTLOOK_DAYS {
        let date = today + Duration::days(i);
        if date.weekday() == Weekday::Sun {
            continue;
        }
        let open_slots = store.list_available_slots(date)?.len();
        days.push(DayAvailability {
            date,
            weekday: date.weekday(),
            open_slots,
        });
    }
    Ok(days)
}
