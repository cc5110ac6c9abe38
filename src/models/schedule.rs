use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Serialize;

/// Daily slot grid: mornings 09:00-12:30 and afternoons 14:00-17:30, every 30 minutes.
const SLOT_GRID: [(u32, u32); 16] = [
    (9, 0),
    (9, 30),
    (10, 0),
    (10, 30),
    (11, 0),
    (11, 30),
    (12, 0),
    (12, 30),
    (14, 0),
    (14, 30),
    (15, 0),
    (15, 30),
    (16, 0),
    (16, 30),
    (17, 0),
    (17, 30),
];

pub fn day_slots() -> Vec<NaiveTime> {
    SLOT_GRID
        .iter()
        .filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .collect()
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miércoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityLevel {
    Good,
    Limited,
    None,
}

impl AvailabilityLevel {
    pub fn from_open_slots(count: usize) -> Self {
        match count {
            0 => AvailabilityLevel::None,
            1..=5 => AvailabilityLevel::Limited,
            _ => AvailabilityLevel::Good,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub open_slots: usize,
}

impl DayAvailability {
    pub fn level(&self) -> AvailabilityLevel {
        AvailabilityLevel::from_open_slots(self.open_slots)
    }
}
