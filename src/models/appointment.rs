use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub confirmation_code: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub service_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_name: String,
    pub patient_phone: String,
    pub service_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCriterion {
    Name,
    Phone,
    ConfirmationCode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentSummary {
    pub confirmation_code: String,
    pub patient_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service_name: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotFound,
}

impl CancelOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            CancelOutcome::Cancelled => "Cita cancelada exitosamente",
            CancelOutcome::NotFound => "Cita no encontrada o ya cancelada",
        }
    }
}

pub fn confirmation_code_at(ts: &NaiveDateTime) -> String {
    format!("MC{}", ts.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_code_format() {
        let ts = NaiveDateTime::parse_from_str("2024-12-20 14:52:30", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(confirmation_code_at(&ts), "MC20241220145230");
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!(AppointmentStatus::parse("confirmed"), Some(AppointmentStatus::Confirmed));
        assert_eq!(AppointmentStatus::parse("cancelled"), Some(AppointmentStatus::Cancelled));
        assert_eq!(AppointmentStatus::parse("pending"), None);
    }
}
