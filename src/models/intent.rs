use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ChangeAppointment,
    RequestChange,
    CancelAppointment,
    RequestCancellation,
    SearchAppointment,
    ProcessFullBooking,
    BookAppointment,
    PriceInquiry,
    HoursInquiry,
    Emergency,
    Greeting,
    GeneralInfo,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ChangeAppointment => "change_appointment",
            Intent::RequestChange => "request_change",
            Intent::CancelAppointment => "cancel_appointment",
            Intent::RequestCancellation => "request_cancellation",
            Intent::SearchAppointment => "search_appointment",
            Intent::ProcessFullBooking => "process_full_booking",
            Intent::BookAppointment => "book_appointment",
            Intent::PriceInquiry => "price_inquiry",
            Intent::HoursInquiry => "hours_inquiry",
            Intent::Emergency => "emergency",
            Intent::Greeting => "greeting",
            Intent::GeneralInfo => "general_info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceMatch {
    pub service_id: i64,
    pub doctor_id: i64,
}

/// Fields pulled out of one message. Absent fields are `None`, never errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub service: Option<ServiceMatch>,
    pub weekday: Option<Weekday>,
}
