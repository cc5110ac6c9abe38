pub mod appointment;
pub mod catalog;
pub mod conversation;
pub mod intent;
pub mod schedule;

pub use appointment::{
    Appointment, AppointmentStatus, AppointmentSummary, CancelOutcome, NewAppointment,
    SearchCriterion,
};
pub use catalog::{Doctor, Service};
pub use conversation::{Conversation, ConversationMessage};
pub use intent::{ExtractedFields, Intent, ServiceMatch};
pub use schedule::{AvailabilityLevel, DayAvailability};
