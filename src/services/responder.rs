use chrono::{NaiveDate, NaiveDateTime};

use crate::config::ClinicProfile;
use crate::db::ClinicStore;
use crate::errors::{StoreError, StoreResult};
use crate::models::catalog::fallback_catalog;
use crate::models::{CancelOutcome, Intent, NewAppointment, SearchCriterion, Service};
use crate::services::extractor::{
    detect_weekday, extract_name, extract_phone, find_confirmation_code, FieldExtractor,
};
use crate::services::scheduling::{availability_outlook, date_from_weekday};
use crate::services::templates::{self, BookingConfirmation};

/// `now` fixes the reference date for weekday arithmetic.
pub struct ResponseGenerator<'a> {
    store: &'a dyn ClinicStore,
    clinic: &'a ClinicProfile,
    now: NaiveDateTime,
}

impl<'a> ResponseGenerator<'a> {
    pub fn new(store: &'a dyn ClinicStore, clinic: &'a ClinicProfile, now: NaiveDateTime) -> Self {
        Self { store, clinic, now }
    }

    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Never fails. Storage errors are logged and answered with the apology.
    pub fn respond(&self, message: &str, intent: Intent) -> String {
        match self.try_respond(message, intent) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(intent = intent.as_str(), error = %e, "response generation failed");
                templates::apology()
            }
        }
    }

    fn try_respond(&self, message: &str, intent: Intent) -> StoreResult<String> {
        let reply = match intent {
            Intent::ChangeAppointment => self.change_appointment(message)?,
            Intent::RequestChange => templates::request_change(),
            Intent::CancelAppointment => self.cancel_appointment(message)?,
            Intent::RequestCancellation => templates::request_cancellation(),
            Intent::SearchAppointment => self.search_appointment(message)?,
            Intent::ProcessFullBooking => self.full_booking(message)?,
            Intent::BookAppointment => templates::booking_menu(&self.listed_services()),
            Intent::PriceInquiry => templates::price_list(self.clinic, &self.listed_services()),
            Intent::HoursInquiry => templates::hours(&self.outlook()),
            Intent::Emergency => templates::emergency(self.clinic),
            Intent::Greeting => templates::greeting(self.clinic),
            Intent::GeneralInfo => {
                templates::general_info(self.clinic, self.listed_services().len())
            }
        };
        Ok(reply)
    }

    fn listed_services(&self) -> Vec<Service> {
        self.store.list_services().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "service catalog unavailable, listing built-in services");
            fallback_catalog()
        })
    }

    fn outlook(&self) -> String {
        match availability_outlook(self.store, self.today()) {
            Ok(days) => templates::outlook(&days),
            Err(e) => {
                tracing::warn!(error = %e, "availability summary unavailable");
                templates::outlook_unavailable()
            }
        }
    }

    // Rescheduling only renders the confirmation; the stored appointment is
    // left unchanged until an update operation exists.
    fn change_appointment(&self, message: &str) -> StoreResult<String> {
        let Some(code) = find_confirmation_code(message) else {
            return Ok(templates::change_needs_code());
        };
        let Some(day) = detect_weekday(message) else {
            return Ok(templates::change_needs_day(&code, &self.outlook()));
        };

        let date = date_from_weekday(self.today(), day);
        let slots = self.store.list_available_slots(date)?;
        let Some(&time) = slots.first() else {
            return Ok(templates::change_no_availability(day, &self.outlook()));
        };

        tracing::warn!(code = %code, %date, "reschedule confirmed without persisting the new slot");
        Ok(templates::change_confirmed(&code, day, date, time))
    }

    fn cancel_appointment(&self, message: &str) -> StoreResult<String> {
        let Some(code) = find_confirmation_code(message) else {
            return Ok(templates::request_cancellation());
        };

        let reply = match self.store.cancel_appointment(&code)? {
            CancelOutcome::Cancelled => templates::cancel_succeeded(&code, self.now),
            outcome @ CancelOutcome::NotFound => templates::cancel_failed(&code, outcome.message()),
        };
        Ok(reply)
    }

    fn search_appointment(&self, message: &str) -> StoreResult<String> {
        let (criterion, value) = if let Some(code) = find_confirmation_code(message) {
            (SearchCriterion::ConfirmationCode, code)
        } else if let Some(phone) = extract_phone(message) {
            (SearchCriterion::Phone, phone)
        } else if let Some(name) = extract_name(message) {
            (SearchCriterion::Name, name)
        } else {
            return Ok(templates::search_instructions());
        };

        let results = self.store.search_appointments(criterion, &value)?;
        if results.is_empty() {
            Ok(templates::search_not_found(&value))
        } else {
            Ok(templates::search_results(&results))
        }
    }

    fn full_booking(&self, message: &str) -> StoreResult<String> {
        let services = self.store.list_services()?;
        let fields = FieldExtractor::new(&services).extract(message);

        let Some(name) = fields.name else {
            return Ok(templates::booking_missing_name());
        };
        let Some(phone) = fields.phone else {
            return Ok(templates::booking_missing_phone());
        };
        let Some(service) = fields
            .service
            .and_then(|m| services.iter().find(|s| s.id == m.service_id))
        else {
            return Ok(templates::booking_missing_service(&services));
        };
        let Some(weekday) = fields.weekday else {
            return Ok(templates::booking_needs_day(&name, &phone, &self.outlook()));
        };

        let date = date_from_weekday(self.today(), weekday);
        let slots = self.store.list_available_slots(date)?;
        let Some(&time) = slots.first() else {
            return Ok(templates::booking_no_availability(weekday, &self.outlook()));
        };

        let request = NewAppointment {
            patient_name: name,
            patient_phone: phone,
            service_id: service.id,
            doctor_id: service.doctor_id,
            date,
            time,
        };

        match self.store.create_appointment(&request) {
            Ok(appointment) => Ok(templates::booking_confirmed(
                self.clinic,
                &BookingConfirmation {
                    patient_name: &appointment.patient_name,
                    patient_phone: &appointment.patient_phone,
                    service,
                    weekday,
                    date: appointment.date,
                    time: appointment.time,
                    confirmation_code: &appointment.confirmation_code,
                },
            )),
            Err(StoreError::SlotTaken { date, time }) => {
                tracing::warn!(%date, "slot taken between availability check and insert");
                Ok(templates::booking_slot_taken(date, time))
            }
            Err(e) => {
                tracing::error!(error = %e, "appointment insert failed");
                Ok(templates::booking_failed(&e.to_string()))
            }
        }
    }
}
