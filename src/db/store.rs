use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{StoreError, StoreResult};
use crate::models::{
    Appointment, AppointmentSummary, CancelOutcome, Doctor, NewAppointment, SearchCriterion,
    Service,
};

/// Persistence operations the chat core depends on. Every call is one
/// short-lived transaction; nothing spans two calls.
pub trait ClinicStore: Send + Sync {
    fn list_services(&self) -> StoreResult<Vec<Service>>;

    fn list_doctors(&self) -> StoreResult<Vec<Doctor>>;

    fn list_available_slots(&self, date: NaiveDate) -> StoreResult<Vec<NaiveTime>>;

    fn create_appointment(&self, request: &NewAppointment) -> StoreResult<Appointment>;

    fn cancel_appointment(&self, confirmation_code: &str) -> StoreResult<CancelOutcome>;

    fn search_appointments(
        &self,
        criterion: SearchCriterion,
        value: &str,
    ) -> StoreResult<Vec<AppointmentSummary>>;
}

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn connection(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Unavailable)
    }
}

impl ClinicStore for SqliteStore {
    fn list_services(&self) -> StoreResult<Vec<Service>> {
        let conn = self.connection()?;
        queries::list_services(&conn)
    }

    fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        let conn = self.connection()?;
        queries::list_doctors(&conn)
    }

    fn list_available_slots(&self, date: NaiveDate) -> StoreResult<Vec<NaiveTime>> {
        let conn = self.connection()?;
        queries::list_available_slots(&conn, date)
    }

    fn create_appointment(&self, request: &NewAppointment) -> StoreResult<Appointment> {
        let conn = self.connection()?;
        let appointment = queries::create_appointment(&conn, request, Local::now().naive_local())?;
        tracing::info!(
            code = %appointment.confirmation_code,
            date = %appointment.date,
            time = %appointment.time.format("%H:%M"),
            "appointment created"
        );
        Ok(appointment)
    }

    fn cancel_appointment(&self, confirmation_code: &str) -> StoreResult<CancelOutcome> {
        let conn = self.connection()?;
        let outcome = queries::cancel_appointment(&conn, confirmation_code)?;
        tracing::info!(code = confirmation_code, outcome = ?outcome, "cancellation requested");
        Ok(outcome)
    }

    fn search_appointments(
        &self,
        criterion: SearchCriterion,
        value: &str,
    ) -> StoreResult<Vec<AppointmentSummary>> {
        let conn = self.connection()?;
        queries::search_appointments(&conn, criterion, value)
    }
}
