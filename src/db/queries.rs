use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::errors::{StoreError, StoreResult};
use crate::models::appointment::confirmation_code_at;
use crate::models::schedule::day_slots;
use crate::models::{
    Appointment, AppointmentStatus, AppointmentSummary, CancelOutcome, Doctor, NewAppointment,
    SearchCriterion, Service,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Catalog ──

pub fn list_services(conn: &Connection) -> StoreResult<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, price, duration_minutes, doctor_id, doctor_name, active
         FROM services WHERE active = 1 ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Service {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            duration_minutes: row.get(3)?,
            doctor_id: row.get(4)?,
            doctor_name: row.get(5)?,
            active: row.get::<_, i32>(6)? != 0,
        })
    })?;

    let mut seen = HashSet::new();
    let mut services = vec![];
    for row in rows {
        let service = row?;
        if seen.insert(service.name.clone()) {
            services.push(service);
        }
    }
    Ok(services)
}

pub fn list_doctors(conn: &Connection) -> StoreResult<Vec<Doctor>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, specialty, phone, email, active
         FROM doctors WHERE active = 1 ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Doctor {
            id: row.get(0)?,
            name: row.get(1)?,
            specialty: row.get(2)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            active: row.get::<_, i32>(5)? != 0,
        })
    })?;

    let mut doctors = vec![];
    for row in rows {
        doctors.push(row?);
    }
    Ok(doctors)
}

// ── Availability ──

/// Grid slots on `date` not held by a non-cancelled appointment.
pub fn list_available_slots(conn: &Connection, date: NaiveDate) -> StoreResult<Vec<NaiveTime>> {
    let mut stmt =
        conn.prepare("SELECT time FROM appointments WHERE date = ?1 AND status != 'cancelled'")?;

    let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
        row.get::<_, String>(0)
    })?;

    let mut taken = HashSet::new();
    for row in rows {
        taken.insert(row?);
    }

    Ok(day_slots()
        .into_iter()
        .filter(|slot| !taken.contains(&slot.format(TIME_FORMAT).to_string()))
        .collect())
}

// ── Appointments ──

/// Inserts a confirmed appointment stamped with `now`. A code already in use
/// is moved forward one second at a time until it is free.
pub fn create_appointment(
    conn: &Connection,
    request: &NewAppointment,
    now: NaiveDateTime,
) -> StoreResult<Appointment> {
    let tx = conn.unchecked_transaction()?;

    let mut stamp = now;
    let mut code = confirmation_code_at(&stamp);
    while code_exists(&tx, &code)? {
        stamp += Duration::seconds(1);
        code = confirmation_code_at(&stamp);
    }

    let inserted = tx.execute(
        "INSERT INTO appointments (confirmation_code, patient_name, patient_phone, service_id, doctor_id, date, time, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            code,
            request.patient_name,
            request.patient_phone,
            request.service_id,
            request.doctor_id,
            request.date.format(DATE_FORMAT).to_string(),
            request.time.format(TIME_FORMAT).to_string(),
            AppointmentStatus::Confirmed.as_str(),
            now.format(TIMESTAMP_FORMAT).to_string(),
        ],
    );

    if let Err(e) = inserted {
        return Err(if is_slot_conflict(&e) {
            StoreError::SlotTaken {
                date: request.date,
                time: request.time,
            }
        } else {
            e.into()
        });
    }

    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Appointment {
        id,
        confirmation_code: code,
        patient_name: request.patient_name.clone(),
        patient_phone: request.patient_phone.clone(),
        service_id: request.service_id,
        doctor_id: request.doctor_id,
        date: request.date,
        time: request.time,
        status: AppointmentStatus::Confirmed,
        created_at: now,
    })
}

pub fn cancel_appointment(conn: &Connection, confirmation_code: &str) -> StoreResult<CancelOutcome> {
    let count = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE confirmation_code = ?2 AND status != ?1",
        params![AppointmentStatus::Cancelled.as_str(), confirmation_code],
    )?;

    Ok(if count > 0 {
        CancelOutcome::Cancelled
    } else {
        CancelOutcome::NotFound
    })
}

pub fn search_appointments(
    conn: &Connection,
    criterion: SearchCriterion,
    value: &str,
) -> StoreResult<Vec<AppointmentSummary>> {
    let filter = match criterion {
        SearchCriterion::Name => "a.patient_name LIKE '%' || ?1 || '%'",
        SearchCriterion::Phone => "a.patient_phone = ?1",
        SearchCriterion::ConfirmationCode => "a.confirmation_code = ?1",
    };
    let sql = format!(
        "SELECT a.confirmation_code, a.patient_name, a.date, a.time, s.name, a.status
         FROM appointments a
         JOIN services s ON a.service_id = s.id
         WHERE {filter} AND a.status != 'cancelled'
         ORDER BY a.date DESC, a.time DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![value], |row| Ok(parse_summary_row(row)))?;

    let mut results = vec![];
    for row in rows {
        results.push(row??);
    }
    Ok(results)
}

pub fn get_appointment(conn: &Connection, confirmation_code: &str) -> StoreResult<Option<Appointment>> {
    conn.query_row(
        "SELECT id, confirmation_code, patient_name, patient_phone, service_id, doctor_id, date, time, status, created_at
         FROM appointments WHERE confirmation_code = ?1",
        params![confirmation_code],
        |row| Ok(parse_appointment_row(row)),
    )
    .optional()?
    .transpose()
}

fn code_exists(conn: &Connection, code: &str) -> StoreResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM appointments WHERE confirmation_code = ?1",
        params![code],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn is_slot_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == ErrorCode::ConstraintViolation && msg.contains("appointments.date")
    )
}

fn parse_appointment_row(row: &Row<'_>) -> StoreResult<Appointment> {
    let created_at: String = row.get(9)?;
    Ok(Appointment {
        id: row.get(0)?,
        confirmation_code: row.get(1)?,
        patient_name: row.get(2)?,
        patient_phone: row.get(3)?,
        service_id: row.get(4)?,
        doctor_id: row.get(5)?,
        date: parse_date(&row.get::<_, String>(6)?)?,
        time: parse_time(&row.get::<_, String>(7)?)?,
        status: parse_status(&row.get::<_, String>(8)?)?,
        created_at: NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
            .map_err(|_| StoreError::Corrupt(format!("timestamp {created_at}")))?,
    })
}

fn parse_summary_row(row: &Row<'_>) -> StoreResult<AppointmentSummary> {
    Ok(AppointmentSummary {
        confirmation_code: row.get(0)?,
        patient_name: row.get(1)?,
        date: parse_date(&row.get::<_, String>(2)?)?,
        time: parse_time(&row.get::<_, String>(3)?)?,
        service_name: row.get(4)?,
        status: parse_status(&row.get::<_, String>(5)?)?,
    })
}

fn parse_date(s: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| StoreError::Corrupt(format!("date {s}")))
}

fn parse_time(s: &str) -> StoreResult<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| StoreError::Corrupt(format!("time {s}")))
}

fn parse_status(s: &str) -> StoreResult<AppointmentStatus> {
    AppointmentStatus::parse(s).ok_or_else(|| StoreError::Corrupt(format!("status {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn request(conn: &Connection, name: &str, phone: &str, day: &str, at: &str) -> NewAppointment {
        let pediatria = list_services(conn)
            .unwrap()
            .into_iter()
            .find(|s| s.name == "Pediatría")
            .unwrap();
        NewAppointment {
            patient_name: name.to_string(),
            patient_phone: phone.to_string(),
            service_id: pediatria.id,
            doctor_id: pediatria.doctor_id,
            date: date(day),
            time: time(at),
        }
    }

    #[test]
    fn test_seeded_catalog() {
        let conn = setup_db();
        let services = list_services(&conn).unwrap();
        let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Consulta General", "Pediatría", "Cardiología", "Dermatología", "Laboratorio"]
        );
        assert_eq!(list_doctors(&conn).unwrap().len(), 5);

        let pediatria = &services[1];
        assert_eq!(pediatria.price, 600.0);
        assert_eq!(pediatria.duration_minutes, 45);
        assert_eq!(pediatria.doctor_name, "Dr. García");
    }

    #[test]
    fn test_seed_runs_once() {
        let conn = setup_db();
        db::seed::seed_catalog(&conn).unwrap();
        assert_eq!(list_services(&conn).unwrap().len(), 5);
    }

    #[test]
    fn test_duplicate_service_names_collapse() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO services (name, price, duration_minutes, doctor_id, doctor_name)
             SELECT 'Pediatría', 650, 45, id, name FROM doctors WHERE id = 1",
            [],
        )
        .unwrap();
        assert_eq!(list_services(&conn).unwrap().len(), 5);
    }

    #[test]
    fn test_inactive_services_hidden() {
        let conn = setup_db();
        conn.execute("UPDATE services SET active = 0 WHERE name = 'Laboratorio'", [])
            .unwrap();
        let services = list_services(&conn).unwrap();
        assert_eq!(services.len(), 4);
        assert!(services.iter().all(|s| s.name != "Laboratorio"));
    }

    #[test]
    fn test_available_slots_exclude_booked() {
        let conn = setup_db();
        assert_eq!(list_available_slots(&conn, date("2025-06-18")).unwrap().len(), 16);

        let req = request(&conn, "Ana Silva", "3312345678", "2025-06-18", "09:00");
        create_appointment(&conn, &req, ts("2025-06-16 10:00:00")).unwrap();

        let slots = list_available_slots(&conn, date("2025-06-18")).unwrap();
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0], time("09:30"));
        // Other days are untouched.
        assert_eq!(list_available_slots(&conn, date("2025-06-19")).unwrap().len(), 16);
    }

    #[test]
    fn test_create_appointment_assigns_code() {
        let conn = setup_db();
        let req = request(&conn, "Ana Silva", "3312345678", "2025-06-18", "09:00");
        let appt = create_appointment(&conn, &req, ts("2024-12-20 14:52:30")).unwrap();

        assert_eq!(appt.confirmation_code, "MC20241220145230");
        assert_eq!(appt.status, AppointmentStatus::Confirmed);

        let stored = get_appointment(&conn, "MC20241220145230").unwrap().unwrap();
        assert_eq!(stored, appt);
    }

    #[test]
    fn test_same_second_codes_stay_unique() {
        let conn = setup_db();
        let now = ts("2024-12-20 14:52:30");
        let first = create_appointment(
            &conn,
            &request(&conn, "Ana Silva", "3312345678", "2025-06-18", "09:00"),
            now,
        )
        .unwrap();
        let second = create_appointment(
            &conn,
            &request(&conn, "Juan Pérez", "3398765432", "2025-06-18", "09:30"),
            now,
        )
        .unwrap();

        assert_eq!(first.confirmation_code, "MC20241220145230");
        assert_eq!(second.confirmation_code, "MC20241220145231");
    }

    #[test]
    fn test_double_booking_rejected() {
        let conn = setup_db();
        let req = request(&conn, "Ana Silva", "3312345678", "2025-06-18", "10:00");
        create_appointment(&conn, &req, ts("2025-06-16 10:00:00")).unwrap();

        let clash = request(&conn, "Juan Pérez", "3398765432", "2025-06-18", "10:00");
        let err = create_appointment(&conn, &clash, ts("2025-06-16 10:05:00")).unwrap_err();
        assert!(matches!(err, StoreError::SlotTaken { .. }));
    }

    #[test]
    fn test_cancelled_slot_can_be_rebooked() {
        let conn = setup_db();
        let req = request(&conn, "Ana Silva", "3312345678", "2025-06-18", "10:00");
        let appt = create_appointment(&conn, &req, ts("2025-06-16 10:00:00")).unwrap();
        cancel_appointment(&conn, &appt.confirmation_code).unwrap();

        assert_eq!(list_available_slots(&conn, date("2025-06-18")).unwrap().len(), 16);
        let again = request(&conn, "Juan Pérez", "3398765432", "2025-06-18", "10:00");
        assert!(create_appointment(&conn, &again, ts("2025-06-16 11:00:00")).is_ok());
    }

    #[test]
    fn test_create_cancel_search_lifecycle() {
        let conn = setup_db();
        let req = request(&conn, "María González López", "3312345678", "2025-06-18", "09:00");
        let appt = create_appointment(&conn, &req, ts("2025-06-16 10:00:00")).unwrap();

        let found = search_appointments(&conn, SearchCriterion::Phone, "3312345678").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].confirmation_code, appt.confirmation_code);
        assert_eq!(found[0].service_name, "Pediatría");

        let outcome = cancel_appointment(&conn, &appt.confirmation_code).unwrap();
        assert_eq!(outcome, CancelOutcome::Cancelled);

        assert!(search_appointments(&conn, SearchCriterion::Phone, "3312345678")
            .unwrap()
            .is_empty());

        let again = cancel_appointment(&conn, &appt.confirmation_code).unwrap();
        assert_eq!(again, CancelOutcome::NotFound);
        assert_eq!(again.message(), "Cita no encontrada o ya cancelada");

        let stored = get_appointment(&conn, &appt.confirmation_code).unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_cancel_unknown_code() {
        let conn = setup_db();
        let outcome = cancel_appointment(&conn, "MC20241220145230").unwrap();
        assert_eq!(outcome, CancelOutcome::NotFound);
    }

    #[test]
    fn test_search_by_name_substring_ordered_by_date() {
        let conn = setup_db();
        let now = ts("2025-06-16 10:00:00");
        create_appointment(
            &conn,
            &request(&conn, "Juan Pérez García", "3311111111", "2025-06-18", "09:00"),
            now,
        )
        .unwrap();
        create_appointment(
            &conn,
            &request(&conn, "Juan Pérez García", "3311111111", "2025-06-20", "09:00"),
            now,
        )
        .unwrap();
        create_appointment(
            &conn,
            &request(&conn, "Ana Silva", "3322222222", "2025-06-19", "09:00"),
            now,
        )
        .unwrap();

        let found = search_appointments(&conn, SearchCriterion::Name, "Pérez").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].date, date("2025-06-20"));
        assert_eq!(found[1].date, date("2025-06-18"));

        // Phone search is exact.
        assert!(search_appointments(&conn, SearchCriterion::Phone, "331111")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_search_by_confirmation_code() {
        let conn = setup_db();
        let req = request(&conn, "Ana Silva", "3322222222", "2025-06-19", "09:00");
        let appt = create_appointment(&conn, &req, ts("2025-06-16 10:00:00")).unwrap();

        let found =
            search_appointments(&conn, SearchCriterion::ConfirmationCode, &appt.confirmation_code)
                .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].patient_name, "Ana Silva");

        assert!(search_appointments(&conn, SearchCriterion::ConfirmationCode, "MC2025")
            .unwrap()
            .is_empty());
    }
}
