use anyhow::Context;
use rusqlite::{params, Connection};

use crate::models::catalog::{DEFAULT_DOCTORS, DEFAULT_SERVICES};

pub fn seed_catalog(conn: &Connection) -> anyhow::Result<()> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM services", [], |row| row.get(0))
        .context("failed to count services")?;
    if existing > 0 {
        return Ok(());
    }

    let tx = conn
        .unchecked_transaction()
        .context("failed to open seed transaction")?;

    for (name, specialty, phone, email) in DEFAULT_DOCTORS {
        tx.execute(
            "INSERT INTO doctors (name, specialty, phone, email) VALUES (?1, ?2, ?3, ?4)",
            params![name, specialty, phone, email],
        )
        .with_context(|| format!("failed to seed doctor: {name}"))?;
    }

    for (name, price, minutes, doctor) in DEFAULT_SERVICES {
        let inserted = tx
            .execute(
                "INSERT INTO services (name, price, duration_minutes, doctor_id, doctor_name)
                 SELECT ?1, ?2, ?3, id, name FROM doctors WHERE name = ?4",
                params![name, price, minutes, doctor],
            )
            .with_context(|| format!("failed to seed service: {name}"))?;
        anyhow::ensure!(inserted == 1, "seed doctor missing for service {name}");
    }

    tx.commit().context("failed to commit catalog seed")?;
    tracing::info!(
        doctors = DEFAULT_DOCTORS.len(),
        services = DEFAULT_SERVICES.len(),
        "seeded clinic catalog"
    );

    Ok(())
}
