use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
}

/// A bookable service. `doctor_name` is denormalized so listings need no join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub active: bool,
}

pub const DEFAULT_DOCTORS: [(&str, &str, &str, &str); 5] = [
    ("Dr. García", "Pediatría", "3312345001", "garcia@medicare.com"),
    ("Dra. Martínez", "Cardiología", "3312345002", "martinez@medicare.com"),
    ("Dr. López", "Dermatología", "3312345003", "lopez@medicare.com"),
    ("Dr. Rodríguez", "Medicina General", "3312345004", "rodriguez@medicare.com"),
    ("QFB Angel Carrizalez", "Laboratorio", "3312345005", "acarrizalez@medicare.com"),
];

pub const DEFAULT_SERVICES: [(&str, f64, i32, &str); 5] = [
    ("Consulta General", 500.0, 30, "Dr. Rodríguez"),
    ("Pediatría", 600.0, 45, "Dr. García"),
    ("Cardiología", 800.0, 60, "Dra. Martínez"),
    ("Dermatología", 700.0, 30, "Dr. López"),
    ("Laboratorio", 250.0, 15, "QFB Angel Carrizalez"),
];

/// The seeded catalog, for listings when the database cannot be read.
pub fn fallback_catalog() -> Vec<Service> {
    DEFAULT_SERVICES
        .iter()
        .zip(1..)
        .map(|(&(name, price, duration_minutes, doctor), id)| Service {
            id,
            name: name.to_string(),
            price,
            duration_minutes,
            doctor_id: DEFAULT_DOCTORS
                .iter()
                .zip(1..)
                .find(|((doc, ..), _)| *doc == doctor)
                .map_or(0, |(_, doctor_id)| doctor_id),
            doctor_name: doctor.to_string(),
            active: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_catalog_matches_seed_order() {
        let catalog = fallback_catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog[1].name, "Pediatría");
        assert_eq!(catalog[1].id, 2);
        assert_eq!(catalog[1].doctor_id, 1);
        assert_eq!(catalog[0].doctor_id, 4);
        assert!(catalog.iter().all(|s| s.active && s.doctor_id > 0));
    }
}
