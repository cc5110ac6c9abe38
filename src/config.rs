use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub clinic: ClinicProfile,
}

#[derive(Clone, Debug)]
pub struct ClinicProfile {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl Default for ClinicProfile {
    fn default() -> Self {
        Self {
            name: "Clínica MediCare".to_string(),
            phone: "(33) 1234-5678".to_string(),
            address: "Av. Principal #123, Guadalajara, Jalisco".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = ClinicProfile::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "clinica.db".to_string()),
            clinic: ClinicProfile {
                name: env::var("CLINIC_NAME").unwrap_or(defaults.name),
                phone: env::var("CLINIC_PHONE").unwrap_or(defaults.phone),
                address: env::var("CLINIC_ADDRESS").unwrap_or(defaults.address),
            },
        }
    }
}
