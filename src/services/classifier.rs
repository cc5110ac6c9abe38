use crate::models::catalog::DEFAULT_SERVICES;
use crate::models::{Intent, Service};
use crate::services::extractor::{contains_phone, find_confirmation_code};
use crate::services::text::{fold, is_alphabetic_word};

/// One precedence step. Rules are evaluated in table order; first match wins.
enum Rule {
    /// Keyword present: `with_code` if the message carries a confirmation code.
    KeywordsWithCode {
        keywords: &'static [&'static str],
        with_code: Intent,
        without_code: Intent,
    },
    Keywords {
        keywords: &'static [&'static str],
        intent: Intent,
    },
    KeywordsUnless {
        keywords: &'static [&'static str],
        unless: &'static str,
        intent: Intent,
    },
    /// Phone number plus a service name or at least two name-like words.
    FullBooking,
}

const RULES: &[Rule] = &[
    Rule::KeywordsWithCode {
        keywords: &["cambiar", "reagendar", "mover", "cambio"],
        with_code: Intent::ChangeAppointment,
        without_code: Intent::RequestChange,
    },
    Rule::KeywordsWithCode {
        keywords: &["cancelar", "cancela", "eliminar"],
        with_code: Intent::CancelAppointment,
        without_code: Intent::RequestCancellation,
    },
    Rule::Keywords {
        keywords: &["buscar", "encontrar", "mi cita", "cita de"],
        intent: Intent::SearchAppointment,
    },
    Rule::FullBooking,
    // Price questions usually name a service ("una consulta de pediatría"),
    // so they are checked before the generic booking words.
    Rule::Keywords {
        keywords: &["precio", "costo", "cuanto", "tarifa"],
        intent: Intent::PriceInquiry,
    },
    Rule::Keywords {
        keywords: &["cita", "agendar", "reservar", "turno", "consulta"],
        intent: Intent::BookAppointment,
    },
    Rule::KeywordsUnless {
        keywords: &["horario", "hora", "abierto", "cerrado", "disponible"],
        unless: "cita",
        intent: Intent::HoursInquiry,
    },
    Rule::Keywords {
        keywords: &["emergencia", "urgente", "dolor", "accidente", "grave"],
        intent: Intent::Emergency,
    },
    Rule::Keywords {
        keywords: &["hola", "buenos", "buenas", "saludos", "ayuda"],
        intent: Intent::Greeting,
    },
];

struct Scanned<'a> {
    raw: &'a str,
    folded: String,
}

impl Scanned<'_> {
    fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.folded.contains(k))
    }
}

pub struct IntentClassifier {
    service_names: Vec<String>,
}

impl IntentClassifier {
    pub fn new<I, S>(service_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            service_names: service_names.into_iter().map(|n| fold(n.as_ref())).collect(),
        }
    }

    pub fn from_services(services: &[Service]) -> Self {
        Self::new(services.iter().map(|s| s.name.as_str()))
    }

    pub fn with_fallback_catalog() -> Self {
        Self::new(DEFAULT_SERVICES.iter().map(|(name, ..)| *name))
    }

    pub fn classify(&self, message: &str) -> Intent {
        if message.trim().is_empty() {
            return Intent::Greeting;
        }

        let scanned = Scanned {
            raw: message,
            folded: fold(message),
        };

        RULES
            .iter()
            .find_map(|rule| self.apply(rule, &scanned))
            .unwrap_or(Intent::GeneralInfo)
    }

    fn apply(&self, rule: &Rule, scanned: &Scanned<'_>) -> Option<Intent> {
        match rule {
            Rule::KeywordsWithCode {
                keywords,
                with_code,
                without_code,
            } => scanned.has_any(keywords).then(|| {
                if find_confirmation_code(scanned.raw).is_some() {
                    *with_code
                } else {
                    *without_code
                }
            }),
            Rule::Keywords { keywords, intent } => scanned.has_any(keywords).then_some(*intent),
            Rule::KeywordsUnless {
                keywords,
                unless,
                intent,
            } => (scanned.has_any(keywords) && !scanned.folded.contains(*unless)).then_some(*intent),
            Rule::FullBooking => self.is_full_booking(scanned).then_some(Intent::ProcessFullBooking),
        }
    }

    fn is_full_booking(&self, scanned: &Scanned<'_>) -> bool {
        if !contains_phone(scanned.raw) {
            return false;
        }

        let names_service = self
            .service_names
            .iter()
            .any(|name| scanned.folded.contains(name.as_str()));
        let name_like_words = scanned
            .raw
            .split_whitespace()
            .filter(|w| is_alphabetic_word(w) && w.chars().count() > 2)
            .count();

        names_service || name_like_words >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::with_fallback_catalog()
    }

    #[test]
    fn test_empty_is_greeting() {
        assert_eq!(classifier().classify(""), Intent::Greeting);
        assert_eq!(classifier().classify("   \n"), Intent::Greeting);
    }

    #[test]
    fn test_full_booking_scenario() {
        assert_eq!(
            classifier().classify("María González López, 3312345678, pediatría, miércoles"),
            Intent::ProcessFullBooking
        );
    }

    #[test]
    fn test_full_booking_beats_booking_keywords() {
        assert_eq!(
            classifier().classify("Agendar cita cardiología, soy Ana Silva, 3312345678"),
            Intent::ProcessFullBooking
        );
        assert_eq!(
            classifier().classify("Reservar turno para Ana Silva 33-1234-5678"),
            Intent::ProcessFullBooking
        );
    }

    #[test]
    fn test_phone_without_name_or_service_is_not_full_booking() {
        assert_eq!(classifier().classify("cita 3312345678"), Intent::BookAppointment);
    }

    #[test]
    fn test_cancel_with_code() {
        let c = classifier();
        for msg in [
            "Cancelar cita MC20241220145230",
            "cancelar mc20241220145230",
            "por favor CANCELA la MC123 gracias",
            "Quiero eliminar MC20241220145230",
        ] {
            assert_eq!(c.classify(msg), Intent::CancelAppointment, "{msg}");
        }
    }

    #[test]
    fn test_cancel_without_code() {
        assert_eq!(classifier().classify("quiero cancelar mi cita"), Intent::RequestCancellation);
    }

    #[test]
    fn test_change_rules_precede_cancel() {
        let c = classifier();
        assert_eq!(
            c.classify("Cambiar cita MC20241220145230 para el miércoles"),
            Intent::ChangeAppointment
        );
        assert_eq!(c.classify("quiero reagendar"), Intent::RequestChange);
        assert_eq!(c.classify("cambiar o cancelar mi cita"), Intent::RequestChange);
    }

    #[test]
    fn test_search() {
        assert_eq!(classifier().classify("Buscar mi cita"), Intent::SearchAppointment);
        assert_eq!(
            classifier().classify("buscar cita de Juan Pérez García"),
            Intent::SearchAppointment
        );
        // "cita de" is a search phrase and precedes full booking.
        assert_eq!(
            classifier().classify("Quiero agendar una cita de cardiología, 3312345678"),
            Intent::SearchAppointment
        );
    }

    #[test]
    fn test_price_inquiry_scenario() {
        assert_eq!(
            classifier().classify("¿Cuánto cuesta una consulta de pediatría?"),
            Intent::PriceInquiry
        );
        assert_eq!(classifier().classify("precio de laboratorio"), Intent::PriceInquiry);
    }

    #[test]
    fn test_booking_keywords() {
        assert_eq!(
            classifier().classify("Quiero agendar una consulta"),
            Intent::BookAppointment
        );
    }

    #[test]
    fn test_hours_unless_cita() {
        let c = classifier();
        assert_eq!(c.classify("¿Qué horario tienen?"), Intent::HoursInquiry);
        assert_eq!(c.classify("¿Están abiertos el sábado?"), Intent::HoursInquiry);
        assert_eq!(c.classify("hora disponible para cita"), Intent::BookAppointment);
    }

    #[test]
    fn test_emergency_greeting_general() {
        let c = classifier();
        assert_eq!(c.classify("Tengo un dolor muy fuerte"), Intent::Emergency);
        assert_eq!(c.classify("Hola, buenos días"), Intent::Greeting);
        assert_eq!(c.classify("gracias"), Intent::GeneralInfo);
    }

    #[test]
    fn test_catalog_names_drive_full_booking() {
        let c = IntentClassifier::new(["Nutrición"]);
        assert_eq!(c.classify("nutricion 3312345678"), Intent::ProcessFullBooking);
        assert_eq!(classifier().classify("nutricion 3312345678"), Intent::GeneralInfo);
    }
}
