use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;

use crate::models::{ExtractedFields, Service, ServiceMatch};
use crate::services::text::{fold, is_alphabetic_word, title_case};

/// Tried in order: ten digits, then 2-4-4 groups, then 3-3-4 groups.
static PHONE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\b[0-9]{10}\b").expect("valid phone pattern"),
        Regex::new(r"\b[0-9]{2}[-\s]?[0-9]{4}[-\s]?[0-9]{4}\b").expect("valid phone pattern"),
        Regex::new(r"\b[0-9]{3}[-\s]?[0-9]{3}[-\s]?[0-9]{4}\b").expect("valid phone pattern"),
    ]
});

static CONFIRMATION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mc[0-9]+").expect("valid confirmation code pattern"));

static PHONE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btel(?:[eé]fono)?\b\.?").expect("valid phone label pattern"));

const WEEKDAY_SPELLINGS: [(Weekday, &[&str]); 6] = [
    (Weekday::Mon, &["lunes", "lun"]),
    (Weekday::Tue, &["martes", "mar"]),
    (Weekday::Wed, &["miercoles", "mie"]),
    (Weekday::Thu, &["jueves", "jue"]),
    (Weekday::Fri, &["viernes", "vie"]),
    (Weekday::Sat, &["sabado", "sab"]),
];

/// Words never taken as part of a patient name (compared accent-folded).
const NAME_STOPWORDS: &[&str] = &[
    "para", "con", "del", "una", "cita", "agendar", "consulta", "soy", "general",
    "laboratorio", "cardiologia", "pediatria", "dermatologia", "prefiero", "cualquier", "dia",
    "semana", "lunes", "martes", "miercoles", "jueves", "viernes", "sabado", "domingo", "lun",
    "mar", "mie", "jue", "vie", "sab", "buscar", "encontrar", "quiero", "necesito", "por",
    "favor", "hola", "gracias", "buenos", "buenas", "dias", "tardes",
];

const MAX_NAME_WORDS: usize = 4;

pub fn contains_phone(message: &str) -> bool {
    PHONE_PATTERNS.iter().any(|p| p.is_match(message))
}

pub fn extract_phone(message: &str) -> Option<String> {
    PHONE_PATTERNS
        .iter()
        .find_map(|p| p.find(message))
        .map(|m| m.as_str().chars().filter(char::is_ascii_digit).collect())
}

pub fn find_confirmation_code(message: &str) -> Option<String> {
    CONFIRMATION_CODE
        .find(message)
        .map(|m| m.as_str().to_uppercase())
}

pub fn detect_weekday(message: &str) -> Option<Weekday> {
    let folded = fold(message);
    let words: Vec<&str> = folded
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    WEEKDAY_SPELLINGS
        .iter()
        .find(|(_, spellings)| spellings.iter().any(|s| words.contains(s)))
        .map(|(day, _)| *day)
}

/// Up to four capitalized name words left after dropping phones and stopwords.
pub fn extract_name(message: &str) -> Option<String> {
    let mut cleaned = PHONE_LABEL.replace_all(&message.replace(',', " "), " ").into_owned();
    for pattern in PHONE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }

    let words: Vec<String> = cleaned
        .split_whitespace()
        .map(|token| title_case(token.trim_matches(|c: char| !c.is_alphanumeric())))
        .filter(|word| {
            is_alphabetic_word(word)
                && word.chars().count() > 2
                && !NAME_STOPWORDS.contains(&fold(word).as_str())
        })
        .take(MAX_NAME_WORDS)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub struct FieldExtractor<'a> {
    services: &'a [Service],
}

impl<'a> FieldExtractor<'a> {
    pub fn new(services: &'a [Service]) -> Self {
        Self { services }
    }

    pub fn extract(&self, message: &str) -> ExtractedFields {
        let fields = ExtractedFields {
            name: extract_name(message),
            phone: extract_phone(message),
            service: self.find_service(message),
            weekday: detect_weekday(message),
        };
        tracing::debug!(?fields, "extracted message fields");
        fields
    }

    fn find_service(&self, message: &str) -> Option<ServiceMatch> {
        let folded = fold(message);
        self.services
            .iter()
            .find(|s| folded.contains(&fold(&s.name)))
            .map(|s| ServiceMatch {
                service_id: s.id,
                doctor_id: s.doctor_id,
            })
    }
}
