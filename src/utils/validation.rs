use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag regex is valid"));

pub const PHONE_DIGITS: usize = 10;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn ensure_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(Error::BadRequest("Formato de email inválido".into()))
    }
}

/// Reduces a Mexican phone number to its 10 national digits.
///
/// Accepts common separators and an optional `+52` / `52` / `521` prefix.
pub fn normalize_mx_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut digits = String::with_capacity(trimmed.len());
    for (idx, c) in trimmed.chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            '+' if idx == 0 => {}
            _ => return None,
        }
    }

    if digits.len() == 13 && digits.starts_with("521") {
        digits = digits[3..].to_string();
    } else if digits.len() == 12 && digits.starts_with("52") {
        digits = digits[2..].to_string();
    }

    (digits.len() == PHONE_DIGITS).then_some(digits)
}

pub fn ensure_phone(phone: &str) -> Result<()> {
    match normalize_mx_phone(phone) {
        Some(_) => Ok(()),
        None => Err(Error::BadRequest(format!(
            "Formato de teléfono inválido: se requieren {} dígitos",
            PHONE_DIGITS
        ))),
    }
}

pub fn ensure_url(field_label: &str, value: &str) -> Result<()> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(Error::BadRequest(format!("URL inválida en {}", field_label))),
    }
}

/// Collects the Spanish labels of absent fields into a single 400.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check<T>(mut self, label: &'static str, value: &Option<T>) -> Self {
        if value.is_none() {
            self.missing.push(label);
        }
        self
    }

    pub fn check_true(mut self, label: &'static str, value: Option<bool>) -> Self {
        if value != Some(true) {
            self.missing.push(label);
        }
        self
    }

    pub fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(Error::BadRequest(format!(
                "Faltan campos requeridos: {}",
                self.missing.join(", ")
            )))
        }
    }
}

/// Removes markup tags, stray angle brackets and control characters other than
/// newline and tab.
pub fn sanitize_text(input: &str) -> String {
    TAG_RE
        .replace_all(input, "")
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}

// Trims and sanitizes strings; empty strings become None
pub fn clean_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let cleaned = sanitize_text(&s);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }))
}
