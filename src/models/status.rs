use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// A closed status enum with an explicit forward transition table.
pub trait Workflow: Copy + Eq + fmt::Display + 'static {
    const ALL: &'static [Self];

    fn initial() -> Self;

    fn next_states(self) -> &'static [Self];

    fn as_str(self) -> &'static str;

    fn can_transition_to(self, next: Self) -> bool {
        self.next_states().contains(&next)
    }

    fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Validates a move; staying in the current status is a no-op.
/// Returns whether the status actually changes.
pub fn ensure_transition<W: Workflow>(from: W, to: W) -> Result<bool> {
    if from == to {
        return Ok(false);
    }
    if from.can_transition_to(to) {
        Ok(true)
    } else {
        Err(Error::BadRequest(format!(
            "Transición de estado no permitida: {} → {}",
            from, to
        )))
    }
}

/// Parses an optional `?status=` filter, rejecting unknown values.
pub fn parse_status_filter<W: Workflow>(raw: Option<&str>) -> Result<Option<W>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => W::parse(value)
            .map(Some)
            .ok_or_else(|| Error::BadRequest(format!("Estado inválido: {}", value))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Pendiente,
    Asignada,
    EnProceso,
    Resuelta,
}

impl Workflow for ContactStatus {
    const ALL: &'static [Self] = &[
        ContactStatus::Pendiente,
        ContactStatus::Asignada,
        ContactStatus::EnProceso,
        ContactStatus::Resuelta,
    ];

    fn initial() -> Self {
        ContactStatus::Pendiente
    }

    fn next_states(self) -> &'static [Self] {
        match self {
            ContactStatus::Pendiente => &[ContactStatus::Asignada],
            ContactStatus::Asignada => &[ContactStatus::EnProceso],
            ContactStatus::EnProceso => &[ContactStatus::Resuelta],
            ContactStatus::Resuelta => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ContactStatus::Pendiente => "pendiente",
            ContactStatus::Asignada => "asignada",
            ContactStatus::EnProceso => "en_proceso",
            ContactStatus::Resuelta => "resuelta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Nueva,
    Revisada,
    Entrevista,
    Contratada,
    Rechazada,
}

impl Workflow for ApplicationStatus {
    const ALL: &'static [Self] = &[
        ApplicationStatus::Nueva,
        ApplicationStatus::Revisada,
        ApplicationStatus::Entrevista,
        ApplicationStatus::Contratada,
        ApplicationStatus::Rechazada,
    ];

    fn initial() -> Self {
        ApplicationStatus::Nueva
    }

    fn next_states(self) -> &'static [Self] {
        match self {
            ApplicationStatus::Nueva => &[ApplicationStatus::Revisada],
            ApplicationStatus::Revisada => &[ApplicationStatus::Entrevista],
            ApplicationStatus::Entrevista => {
                &[ApplicationStatus::Contratada, ApplicationStatus::Rechazada]
            }
            ApplicationStatus::Contratada | ApplicationStatus::Rechazada => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Nueva => "nueva",
            ApplicationStatus::Revisada => "revisada",
            ApplicationStatus::Entrevista => "entrevista",
            ApplicationStatus::Contratada => "contratada",
            ApplicationStatus::Rechazada => "rechazada",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Borrador,
    Enviada,
    Aceptada,
    Rechazada,
}

impl Workflow for QuotationStatus {
    const ALL: &'static [Self] = &[
        QuotationStatus::Borrador,
        QuotationStatus::Enviada,
        QuotationStatus::Aceptada,
        QuotationStatus::Rechazada,
    ];

    fn initial() -> Self {
        QuotationStatus::Borrador
    }

    fn next_states(self) -> &'static [Self] {
        match self {
            QuotationStatus::Borrador => &[QuotationStatus::Enviada],
            QuotationStatus::Enviada => &[QuotationStatus::Aceptada, QuotationStatus::Rechazada],
            QuotationStatus::Aceptada | QuotationStatus::Rechazada => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            QuotationStatus::Borrador => "borrador",
            QuotationStatus::Enviada => "enviada",
            QuotationStatus::Aceptada => "aceptada",
            QuotationStatus::Rechazada => "rechazada",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(ContactStatus, ApplicationStatus, QuotationStatus);

/// One entry of a record's status audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange<S> {
    pub from: S,
    pub to: S,
    pub changed_by: Option<String>,
    pub changed_at: chrono::DateTime<chrono::Utc>,
}
