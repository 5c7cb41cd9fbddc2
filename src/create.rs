//! New-policy form and its validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::{Client, ClientId, UserId};
use crate::policy::{NewPolicy, PolicyStatus};

/// Maximum length of policy number and type
pub const MAX_TEXT_LEN: usize = 100;

pub const MSG_CLIENT_REQUIRED: &str = "Debe seleccionar un cliente";
pub const MSG_CLIENT_UNKNOWN: &str = "El cliente seleccionado no existe";
pub const MSG_NUMBER_REQUIRED: &str = "Número de póliza es requerido";
pub const MSG_TYPE_REQUIRED: &str = "Tipo de póliza es requerido";
pub const MSG_PREMIUM_REQUIRED: &str = "Monto de prima es requerido";
pub const MSG_PREMIUM_INVALID: &str = "Monto de prima debe ser un número válido";
pub const MSG_START_REQUIRED: &str = "Fecha de inicio es requerida";
pub const MSG_EXPIRE_REQUIRED: &str = "Fecha de vencimiento es requerida";
pub const MSG_EXPIRE_BEFORE_START: &str =
    "La fecha de vencimiento debe ser posterior a la fecha de inicio";

/// Raw input of the "Nueva Póliza" form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyForm {
    pub client_id: String,
    pub policy_number: String,
    pub policy_type: String,
    pub premium_amount: String,
    pub start_date: Option<NaiveDate>,
    pub expire_date: Option<NaiveDate>,
}

/// One inline error attached to a form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field error found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message reported for a field
    pub fn for_field(&self, field: &str) -> Option<&'static str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Form input that passed validation, ready to be tagged with an owner
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPolicyInput {
    pub client_id: ClientId,
    pub policy_number: String,
    pub policy_type: String,
    pub premium_amount: f64,
    pub start_date: NaiveDate,
    pub expire_date: NaiveDate,
}

impl ValidPolicyInput {
    /// Insert payload; new policies always start out active
    pub fn into_new_policy(self, owner: UserId) -> NewPolicy {
        NewPolicy {
            client_id: self.client_id,
            policy_number: self.policy_number,
            policy_type: self.policy_type,
            premium_amount: self.premium_amount,
            start_date: self.start_date,
            expire_date: self.expire_date,
            status: PolicyStatus::Active,
            owner_id: owner,
        }
    }
}

fn check_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    required: &'static str,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, required);
        return None;
    }
    if value.chars().count() > MAX_TEXT_LEN {
        errors.push(field, "Máximo 100 caracteres");
        return None;
    }
    Some(value.to_string())
}

impl PolicyForm {
    /// Clear every field back to the empty form
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate against the signed-in user's client list
    ///
    /// All fields are checked so the caller can show every inline error at
    /// once. `expire_date` must be strictly after `start_date`.
    pub fn validate(&self, clients: &[Client]) -> Result<ValidPolicyInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let client_id = match self.client_id.trim() {
            "" => {
                errors.push("client_id", MSG_CLIENT_REQUIRED);
                None
            }
            raw => match raw.parse::<ClientId>() {
                Ok(id) if clients.iter().any(|c| c.id == id) => Some(id),
                _ => {
                    errors.push("client_id", MSG_CLIENT_UNKNOWN);
                    None
                }
            },
        };

        let policy_number =
            check_text(&mut errors, "policy_number", &self.policy_number, MSG_NUMBER_REQUIRED);
        let policy_type =
            check_text(&mut errors, "policy_type", &self.policy_type, MSG_TYPE_REQUIRED);

        let premium_amount = match self.premium_amount.trim() {
            "" => {
                errors.push("premium_amount", MSG_PREMIUM_REQUIRED);
                None
            }
            raw => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
                _ => {
                    errors.push("premium_amount", MSG_PREMIUM_INVALID);
                    None
                }
            },
        };

        if self.start_date.is_none() {
            errors.push("start_date", MSG_START_REQUIRED);
        }
        match (self.start_date, self.expire_date) {
            (_, None) => errors.push("expire_date", MSG_EXPIRE_REQUIRED),
            (Some(start), Some(expire)) if expire <= start => {
                errors.push("expire_date", MSG_EXPIRE_BEFORE_START)
            }
            _ => {}
        }

        match (
            client_id,
            policy_number,
            policy_type,
            premium_amount,
            self.start_date,
            self.expire_date,
        ) {
            (
                Some(client_id),
                Some(policy_number),
                Some(policy_type),
                Some(premium_amount),
                Some(start_date),
                Some(expire_date),
            ) if errors.is_empty() => Ok(ValidPolicyInput {
                client_id,
                policy_number,
                policy_type,
                premium_amount,
                start_date,
                expire_date,
            }),
            _ => Err(errors),
        }
    }
}
