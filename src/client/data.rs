//! Client and profile data structures

use serde::{Deserialize, Serialize};

/// Authenticated user identifier; every query is scoped by it
pub type UserId = uuid::Uuid;

/// Unique client identifier
pub type ClientId = uuid::Uuid;

/// A policyholder owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    /// User the client belongs to
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
}

impl Client {
    /// Contact details as joined onto renewal rows
    pub fn contact(&self) -> ClientContact {
        ClientContact {
            name: self.name.clone(),
            email: self.email.clone().unwrap_or_default(),
        }
    }
}

/// Client name and email joined onto a policy row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    pub name: String,
    pub email: String,
}

/// Per-user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,

    #[serde(default)]
    pub full_name: Option<String>,
}
