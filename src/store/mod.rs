//! Data access layer
//!
//! One repository trait per entity, each query scoped by the owner id. The
//! derivation code only ever sees what these return, so it can be exercised
//! against [`MemoryStore`] fixtures as easily as the CSV files behind
//! [`CsvStore`].

mod memory;
mod csv_store;

pub use memory::MemoryStore;
pub use csv_store::{CsvStore, CLIENTS_FILE, POLICIES_FILE, PROFILES_FILE};

use chrono::{DateTime, Utc};

use crate::client::{Client, Profile, UserId};
use crate::error::StoreError;
use crate::policy::{NewPolicy, Policy, PolicyWithClient};
use crate::renewal::sort_by_expiration;

/// Client queries
pub trait ClientRepository {
    /// All clients owned by `owner`, ordered by name
    fn list_clients_by_owner(&self, owner: UserId) -> Result<Vec<Client>, StoreError>;
}

/// Policy queries and inserts
pub trait PolicyRepository {
    /// All policies owned by `owner`, in storage order
    fn list_policies_by_owner(&self, owner: UserId) -> Result<Vec<Policy>, StoreError>;

    /// Active policies expiring in `[from, to]`, joined with their client,
    /// ascending by expiration date
    fn list_expiring_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithClient>, StoreError>;

    /// Insert one row; either the whole row lands or nothing does
    fn insert_policy(&mut self, policy: NewPolicy) -> Result<(), StoreError>;
}

/// Profile lookups
pub trait ProfileRepository {
    fn profile(&self, user: UserId) -> Result<Option<Profile>, StoreError>;
}

/// Everything the service layer needs from a backend
pub trait Backend: ClientRepository + PolicyRepository + ProfileRepository {}

impl<T: ClientRepository + PolicyRepository + ProfileRepository> Backend for T {}

/// Owner's clients sorted by name
pub(crate) fn clients_of(clients: &[Client], owner: UserId) -> Vec<Client> {
    let mut owned: Vec<Client> = clients
        .iter()
        .filter(|c| c.owner_id == owner)
        .cloned()
        .collect();
    owned.sort_by(|a, b| a.name.cmp(&b.name));
    owned
}

/// Range query with an inner join on clients, as the hosted backend runs it
///
/// Policies whose client row is missing are dropped (inner join semantics).
pub(crate) fn join_expiring(
    policies: &[Policy],
    clients: &[Client],
    owner: UserId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<PolicyWithClient> {
    let mut rows: Vec<PolicyWithClient> = policies
        .iter()
        .filter(|p| p.owner_id == owner && p.is_active())
        .filter(|p| {
            let expires = p.expires_at();
            expires >= from && expires <= to
        })
        .filter_map(|p| {
            clients
                .iter()
                .find(|c| c.id == p.client_id)
                .map(|c| PolicyWithClient::from_parts(p, c.contact()))
        })
        .collect();

    sort_by_expiration(&mut rows);
    rows
}

/// Foreign-key check the backend applies on insert
pub(crate) fn check_insert(clients: &[Client], policy: &NewPolicy) -> Result<(), StoreError> {
    let owned = clients
        .iter()
        .any(|c| c.id == policy.client_id && c.owner_id == policy.owner_id);
    if !owned {
        return Err(StoreError::Rejected(format!(
            "client {} does not belong to user {}",
            policy.client_id, policy.owner_id
        )));
    }
    if !policy.premium_amount.is_finite() {
        return Err(StoreError::Rejected("premium_amount must be numeric".to_string()));
    }
    Ok(())
}
