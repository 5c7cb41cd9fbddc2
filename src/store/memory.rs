//! In-memory backend for fixtures and tests

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use super::{check_insert, clients_of, join_expiring};
use super::{ClientRepository, PolicyRepository, ProfileRepository};
use crate::client::{Client, Profile, UserId};
use crate::error::StoreError;
use crate::policy::{NewPolicy, Policy, PolicyWithClient};

/// Backend held entirely in memory
///
/// Failures can be injected to exercise the service layer's error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    clients: Vec<Client>,
    policies: Vec<Policy>,
    profiles: Vec<Profile>,
    offline: bool,
    reject_inserts: Option<String>,
    insert_attempts: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients(mut self, clients: Vec<Client>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_policies(mut self, policies: Vec<Policy>) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_profiles(mut self, profiles: Vec<Profile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Make every read fail as if the backend were unreachable
    pub fn go_offline(&mut self) {
        self.offline = true;
    }

    /// Make every insert fail with the given backend message
    pub fn reject_inserts(&mut self, reason: &str) {
        self.reject_inserts = Some(reason.to_string());
    }

    /// Stored policies across all owners
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Number of insert calls that reached the backend
    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ClientRepository for MemoryStore {
    fn list_clients_by_owner(&self, owner: UserId) -> Result<Vec<Client>, StoreError> {
        self.ensure_online()?;
        Ok(clients_of(&self.clients, owner))
    }
}

impl PolicyRepository for MemoryStore {
    fn list_policies_by_owner(&self, owner: UserId) -> Result<Vec<Policy>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .policies
            .iter()
            .filter(|p| p.owner_id == owner)
            .cloned()
            .collect())
    }

    fn list_expiring_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithClient>, StoreError> {
        self.ensure_online()?;
        Ok(join_expiring(&self.policies, &self.clients, owner, from, to))
    }

    fn insert_policy(&mut self, policy: NewPolicy) -> Result<(), StoreError> {
        self.insert_attempts += 1;
        self.ensure_online()?;
        if let Some(reason) = &self.reject_inserts {
            return Err(StoreError::Rejected(reason.clone()));
        }
        check_insert(&self.clients, &policy)?;

        let id = Uuid::new_v4();
        debug!("memory insert policy {} ({})", id, policy.policy_number);
        self.policies.push(Policy::from_new(id, policy));
        Ok(())
    }
}

impl ProfileRepository for MemoryStore {
    fn profile(&self, user: UserId) -> Result<Option<Profile>, StoreError> {
        self.ensure_online()?;
        Ok(self.profiles.iter().find(|p| p.id == user).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyStatus;
    use chrono::{NaiveDate, TimeZone};

    fn client(owner: UserId, name: &str) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            owner_id: owner,
        }
    }

    fn policy(owner: UserId, client: &Client, expire: NaiveDate, status: PolicyStatus) -> Policy {
        Policy {
            id: Uuid::new_v4(),
            client_id: client.id,
            policy_number: format!("POL-{}", expire),
            policy_type: "Auto".to_string(),
            premium_amount: 1000.0,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            expire_date: expire,
            status,
            owner_id: owner,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_queries_are_scoped_by_owner() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let ca = client(alice, "Zoe");
        let cb = client(bob, "Bruno");
        let store = MemoryStore::new()
            .with_clients(vec![ca.clone(), cb.clone(), client(alice, "Ana")])
            .with_policies(vec![
                policy(alice, &ca, date(2024, 7, 1), PolicyStatus::Active),
                policy(bob, &cb, date(2024, 7, 1), PolicyStatus::Active),
            ]);

        let clients = store.list_clients_by_owner(alice).unwrap();
        let names: Vec<_> = clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Zoe"]);
        assert_eq!(store.list_policies_by_owner(alice).unwrap().len(), 1);
        assert_eq!(store.list_policies_by_owner(bob).unwrap().len(), 1);
    }

    #[test]
    fn test_expiring_join_sorted_ascending() {
        let owner = Uuid::new_v4();
        let c = client(owner, "Ana");
        let store = MemoryStore::new()
            .with_clients(vec![c.clone()])
            .with_policies(vec![
                policy(owner, &c, date(2024, 7, 20), PolicyStatus::Active),
                policy(owner, &c, date(2024, 6, 10), PolicyStatus::Active),
                policy(owner, &c, date(2024, 6, 15), PolicyStatus::Other("cancelled".into())),
                policy(owner, &c, date(2024, 12, 1), PolicyStatus::Active),
            ]);

        let from = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let to = from + chrono::Duration::days(60);
        let rows = store.list_expiring_between(owner, from, to).unwrap();

        let dates: Vec<_> = rows.iter().map(|r| r.expire_date).collect();
        assert_eq!(dates, vec![date(2024, 6, 10), date(2024, 7, 20)]);
        assert_eq!(rows[0].client.name, "Ana");
        assert_eq!(rows[0].client.email, "ana@example.com");
    }

    #[test]
    fn test_insert_rejects_foreign_client() {
        let owner = Uuid::new_v4();
        let other = client(Uuid::new_v4(), "Otro");
        let mut store = MemoryStore::new().with_clients(vec![other.clone()]);

        let result = store.insert_policy(NewPolicy {
            client_id: other.id,
            policy_number: "POL-9".into(),
            policy_type: "Vida".into(),
            premium_amount: 10.0,
            start_date: date(2024, 1, 1),
            expire_date: date(2025, 1, 1),
            status: PolicyStatus::Active,
            owner_id: owner,
        });

        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert!(store.policies().is_empty());
        assert_eq!(store.insert_attempts(), 1);
    }

    #[test]
    fn test_offline_reads_fail() {
        let mut store = MemoryStore::new();
        store.go_offline();
        assert!(matches!(
            store.list_policies_by_owner(Uuid::nil()),
            Err(StoreError::Unavailable(_))
        ));
    }
}
