//! Backend stored as CSV files in a data directory
//!
//! Every query re-reads the files; nothing is cached between calls.

use chrono::{DateTime, Utc};
use log::debug;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{check_insert, clients_of, join_expiring};
use super::{ClientRepository, PolicyRepository, ProfileRepository};
use crate::client::{load_clients, load_profiles, Client, Profile, UserId};
use crate::error::StoreError;
use crate::policy::{append_policy, load_policies, NewPolicy, Policy, PolicyWithClient};

pub const CLIENTS_FILE: &str = "clients.csv";
pub const POLICIES_FILE: &str = "policies.csv";
pub const PROFILES_FILE: &str = "profiles.csv";

/// Backend rooted at a directory holding `clients.csv`, `policies.csv`
/// and optionally `profiles.csv`
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Open a data directory; it must exist
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(StoreError::Io {
                path: dir.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found"),
            });
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn all_clients(&self) -> Result<Vec<Client>, StoreError> {
        let path = self.dir.join(CLIENTS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        load_clients(path)
    }

    fn all_policies(&self) -> Result<Vec<Policy>, StoreError> {
        let path = self.dir.join(POLICIES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        load_policies(path)
    }
}

impl ClientRepository for CsvStore {
    fn list_clients_by_owner(&self, owner: UserId) -> Result<Vec<Client>, StoreError> {
        debug!("select clients where user_id = {} order by name", owner);
        Ok(clients_of(&self.all_clients()?, owner))
    }
}

impl PolicyRepository for CsvStore {
    fn list_policies_by_owner(&self, owner: UserId) -> Result<Vec<Policy>, StoreError> {
        debug!("select policies where user_id = {}", owner);
        let mut policies = self.all_policies()?;
        policies.retain(|p| p.owner_id == owner);
        Ok(policies)
    }

    fn list_expiring_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithClient>, StoreError> {
        debug!(
            "select policies join clients where user_id = {} and status = active and expire_date in [{}, {}]",
            owner, from, to
        );
        let policies = self.all_policies()?;
        let clients = self.all_clients()?;
        Ok(join_expiring(&policies, &clients, owner, from, to))
    }

    fn insert_policy(&mut self, policy: NewPolicy) -> Result<(), StoreError> {
        check_insert(&self.all_clients()?, &policy)?;

        let id = Uuid::new_v4();
        debug!("insert policy {} ({}) for user {}", id, policy.policy_number, policy.owner_id);
        append_policy(self.dir.join(POLICIES_FILE), &Policy::from_new(id, policy))
    }
}

impl ProfileRepository for CsvStore {
    fn profile(&self, user: UserId) -> Result<Option<Profile>, StoreError> {
        let profiles = load_profiles(self.dir.join(PROFILES_FILE))?;
        Ok(profiles.into_iter().find(|p| p.id == user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyStatus;
    use chrono::{NaiveDate, TimeZone};
    use std::fs;

    const OWNER: &str = "5a5a5a5a-1111-4222-8333-444455556666";
    const CLIENT: &str = "0b9f4c1e-3a2d-4e5f-8a7b-9c0d1e2f3a4b";

    fn seed(dir: &Path) {
        fs::write(
            dir.join(CLIENTS_FILE),
            format!("id,name,email,user_id\n{CLIENT},Ana García,ana@example.com,{OWNER}\n"),
        )
        .unwrap();
        fs::write(
            dir.join(PROFILES_FILE),
            format!("id,full_name\n{OWNER},Marta Ruiz\n"),
        )
        .unwrap();
    }

    #[test]
    fn test_insert_visible_to_next_read() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let owner: UserId = OWNER.parse().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();

        assert!(store.list_policies_by_owner(owner).unwrap().is_empty());

        store
            .insert_policy(NewPolicy {
                client_id: CLIENT.parse().unwrap(),
                policy_number: "POL-2024-001".into(),
                policy_type: "Auto".into(),
                premium_amount: 1500.0,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                expire_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                status: PolicyStatus::Active,
                owner_id: owner,
            })
            .unwrap();

        let policies = store.list_policies_by_owner(owner).unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].policy_number, "POL-2024-001");

        let from = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let rows = store
            .list_expiring_between(owner, from, from + chrono::Duration::days(60))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client.name, "Ana García");
    }

    #[test]
    fn test_profile_lookup() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let store = CsvStore::open(dir.path()).unwrap();

        let profile = store.profile(OWNER.parse().unwrap()).unwrap();
        assert_eq!(profile.and_then(|p| p.full_name).as_deref(), Some("Marta Ruiz"));
        assert!(store.profile(Uuid::nil()).unwrap().is_none());
    }

    #[test]
    fn test_open_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvStore::open(dir.path().join("nope")).is_err());
    }
}
