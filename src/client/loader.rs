//! Load clients and profiles from the CSV backend files

use super::{Client, Profile};
use crate::error::StoreError;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching clients.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: uuid::Uuid,
    name: String,
    #[serde(default)]
    email: Option<String>,
    user_id: uuid::Uuid,
}

impl CsvRow {
    fn to_client(self, row: usize) -> Result<Client, StoreError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::InvalidRow {
                table: "clients",
                row,
                message: "empty name".to_string(),
            });
        }

        Ok(Client {
            id: self.id,
            name,
            email: self.email.filter(|e| !e.trim().is_empty()),
            owner_id: self.user_id,
        })
    }
}

/// Load all clients from a CSV file
pub fn load_clients<P: AsRef<Path>>(path: P) -> Result<Vec<Client>, StoreError> {
    let reader = Reader::from_path(path)?;
    read_clients(reader)
}

/// Load clients from any reader
pub fn load_clients_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Client>, StoreError> {
    read_clients(Reader::from_reader(reader))
}

fn read_clients<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Client>, StoreError> {
    let mut clients = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        clients.push(row.to_client(idx + 1)?);
    }

    Ok(clients)
}

/// Load profiles (`id,full_name`); a missing file means no profiles
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = Reader::from_path(path)?;
    let mut profiles = Vec::new();
    for result in reader.deserialize() {
        let profile: Profile = result?;
        profiles.push(profile);
    }

    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_clients() {
        let data = "\
id,name,email,user_id
0b9f4c1e-3a2d-4e5f-8a7b-9c0d1e2f3a4b,Ana García,ana@example.com,5a5a5a5a-1111-4222-8333-444455556666
1c0a5d2f-4b3e-4f60-9b8c-0d1e2f3a4b5c,Luis Pérez,,5a5a5a5a-1111-4222-8333-444455556666
";
        let clients = load_clients_from_reader(data.as_bytes()).expect("Failed to load clients");
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "Ana García");
        assert_eq!(clients[0].email.as_deref(), Some("ana@example.com"));
        assert_eq!(clients[1].email, None);
        assert_eq!(clients[1].contact().email, "");
    }

    #[test]
    fn test_missing_profiles_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = load_profiles(dir.path().join("profiles.csv")).unwrap();
        assert!(profiles.is_empty());
    }
}
