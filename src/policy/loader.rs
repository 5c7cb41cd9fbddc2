//! Load and append policies in the `policies.csv` backend format

use super::{Policy, PolicyStatus};
use crate::error::StoreError;
use chrono::{DateTime, NaiveDate};
use csv::{Reader, WriterBuilder};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Raw CSV row matching policies.csv columns
///
/// Premium and dates stay strings here: the stored representation is
/// coerced explicitly so a bad row reports which column broke.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct CsvRow {
    id: uuid::Uuid,
    client_id: uuid::Uuid,
    policy_number: String,
    policy_type: String,
    premium_amount: String,
    start_date: String,
    expire_date: String,
    status: String,
    user_id: uuid::Uuid,
}

/// Parse a stored date, accepting plain dates and full timestamps
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.date_naive())
}

impl CsvRow {
    fn to_policy(self, row: usize) -> Result<Policy, StoreError> {
        let invalid = |message: String| StoreError::InvalidRow {
            table: "policies",
            row,
            message,
        };

        let premium_amount: f64 = self
            .premium_amount
            .trim()
            .parse()
            .map_err(|_| invalid(format!("premium_amount {:?} is not numeric", self.premium_amount)))?;

        let start_date = parse_stored_date(&self.start_date)
            .ok_or_else(|| invalid(format!("Unknown start_date: {}", self.start_date)))?;
        let expire_date = parse_stored_date(&self.expire_date)
            .ok_or_else(|| invalid(format!("Unknown expire_date: {}", self.expire_date)))?;

        Ok(Policy {
            id: self.id,
            client_id: self.client_id,
            policy_number: self.policy_number,
            policy_type: self.policy_type,
            premium_amount,
            start_date,
            expire_date,
            status: PolicyStatus::from(self.status),
            owner_id: self.user_id,
        })
    }

    fn from_policy(policy: &Policy) -> Self {
        Self {
            id: policy.id,
            client_id: policy.client_id,
            policy_number: policy.policy_number.clone(),
            policy_type: policy.policy_type.clone(),
            premium_amount: policy.premium_amount.to_string(),
            start_date: policy.start_date.format("%Y-%m-%d").to_string(),
            expire_date: policy.expire_date.format("%Y-%m-%d").to_string(),
            status: policy.status.as_str().to_string(),
            user_id: policy.owner_id,
        }
    }
}

/// Load all policies from a CSV file
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<Policy>, StoreError> {
    let reader = Reader::from_path(path)?;
    read_policies(reader)
}

/// Load policies from any reader (e.g., string buffer, network stream)
pub fn load_policies_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Policy>, StoreError> {
    read_policies(Reader::from_reader(reader))
}

fn read_policies<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Policy>, StoreError> {
    let mut policies = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        policies.push(row.to_policy(idx + 1)?);
    }

    Ok(policies)
}

/// Append one policy to a CSV file, writing the header if the file is new
pub fn append_policy<P: AsRef<Path>>(path: P, policy: &Policy) -> Result<(), StoreError> {
    let path = path.as_ref();
    let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;

    // A hand-edited file may end without a newline; the new row must not
    // join the last one.
    if !needs_header {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(io_err)?;
        file.read_exact(&mut last).map_err(io_err)?;
        if last[0] != b'\n' {
            file.write_all(b"\n").map_err(io_err)?;
        }
    }

    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(CsvRow::from_policy(policy))?;
    writer.flush().map_err(io_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,client_id,policy_number,policy_type,premium_amount,start_date,expire_date,status,user_id
6f1c2a4e-0b7d-4f0a-9d55-1f6f0c7b2a01,0b9f4c1e-3a2d-4e5f-8a7b-9c0d1e2f3a4b,POL-2024-001,Auto,1500.00,2024-01-10,2025-01-10,active,5a5a5a5a-1111-4222-8333-444455556666
7e2d3b5f-1c8e-4a1b-8e66-2a7a1d8c3b02,0b9f4c1e-3a2d-4e5f-8a7b-9c0d1e2f3a4b,POL-2024-002,Vida,  820.5 ,2024-03-01T00:00:00+00:00,2025-03-01,cancelled,5a5a5a5a-1111-4222-8333-444455556666
";

    #[test]
    fn test_load_policies_from_reader() {
        let policies = load_policies_from_reader(SAMPLE.as_bytes()).expect("Failed to load policies");
        assert_eq!(policies.len(), 2);

        let p1 = &policies[0];
        assert_eq!(p1.policy_number, "POL-2024-001");
        assert_eq!(p1.premium_amount, 1500.0);
        assert!(p1.is_active());

        // Padded numerics and timestamp dates are coerced
        let p2 = &policies[1];
        assert_eq!(p2.premium_amount, 820.5);
        assert_eq!(p2.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(p2.status, PolicyStatus::Other("cancelled".into()));
    }

    #[test]
    fn test_non_numeric_premium_is_reported() {
        let bad = SAMPLE.replace("1500.00", "mil");
        let err = load_policies_from_reader(bad.as_bytes()).unwrap_err();
        match err {
            StoreError::InvalidRow { table, row, .. } => {
                assert_eq!(table, "policies");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policies.csv");
        let policies = load_policies_from_reader(SAMPLE.as_bytes()).unwrap();

        append_policy(&path, &policies[0]).unwrap();
        append_policy(&path, &policies[1]).unwrap();

        let reloaded = load_policies(&path).unwrap();
        assert_eq!(reloaded, policies);
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policies.csv");
        let policies = load_policies_from_reader(SAMPLE.as_bytes()).unwrap();

        std::fs::write(&path, SAMPLE.lines().take(2).collect::<Vec<_>>().join("\n")).unwrap();
        append_policy(&path, &policies[1]).unwrap();

        let reloaded = load_policies(&path).unwrap();
        assert_eq!(reloaded, policies);
    }
}
