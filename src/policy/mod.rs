//! Policy data structures and backend row loading

mod data;
pub mod loader;

pub use data::{date_instant, NewPolicy, Policy, PolicyId, PolicyStatus, PolicyWithClient};
pub use loader::{append_policy, load_policies, load_policies_from_reader, parse_stored_date};
