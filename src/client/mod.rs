//! Client (policyholder) records and user profiles

mod data;
pub mod loader;

pub use data::{Client, ClientContact, ClientId, Profile, UserId};
pub use loader::{load_clients, load_clients_from_reader, load_profiles};
