// stayflow-api: Async Rust client for the stayflow guest check-in backend

pub mod checkin;
pub mod client;
pub mod documents;
pub mod error;
pub mod profile;
pub mod reservations;
pub mod transport;
pub mod types;

pub use client::CheckinClient;
pub use error::Error;
pub use transport::TransportConfig;
