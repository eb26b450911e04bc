//! # SpeakSpace Core
//!
//! Domain types shared by the storage and HTTP layers: the user directory,
//! discussions and their rosters, and the feedback ledger.
//!
//! - [`models`] holds the records and request/response payloads.
//! - [`rules`] holds the pure decisions (capacity, status gates, rating
//!   ranges) that every store applies inside its transaction.
//! - [`repositories`] defines the storage ports the API is written against.

pub mod errors;
pub mod models;
pub mod repositories;
pub mod rules;
