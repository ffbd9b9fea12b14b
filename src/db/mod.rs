//! Access to the reservation store.

pub mod queries;

pub use queries::*;
