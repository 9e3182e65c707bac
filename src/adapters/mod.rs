//! Infrastructure adapters implementing domain ports.

pub mod sqlite;
