//! Core library for the GranTES scholarship administration portal.
//!
//! This crate exposes the database utilities, wire types, and HTTP
//! routing used by the server binary. Integration tests drive the router
//! in-process against an in-memory database.

pub mod compat;
pub mod db;
pub mod error;
pub mod models;
pub mod passwords;
pub mod routes;
pub mod schema;
pub mod server;
