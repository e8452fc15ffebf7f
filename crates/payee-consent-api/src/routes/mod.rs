//! # API Route Modules
//!
//! All broker routes live under `/payee`; see [`payee`].

pub mod payee;
