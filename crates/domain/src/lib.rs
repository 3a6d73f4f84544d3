//! Domain layer for the CineSync backend.
//!
//! This crate contains the domain models and request/response DTOs for the
//! five persisted entities (User, Space, PersonalList, Invitation,
//! VideoExtraction) and the embedded MovieRecord value type.

pub mod models;
