//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Own field normalization and validation for unsaved drafts.
//!
//! # Invariants
//! - A persisted note never has an empty title or empty content.
//! - The title is the business key; the surrogate row id is never exposed
//!   to callers as an identity.

pub mod note;
