//! `escola-core` — domain types for the professor registry.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod professor;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use id::{ProfessorId, UserId};
pub use professor::{NewProfessor, PopulatedProfessor, Professor, ProfessorPatch};
pub use user::User;
