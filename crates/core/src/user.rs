//! User account as seen by this service (read-only collaborator).

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Owner of professor records. Never created or mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}
