use serde::{Deserialize, Serialize};

use escola_core::{DomainResult, NewProfessor, ProfessorPatch};

// -------------------------
// Request DTOs
// -------------------------

/// Create body. Fields are optional here so missing ones surface as a
/// validation message rather than a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfessorRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub user_ref: Option<String>,
}

impl CreateProfessorRequest {
    pub fn into_new_professor(self) -> DomainResult<NewProfessor> {
        NewProfessor::from_parts(self.name, self.subject, self.user_ref)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfessorRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub user_ref: Option<String>,
}

impl UpdateProfessorRequest {
    pub fn into_patch(self) -> DomainResult<ProfessorPatch> {
        ProfessorPatch::from_parts(self.name, self.subject, self.user_ref)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
