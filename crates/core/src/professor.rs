//! Professor record and its write-side inputs.
//!
//! A professor references its owning [`User`] by id only. The reference is
//! never checked for existence on write; readers that need the owner's data
//! ask the store for a [`PopulatedProfessor`].

use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, ProfessorId, User, UserId};

/// Stored professor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    pub id: ProfessorId,
    pub name: String,
    pub subject: String,
    pub user_ref: UserId,
}

/// Professor with its owning user expanded in place of the reference.
///
/// `user_ref` is `None` when the referenced user no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedProfessor {
    pub id: ProfessorId,
    pub name: String,
    pub subject: String,
    pub user_ref: Option<User>,
}

/// Validated input for creating a professor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfessor {
    name: String,
    subject: String,
    user_ref: UserId,
}

impl NewProfessor {
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        user_ref: UserId,
    ) -> DomainResult<Self> {
        Self::checked(Some(name.into()), Some(subject.into()), Ok(user_ref))
    }

    /// Build from raw, possibly missing request fields.
    ///
    /// Every failing field is reported in a single error, in field order.
    pub fn from_parts(
        name: Option<String>,
        subject: Option<String>,
        user_ref: Option<String>,
    ) -> DomainResult<Self> {
        let user_ref = match user_ref {
            Some(raw) => parse_user_ref(&raw),
            None => Err(required("userRef")),
        };
        Self::checked(name, subject, user_ref)
    }

    fn checked(
        name: Option<String>,
        subject: Option<String>,
        user_ref: Result<UserId, String>,
    ) -> DomainResult<Self> {
        let mut problems = Vec::new();
        let name = required_text("name", name, &mut problems);
        let subject = required_text("subject", subject, &mut problems);
        let user_ref = user_ref.map_err(|p| problems.push(p)).ok();
        finish(problems)?;

        match (name, subject, user_ref) {
            (Some(name), Some(subject), Some(user_ref)) => Ok(Self {
                name,
                subject,
                user_ref,
            }),
            _ => Err(DomainError::validation("incomplete professor")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn user_ref(&self) -> UserId {
        self.user_ref
    }

    /// Materialize the record under a freshly allocated id.
    pub fn into_professor(self, id: ProfessorId) -> Professor {
        Professor {
            id,
            name: self.name,
            subject: self.subject,
            user_ref: self.user_ref,
        }
    }
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessorPatch {
    name: Option<String>,
    subject: Option<String>,
    user_ref: Option<UserId>,
}

impl ProfessorPatch {
    pub fn new(
        name: Option<String>,
        subject: Option<String>,
        user_ref: Option<UserId>,
    ) -> DomainResult<Self> {
        Self::checked(name, subject, user_ref.map(Ok))
    }

    /// Build from raw request fields; absent fields stay untouched.
    pub fn from_parts(
        name: Option<String>,
        subject: Option<String>,
        user_ref: Option<String>,
    ) -> DomainResult<Self> {
        Self::checked(name, subject, user_ref.map(|raw| parse_user_ref(&raw)))
    }

    fn checked(
        name: Option<String>,
        subject: Option<String>,
        user_ref: Option<Result<UserId, String>>,
    ) -> DomainResult<Self> {
        let mut problems = Vec::new();
        if let Some(n) = &name {
            check_text("name", n, &mut problems);
        }
        if let Some(s) = &subject {
            check_text("subject", s, &mut problems);
        }
        let user_ref = match user_ref {
            Some(Ok(id)) => Some(id),
            Some(Err(p)) => {
                problems.push(p);
                None
            }
            None => None,
        };
        finish(problems)?;

        Ok(Self {
            name,
            subject,
            user_ref,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn user_ref(&self) -> Option<UserId> {
        self.user_ref
    }
}

impl Professor {
    /// Apply a partial update. The id never changes.
    pub fn apply(&mut self, patch: &ProfessorPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(subject) = &patch.subject {
            self.subject = subject.clone();
        }
        if let Some(user_ref) = patch.user_ref {
            self.user_ref = user_ref;
        }
    }

    /// Expand the owner reference with the looked-up user (if any).
    pub fn populate(self, user: Option<User>) -> PopulatedProfessor {
        PopulatedProfessor {
            id: self.id,
            name: self.name,
            subject: self.subject,
            user_ref: user.filter(|u| u.id == self.user_ref),
        }
    }
}

fn required(field: &str) -> String {
    format!("{field} is required")
}

fn check_text(field: &str, value: &str, problems: &mut Vec<String>) {
    if value.trim().is_empty() {
        problems.push(format!("{field} must not be empty"));
    }
}

fn required_text(field: &str, value: Option<String>, problems: &mut Vec<String>) -> Option<String> {
    match value {
        Some(v) => {
            check_text(field, &v, problems);
            Some(v)
        }
        None => {
            problems.push(required(field));
            None
        }
    }
}

fn parse_user_ref(raw: &str) -> Result<UserId, String> {
    raw.parse::<UserId>()
        .map_err(|_| format!("userRef `{raw}` is not a valid user id"))
}

fn finish(problems: Vec<String>) -> DomainResult<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation(problems.join(", ")))
    }
}
