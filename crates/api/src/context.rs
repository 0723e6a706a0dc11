use escola_core::UserId;

/// Authenticated caller, inserted by the auth middleware.
///
/// Handlers do not authorize on it; any authenticated user may use every route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
}

impl PrincipalContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
