use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::roles::Role;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUserModel {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
}

/// Per-request authorization policy, computed once from the caller's
/// identity instead of re-deriving role checks at every call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessScope {
    user_id: Uuid,
    role: Role,
}

impl AccessScope {
    pub fn new(user: &AuthUserModel) -> Self {
        Self {
            user_id: user.user_id,
            role: user.role,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// `None` means unrestricted (manager); `Some(id)` restricts
    /// queries to rows owned by that user.
    pub fn owner_filter(&self) -> Option<Uuid> {
        if self.role.is_manager() {
            None
        } else {
            Some(self.user_id)
        }
    }

    pub fn can_view(&self, owner_id: Uuid) -> bool {
        self.can_mutate(owner_id)
    }

    pub fn can_mutate(&self, owner_id: Uuid) -> bool {
        self.role.is_manager() || self.user_id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: Role) -> AuthUserModel {
        AuthUserModel {
            user_id: Uuid::new_v4(),
            email: None,
            role,
        }
    }

    #[test]
    fn manager_scope_is_unrestricted() {
        let scope = AccessScope::new(&user_with_role(Role::Manager));
        assert_eq!(scope.owner_filter(), None);
        assert!(scope.can_mutate(Uuid::new_v4()));
    }

    #[test]
    fn regular_user_is_restricted_to_own_rows() {
        let user = user_with_role(Role::User);
        let scope = AccessScope::new(&user);
        assert_eq!(scope.owner_filter(), Some(user.user_id));
        assert!(scope.can_mutate(user.user_id));
        assert!(!scope.can_mutate(Uuid::new_v4()));
    }
}
