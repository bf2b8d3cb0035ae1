//! Access policy: who may do what to which record.
//!
//! Every registry consults these predicates at the top of each operation.
//! They are pure: no storage access, no logging. The caller decides what
//! to record when a [`Decision`] comes back denied.

use std::fmt;

use super::{Actor, UserRole};
use crate::errors::{AppError, AppResult};

/// True iff the role is Admin.
pub fn is_admin(role: UserRole) -> bool {
    role.is_admin()
}

/// True iff the actor is Admin or owns the target.
///
/// A target without an owner is only reachable by Admins.
pub fn owns_or_admin(role: UserRole, actor_id: i32, target_owner_id: Option<i32>) -> bool {
    is_admin(role) || target_owner_id == Some(actor_id)
}

/// Actions subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewAssets,
    CreateAsset,
    EditAsset { owner_id: Option<i32> },
    DeleteAsset { owner_id: Option<i32> },
    ApproveAsset,
    ViewDepartments,
    CreateDepartment,
    EditDepartment,
    DeleteDepartment,
    ViewUsers,
    CreateUser,
    EditUser { target_id: i32 },
    DeleteUser { target_id: i32 },
    PromoteUser,
    ViewLogs,
    DeleteLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    AdminOnly,
    NotOwner,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::AdminOnly => f.write_str("requires the Admin role"),
            DenialReason::NotOwner => f.write_str("actor neither owns the record nor is Admin"),
        }
    }
}

/// A refused action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub action: Action,
    pub reason: DenialReason,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} denied: {}", self.action, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(denial) => Err(denial),
        }
    }
}

/// Which records a read may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Only(i32),
}

impl Scope {
    pub fn admits(&self, id: Option<i32>) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(only) => id == Some(*only),
        }
    }
}

pub struct AccessPolicy;

impl AccessPolicy {
    /// Decide whether `actor` may perform `action`.
    pub fn decide(actor: &Actor, action: Action) -> Decision {
        let admin_only = || {
            if is_admin(actor.role) {
                Decision::Allowed
            } else {
                Decision::Denied(Denial {
                    action,
                    reason: DenialReason::AdminOnly,
                })
            }
        };
        let owner_or_admin = |owner_id: Option<i32>| {
            if owns_or_admin(actor.role, actor.id, owner_id) {
                Decision::Allowed
            } else {
                Decision::Denied(Denial {
                    action,
                    reason: DenialReason::NotOwner,
                })
            }
        };

        match action {
            Action::ViewAssets
            | Action::CreateAsset
            | Action::ViewDepartments
            | Action::ViewUsers => Decision::Allowed,

            Action::EditAsset { owner_id } | Action::DeleteAsset { owner_id } => {
                owner_or_admin(owner_id)
            }
            Action::EditUser { target_id } | Action::DeleteUser { target_id } => {
                owner_or_admin(Some(target_id))
            }

            Action::ApproveAsset
            | Action::CreateDepartment
            | Action::EditDepartment
            | Action::DeleteDepartment
            | Action::CreateUser
            | Action::PromoteUser
            | Action::ViewLogs
            | Action::DeleteLog => admin_only(),
        }
    }

    /// Assets visible to the actor.
    pub fn asset_scope(actor: &Actor) -> Scope {
        if actor.is_admin() {
            Scope::All
        } else {
            Scope::Only(actor.id)
        }
    }

    /// Users visible to the actor.
    pub fn user_scope(actor: &Actor) -> Scope {
        Self::asset_scope(actor)
    }

    /// Whether an edit by this actor may change the `approved` flag.
    pub fn may_set_approval(actor: &Actor) -> bool {
        actor.is_admin()
    }

    /// The role an edit or creation by this actor will actually store.
    ///
    /// Non-admins always get `User`, whatever they submitted. Admin
    /// submissions must name a real role.
    pub fn effective_role(actor: &Actor, requested: &str) -> AppResult<UserRole> {
        if !actor.is_admin() {
            return Ok(UserRole::User);
        }
        UserRole::parse(requested)
            .ok_or_else(|| AppError::validation("Invalid role. Must be 'User' or 'Admin'"))
    }

    /// An Admin editing their own record down to `User`.
    pub fn is_self_demotion(actor: &Actor, target_id: i32, role: UserRole) -> bool {
        actor.is_admin() && actor.id == target_id && role == UserRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn admin() -> Actor {
        Actor {
            id: 1,
            username: "admin".into(),
            role: UserRole::Admin,
        }
    }

    fn user(id: i32) -> Actor {
        Actor {
            id,
            username: format!("user{}", id),
            role: UserRole::User,
        }
    }

    #[test]
    fn test_owns_or_admin() {
        assert!(owns_or_admin(UserRole::Admin, 1, None));
        assert!(owns_or_admin(UserRole::Admin, 1, Some(9)));
        assert!(owns_or_admin(UserRole::User, 2, Some(2)));
        assert!(!owns_or_admin(UserRole::User, 2, Some(3)));
        assert!(!owns_or_admin(UserRole::User, 2, None));
    }

    #[test]
    fn test_admin_is_allowed_everything() {
        let actions = [
            Action::ViewAssets,
            Action::CreateAsset,
            Action::EditAsset { owner_id: Some(5) },
            Action::DeleteAsset { owner_id: None },
            Action::ApproveAsset,
            Action::ViewDepartments,
            Action::CreateDepartment,
            Action::EditDepartment,
            Action::DeleteDepartment,
            Action::ViewUsers,
            Action::CreateUser,
            Action::EditUser { target_id: 5 },
            Action::DeleteUser { target_id: 5 },
            Action::PromoteUser,
            Action::ViewLogs,
            Action::DeleteLog,
        ];
        for action in actions {
            assert_eq!(AccessPolicy::decide(&admin(), action), Decision::Allowed, "{:?}", action);
        }
    }

    #[test]
    fn test_user_admin_only_actions_denied() {
        let actor = user(2);
        for action in [
            Action::ApproveAsset,
            Action::CreateDepartment,
            Action::EditDepartment,
            Action::DeleteDepartment,
            Action::CreateUser,
            Action::PromoteUser,
            Action::ViewLogs,
            Action::DeleteLog,
        ] {
            assert_eq!(
                AccessPolicy::decide(&actor, action),
                Decision::Denied(Denial {
                    action,
                    reason: DenialReason::AdminOnly
                })
            );
        }
    }

    #[test]
    fn test_user_open_actions_allowed() {
        let actor = user(2);
        for action in [
            Action::ViewAssets,
            Action::CreateAsset,
            Action::ViewDepartments,
            Action::ViewUsers,
        ] {
            assert_ok!(AccessPolicy::decide(&actor, action).into_result());
        }
    }

    #[test]
    fn test_user_ownership_actions() {
        let actor = user(2);
        assert_ok!(AccessPolicy::decide(&actor, Action::EditAsset { owner_id: Some(2) }).into_result());
        assert_ok!(AccessPolicy::decide(&actor, Action::DeleteUser { target_id: 2 }).into_result());

        let denied = AccessPolicy::decide(&actor, Action::EditAsset { owner_id: Some(3) });
        assert!(matches!(
            denied,
            Decision::Denied(Denial {
                reason: DenialReason::NotOwner,
                ..
            })
        ));
        assert_err!(AccessPolicy::decide(&actor, Action::DeleteAsset { owner_id: None }).into_result());
        assert_ok!(AccessPolicy::decide(&actor, Action::DeleteAsset { owner_id: Some(2) }).into_result());
        assert_err!(AccessPolicy::decide(&actor, Action::EditUser { target_id: 3 }).into_result());
    }

    #[test]
    fn test_scopes() {
        assert_eq!(AccessPolicy::asset_scope(&admin()), Scope::All);
        assert_eq!(AccessPolicy::asset_scope(&user(4)), Scope::Only(4));
        assert_eq!(AccessPolicy::user_scope(&user(4)), Scope::Only(4));
        assert!(Scope::Only(4).admits(Some(4)));
        assert!(!Scope::Only(4).admits(None));
        assert!(Scope::All.admits(None));
    }

    #[test]
    fn test_effective_role() {
        assert_eq!(AccessPolicy::effective_role(&user(2), "Admin").unwrap(), UserRole::User);
        assert_eq!(AccessPolicy::effective_role(&user(2), "nonsense").unwrap(), UserRole::User);
        assert_eq!(AccessPolicy::effective_role(&admin(), "Admin").unwrap(), UserRole::Admin);
        assert!(matches!(
            AccessPolicy::effective_role(&admin(), "superuser"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_self_demotion() {
        assert!(AccessPolicy::is_self_demotion(&admin(), 1, UserRole::User));
        assert!(!AccessPolicy::is_self_demotion(&admin(), 1, UserRole::Admin));
        assert!(!AccessPolicy::is_self_demotion(&admin(), 2, UserRole::User));
        assert!(!AccessPolicy::is_self_demotion(&user(2), 2, UserRole::User));
    }

    #[test]
    fn test_approval_field_rule() {
        assert!(AccessPolicy::may_set_approval(&admin()));
        assert!(!AccessPolicy::may_set_approval(&user(2)));
    }
}
