//! Role-based routing decisions.

use crate::models::{Role, User};
use crate::session::StoredUser;

/// Higher wins when a user holds several roles.
#[must_use]
pub const fn role_priority(role: Role) -> u8 {
    match role {
        Role::SystemAdmin => 4,
        Role::CinemaManager => 3,
        Role::CinemaStaff => 2,
        Role::Customer => 1,
        Role::Unknown => 0,
    }
}

#[must_use]
pub fn highest_role(roles: &[Role]) -> Option<Role> {
    roles
        .iter()
        .copied()
        .filter(|r| *r != Role::Unknown)
        .max_by_key(|r| role_priority(*r))
}

/// Landing page for a set of roles.
#[must_use]
pub fn dashboard_path(roles: &[Role]) -> &'static str {
    match highest_role(roles) {
        Some(Role::SystemAdmin | Role::CinemaManager) => "/admin/dashboard",
        Some(Role::CinemaStaff) => "/staff/dashboard",
        _ => "/",
    }
}

#[must_use]
pub fn has_any_role(user: &User, allowed: &[Role]) -> bool {
    user.roles.iter().any(|r| *r != Role::Unknown && allowed.contains(r))
}

#[must_use]
pub fn is_staff_member(user: &User) -> bool {
    has_any_role(
        user,
        &[Role::CinemaStaff, Role::CinemaManager, Role::SystemAdmin],
    )
}

#[must_use]
pub fn is_admin(user: &User) -> bool {
    has_any_role(user, &[Role::CinemaManager, Role::SystemAdmin])
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    /// Send to the login page, removing the stored profile first when set.
    Login { clear_user: bool },
    Redirect(&'static str),
}

/// Decide whether the stored user may open a route restricted to `allowed`.
/// An empty `allowed` list only requires a signed-in user.
#[must_use]
pub fn check_access(stored: &StoredUser, allowed: &[Role]) -> AccessDecision {
    match stored {
        StoredUser::Missing => AccessDecision::Login { clear_user: false },
        StoredUser::Corrupt => AccessDecision::Login { clear_user: true },
        StoredUser::Present(user) => {
            if allowed.is_empty() || has_any_role(user, allowed) {
                AccessDecision::Granted
            } else {
                AccessDecision::Redirect(dashboard_path(&user.roles))
            }
        }
    }
}
