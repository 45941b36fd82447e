//! Role-based route access table.

use crate::models::Role;

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Inspector, Role::Engineer];

/// Roles allowed on a console route. `None` means the route is unrestricted.
pub fn allowed_roles(path: &str) -> Option<&'static [Role]> {
    match path {
        "/" | "/ships" | "/components" => Some(ALL_ROLES),
        "/maintenance" => Some(&[Role::Engineer]),
        "/calendar" => Some(&[Role::Inspector, Role::Engineer]),
        "/kpis" => Some(&[Role::Inspector]),
        _ => None,
    }
}

/// Unknown routes are open; known routes require one of their roles.
/// Without a session (`role == None`) only unknown routes are open.
pub fn can_access(role: Option<Role>, path: &str) -> bool {
    match allowed_roles(path) {
        None => true,
        Some(roles) => role.is_some_and(|r| roles.contains(&r)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_is_engineer_only() {
        assert!(can_access(Some(Role::Engineer), "/maintenance"));
        assert!(!can_access(Some(Role::Admin), "/maintenance"));
        assert!(!can_access(Some(Role::Inspector), "/maintenance"));
    }

    #[test]
    fn kpis_and_calendar() {
        assert!(can_access(Some(Role::Inspector), "/kpis"));
        assert!(!can_access(Some(Role::Engineer), "/kpis"));
        assert!(can_access(Some(Role::Inspector), "/calendar"));
        assert!(can_access(Some(Role::Engineer), "/calendar"));
        assert!(!can_access(Some(Role::Admin), "/calendar"));
    }

    #[test]
    fn unknown_routes_are_open() {
        assert!(can_access(None, "/settings"));
        assert!(can_access(Some(Role::Admin), "/anything"));
        assert!(!can_access(None, "/ships"));
    }
}
