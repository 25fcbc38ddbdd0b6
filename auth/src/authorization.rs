use std::collections::BTreeSet;

/// Decide whether a caller holding `granted_roles` may use an endpoint.
///
/// `required_role` of `None` admits any authenticated subject.
pub fn authorize(granted_roles: &BTreeSet<String>, required_role: Option<&str>) -> bool {
    match required_role {
        None => true,
        Some(role) => granted_roles.contains(role),
    }
}
