use crate::role::types::User;

/// Derive the role used for every authorization decision.
///
/// Staff members are authorized by job title (`poste`), everybody else by
/// their backend role. Case is left untouched; comparisons fold case.
pub fn resolve_effective_role(user: &User) -> &str {
    match user {
        User::Personnel(personnel) => &personnel.poste,
        User::DirectRole(direct) => &direct.role,
    }
}

pub(crate) fn roles_match(effective_role: &str, required_role: &str) -> bool {
    effective_role.to_lowercase() == required_role.to_lowercase()
}
