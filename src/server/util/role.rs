use entity::sea_orm_active_enums::UserRole;

/// Position of a role in the `user < admin < super_admin` hierarchy
pub fn role_rank(role: UserRole) -> u8 {
    match role {
        UserRole::User => 0,
        UserRole::Admin => 1,
        UserRole::SuperAdmin => 2,
    }
}

pub fn is_admin(role: UserRole) -> bool {
    role_rank(role) >= role_rank(UserRole::Admin)
}

pub fn is_super_admin(role: UserRole) -> bool {
    role == UserRole::SuperAdmin
}

/// Parses a role name as stored in the database
pub fn parse_role(role: &str) -> Option<UserRole> {
    match role {
        "user" => Some(UserRole::User),
        "admin" => Some(UserRole::Admin),
        "super_admin" => Some(UserRole::SuperAdmin),
        _ => None,
    }
}
