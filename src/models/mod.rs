//! Frontend Models
//!
//! Data structures matching backend resources (camelCase JSON, UUID string ids).

mod auth;
mod board;
mod card;
mod column;
mod label;
mod notification;
mod search;
mod user;
mod workspace;

pub use auth::*;
pub use board::*;
pub use card::*;
pub use column::*;
pub use label::*;
pub use notification::*;
pub use search::*;
pub use user::*;
pub use workspace::*;

use serde::{Deserialize, Serialize};

/// Role on a workspace or board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "OWNER",
            MemberRole::Admin => "ADMIN",
            MemberRole::Member => "MEMBER",
            MemberRole::Viewer => "VIEWER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OWNER" => Some(MemberRole::Owner),
            "ADMIN" => Some(MemberRole::Admin),
            "MEMBER" => Some(MemberRole::Member),
            "VIEWER" => Some(MemberRole::Viewer),
            _ => None,
        }
    }

    /// Roles a manager can hand out; ownership is never granted from the UI
    pub const ASSIGNABLE: [MemberRole; 3] = [MemberRole::Admin, MemberRole::Member, MemberRole::Viewer];

    pub fn label(&self) -> &'static str {
        match self {
            MemberRole::Owner => "Owner",
            MemberRole::Admin => "Admin",
            MemberRole::Member => "Member",
            MemberRole::Viewer => "Viewer",
        }
    }
}

/// Body for member role changes (workspace and board)
#[derive(Debug, Clone, Serialize)]
pub struct MemberRoleUpdate {
    pub role: MemberRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_parse() {
        for role in MemberRole::ASSIGNABLE {
            assert_eq!(MemberRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(MemberRole::parse("OWNER"), Some(MemberRole::Owner));
        assert_eq!(MemberRole::parse("owner"), None);
    }
}
