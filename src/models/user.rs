use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Up to two upper-case initials for avatars
    pub fn initials(&self) -> String {
        self.username
            .split(|c: char| c.is_whitespace() || c == '.' || c == '_' || c == '-')
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let user = User {
            id: "u1".into(),
            username: "ada.lovelace".into(),
            email: "ada@example.com".into(),
            active: None,
            last_login: None,
            roles: vec![],
        };
        assert_eq!(user.initials(), "AL");
    }

    #[test]
    fn test_deserialize_minimal_user() {
        let user: User = serde_json::from_str(r#"{"id":"u1","username":"bob","email":"b@x.io","roles":["ROLE_USER"]}"#).unwrap();
        assert_eq!(user.username, "bob");
        assert_eq!(user.roles, vec!["ROLE_USER".to_string()]);
        assert!(user.active.is_none());
    }
}
