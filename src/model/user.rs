use super::Role;

#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Usernames are provisioned alphanumeric only.
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty() && username.chars().all(char::is_alphanumeric)
    }
}
