use serde::{Deserialize, Serialize};

use super::{Availability, Email, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub availability: Option<Availability>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub enabled: bool,
    pub roles: Vec<Role>,
    pub profile: UserProfile,
}

impl User {
    pub fn new(username: String, email: Email, roles: Vec<Role>) -> Self {
        Self {
            id: UserId::default(),
            username,
            email,
            enabled: false,
            roles,
            profile: UserProfile::default(),
        }
    }

    /// Only enabled users holding the worker role can be planned.
    pub fn is_plannable(&self) -> bool {
        self.enabled && self.roles.contains(&Role::User)
    }
}
