//! Authenticated user record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user the application is running on behalf of.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Stable user identifier.
    pub user_id: String,

    /// Login name.
    pub username: String,

    /// Roles granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Whether the user is a site administrator.
    #[serde(default)]
    pub administrator: bool,

    /// Account fields merged in by user hydration (`name`, `email`, ...).
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl AuthenticatedUser {
    /// Create a user without roles or extra fields.
    #[must_use]
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// Set the roles.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Set the administrator flag.
    #[must_use]
    pub const fn with_administrator(mut self, administrator: bool) -> Self {
        self.administrator = administrator;
        self
    }

    /// Whether the user holds `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Merge account fields into [`extra`](Self::extra).
    ///
    /// Fields that shadow the core record (`userId`, `username`, `roles`,
    /// `administrator`) are ignored. Non-object values are ignored.
    pub fn merge_account(&mut self, account: &Value) {
        let Some(fields) = account.as_object() else {
            return;
        };
        for (key, value) in fields {
            if matches!(key.as_str(), "userId" | "username" | "roles" | "administrator") {
                continue;
            }
            self.extra.insert(key.clone(), value.clone());
        }
    }
}
