use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ADMIN_PERMISSION: &str = "admin";

const IDENTITY_NAME: &str = "Jane Doe";
const IDENTITY_AVATAR: &str = "https://unsplash.com/photos/IWLOvomUmWU/download?force=true&w=640";

/// Profile shown in the layout header. Not derived from the session flag.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: u64,
    pub name: String,
    pub avatar: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            id: 1,
            name: IDENTITY_NAME.to_string(),
            avatar: IDENTITY_AVATAR.to_string(),
        }
    }
}

#[must_use]
pub fn permissions() -> Vec<String> {
    vec![ADMIN_PERMISSION.to_string()]
}
