use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author entity - a one-to-one profile attached to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Storage key of the profile picture.
    pub profile_picture: String,
}

impl Author {
    pub fn new(user_id: Uuid, profile_picture: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            profile_picture,
        }
    }
}
