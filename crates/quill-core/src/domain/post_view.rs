use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// PostView entity - one row per view of a post by a user.
///
/// The log is append-only; repeated views by the same user each get their
/// own row, and the per-post view count is derived by counting rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
}

impl PostView {
    pub fn new(user_id: Uuid, post_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            post_id,
        }
    }
}
