use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signup entity - a newsletter email address, independent of all other
/// records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signup {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Signup {
    pub fn new(email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Signup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}
