use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - a label shared by many posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
}

impl Category {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
