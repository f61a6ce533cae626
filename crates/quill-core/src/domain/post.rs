use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a single blog article.
///
/// `read_time` is derived from the rendered content on every save and is
/// never user-supplied. Comment and view counts are not stored here; they
/// are computed live by the post repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub overview: String,
    /// Markdown source of the article body.
    pub content: String,
    /// Estimated minutes to read the rendered content.
    pub read_time: i32,
    /// Storage key of the thumbnail image.
    pub thumbnail: String,
    pub featured: bool,
    pub previous_post_id: Option<Uuid>,
    pub next_post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, unlinked, non-featured post.
    pub fn new(
        author_id: Uuid,
        title: String,
        overview: String,
        content: String,
        thumbnail: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            overview,
            content,
            read_time: 0,
            thumbnail,
            featured: false,
            previous_post_id: None,
            next_post_id: None,
            created_at: Utc::now(),
        }
    }

    /// Path of the post's detail page.
    pub fn detail_url(&self) -> String {
        format!("/posts/{}", self.id)
    }

    /// Path of the post's update form.
    pub fn update_url(&self) -> String {
        format!("/posts/{}/update", self.id)
    }

    /// Path of the post's delete confirmation.
    pub fn delete_url(&self) -> String {
        format!("/posts/{}/delete", self.id)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_the_post_id() {
        let post = Post::new(
            Uuid::new_v4(),
            "Hello".into(),
            "An overview".into(),
            "Some content".into(),
            "thumb.png".into(),
        );

        assert_eq!(post.detail_url(), format!("/posts/{}", post.id));
        assert_eq!(post.update_url(), format!("/posts/{}/update", post.id));
        assert_eq!(post.delete_url(), format!("/posts/{}/delete", post.id));
    }

    #[test]
    fn new_posts_start_unlinked_with_zero_read_time() {
        let post = Post::new(
            Uuid::new_v4(),
            "Hello".into(),
            "An overview".into(),
            "Some content".into(),
            "thumb.png".into(),
        );

        assert_eq!(post.read_time, 0);
        assert!(!post.featured);
        assert!(post.previous_post_id.is_none());
        assert!(post.next_post_id.is_none());
        assert_eq!(post.to_string(), "Hello");
    }
}
