use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Author, Category, Comment, Post, PostView, Signup};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    ///
    /// Dependent rows (comments, views, junction rows) go with it through
    /// the schema's cascade rules.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository with the derived-count and linking operations.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn find_featured(&self) -> Result<Vec<Post>, RepoError>;

    /// Comments on a post, newest first.
    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Live comment count; there is no stored counter column.
    async fn comment_count(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Live view count; there is no stored counter column.
    async fn view_count(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Append a view record for the given user.
    async fn record_view(&self, post_id: Uuid, user_id: Uuid) -> Result<PostView, RepoError>;

    async fn categories(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError>;

    /// Replace the post's category set.
    async fn set_categories(&self, post_id: Uuid, categories: Vec<Uuid>) -> Result<(), RepoError>;

    /// Point a post at its neighbours in the reading order.
    ///
    /// Fails with a constraint error if the link would make the post its
    /// own neighbour or close a cycle through the previous-chain.
    async fn link_posts(
        &self,
        post_id: Uuid,
        previous: Option<Uuid>,
        next: Option<Uuid>,
    ) -> Result<(), RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    /// Find the author profile belonging to a user, if any.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Author>, RepoError>;
}

/// Category repository; plain CRUD is all it needs.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {}

/// Signup repository.
#[async_trait]
pub trait SignupRepository: BaseRepository<Signup, Uuid> {
    /// Find a signup by its email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Signup>, RepoError>;
}
