//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use quill_core::domain::{Author, Category, Comment, Post, PostView, Signup};
use quill_core::error::RepoError;
use quill_core::ports::{
    AuthorRepository, CategoryRepository, PostRepository, SignupRepository,
};

use super::entity::{author, category, comment, post, post_category, post_view, signup, user};
use super::pg_base::PgBaseRepository;

/// PostgreSQL user repository.
pub type PgUserRepository = PgBaseRepository<user::Entity>;

/// PostgreSQL post repository.
pub type PgPostRepository = PgBaseRepository<post::Entity>;

/// PostgreSQL author repository.
pub type PgAuthorRepository = PgBaseRepository<author::Entity>;

/// PostgreSQL category repository.
pub type PgCategoryRepository = PgBaseRepository<category::Entity>;

/// PostgreSQL signup repository.
pub type PgSignupRepository = PgBaseRepository<signup::Entity>;

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = post::Entity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_featured(&self) -> Result<Vec<Post>, RepoError> {
        let rows = post::Entity::find()
            .filter(post::Column::Featured.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn comment_count(&self, post_id: Uuid) -> Result<u64, RepoError> {
        comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn view_count(&self, post_id: Uuid) -> Result<u64, RepoError> {
        post_view::Entity::find()
            .filter(post_view::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn record_view(&self, post_id: Uuid, user_id: Uuid) -> Result<PostView, RepoError> {
        tracing::debug!(%post_id, "Recording post view");

        let row: post_view::ActiveModel = PostView::new(user_id, post_id).into();
        let inserted = row.insert(&self.db).await.map_err(query_err)?;

        Ok(inserted.into())
    }

    async fn categories(&self, post_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let Some(model) = post::Entity::find_by_id(post_id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Err(RepoError::NotFound);
        };

        let rows = model
            .find_related(category::Entity)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_categories(&self, post_id: Uuid, categories: Vec<Uuid>) -> Result<(), RepoError> {
        post_category::Entity::delete_many()
            .filter(post_category::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if !categories.is_empty() {
            let rows = categories.into_iter().map(|category_id| post_category::ActiveModel {
                post_id: Set(post_id),
                category_id: Set(category_id),
            });
            post_category::Entity::insert_many(rows)
                .exec(&self.db)
                .await
                .map_err(query_err)?;
        }

        Ok(())
    }

    async fn link_posts(
        &self,
        post_id: Uuid,
        previous: Option<Uuid>,
        next: Option<Uuid>,
    ) -> Result<(), RepoError> {
        if previous == Some(post_id) || next == Some(post_id) {
            return Err(RepoError::Constraint(
                "post cannot be its own neighbour".to_string(),
            ));
        }

        // Walk the previous-chain from the candidate predecessor and the
        // next-chain from the candidate successor; reaching the post being
        // linked in either direction means the link would close a cycle.
        if let Some(start) = previous {
            let mut cursor = start;
            loop {
                if cursor == post_id {
                    return Err(RepoError::Constraint(
                        "previous/next link would form a cycle".to_string(),
                    ));
                }
                let row = post::Entity::find_by_id(cursor)
                    .one(&self.db)
                    .await
                    .map_err(query_err)?;
                match row.and_then(|p| p.previous_post_id) {
                    Some(prev) => cursor = prev,
                    None => break,
                }
            }
        }
        if let Some(start) = next {
            let mut cursor = start;
            loop {
                if cursor == post_id {
                    return Err(RepoError::Constraint(
                        "previous/next link would form a cycle".to_string(),
                    ));
                }
                let row = post::Entity::find_by_id(cursor)
                    .one(&self.db)
                    .await
                    .map_err(query_err)?;
                match row.and_then(|p| p.next_post_id) {
                    Some(succ) => cursor = succ,
                    None => break,
                }
            }
        }

        let Some(model) = post::Entity::find_by_id(post_id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Err(RepoError::NotFound);
        };

        let mut active: post::ActiveModel = model.into_active_model();
        active.previous_post_id = Set(previous);
        active.next_post_id = Set(next);
        active.update(&self.db).await.map_err(query_err)?;

        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Author>, RepoError> {
        let result = author::Entity::find()
            .filter(author::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {}

#[async_trait]
impl SignupRepository for PgSignupRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Signup>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(signup_email = %masked, "Finding signup by email");

        let result = signup::Entity::find()
            .filter(signup::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}
