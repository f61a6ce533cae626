//! Post entity for SeaORM, including the pre-save read-time hook.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};

use quill_core::{readtime, render};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub read_time: i32,
    pub thumbnail: String,
    pub featured: bool,
    pub previous_post_id: Option<Uuid>,
    pub next_post_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::post_view::Entity")]
    Views,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::PreviousPostId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    PreviousPost,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::NextPostId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    NextPost,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::post_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Views.def()
    }
}

/// Many-to-many with categories through the junction table.
impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_category::Relation::Post.def().rev())
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Runs on every insert and update.
    ///
    /// Whenever the save carries a content value, `read_time` is recomputed
    /// from the rendered output, so the stored estimate always matches the
    /// content of the most recent save. A post is also refused as its own
    /// previous or next neighbour.
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(ref content) = self.content {
            let minutes = if content.is_empty() {
                0
            } else {
                let html = render::render_markdown(content);
                readtime::estimate(&html) as i32
            };
            tracing::debug!(read_time = minutes, "Computed read time before save");
            self.read_time = Set(minutes);
        }

        let id = match &self.id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => Some(*id),
            ActiveValue::NotSet => None,
        };
        if let Some(id) = id {
            let self_linked = matches!(
                &self.previous_post_id,
                ActiveValue::Set(Some(p)) | ActiveValue::Unchanged(Some(p)) if *p == id
            ) || matches!(
                &self.next_post_id,
                ActiveValue::Set(Some(n)) | ActiveValue::Unchanged(Some(n)) if *n == id
            );
            if self_linked {
                return Err(DbErr::Custom(
                    "post cannot be its own previous or next neighbour".to_owned(),
                ));
            }
        }

        Ok(self)
    }
}

/// Conversion from SeaORM Model to domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            overview: model.overview,
            content: model.content,
            read_time: model.read_time,
            thumbnail: model.thumbnail,
            featured: model.featured,
            previous_post_id: model.previous_post_id,
            next_post_id: model.next_post_id,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from domain Post to SeaORM ActiveModel.
///
/// `read_time` is carried over but gets overwritten by `before_save`; the
/// stored value never comes from the caller.
impl From<quill_core::domain::Post> for ActiveModel {
    fn from(post: quill_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            overview: Set(post.overview),
            content: Set(post.content),
            read_time: Set(post.read_time),
            thumbnail: Set(post.thumbnail),
            featured: Set(post.featured),
            previous_post_id: Set(post.previous_post_id),
            next_post_id: Set(post.next_post_id),
            created_at: Set(post.created_at.into()),
        }
    }
}
