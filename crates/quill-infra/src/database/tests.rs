use std::collections::BTreeMap;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ConnectOptions, ConnectionTrait, Database,
    DatabaseBackend, DbConn, EntityTrait, IntoActiveModel, MockDatabase, MockExecResult, Set,
    Value,
};
use uuid::Uuid;

use quill_core::domain::{Author, Category, Comment, Post, PostView, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use super::entity::{author, category, comment, post, post_category, post_view, user};
use super::pg_repo::PgPostRepository;

fn sample_post(content: &str) -> Post {
    Post::new(
        Uuid::new_v4(),
        "Test Post".to_owned(),
        "An overview".to_owned(),
        content.to_owned(),
        "thumb.png".to_owned(),
    )
}

fn sample_model(post: Post) -> post::Model {
    post::Model {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        overview: post.overview,
        content: post.content,
        read_time: post.read_time,
        thumbnail: post.thumbnail,
        featured: post.featured,
        previous_post_id: post.previous_post_id,
        next_post_id: post.next_post_id,
        created_at: post.created_at.into(),
    }
}

#[tokio::test]
async fn find_post_by_id_maps_to_domain() {
    let post = sample_post("Some content");
    let post_id = post.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![sample_model(post)]])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let found: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let found = found.expect("post should be found");
    assert_eq!(found.id, post_id);
    assert_eq!(found.title, "Test Post");
}

#[tokio::test]
async fn save_creates_a_fresh_post_when_no_row_matches() {
    let post = sample_post("Some content");
    let post_id = post.id;
    let mut stored = sample_model(post.clone());
    stored.read_time = 1;

    // The preset id sends save() down the UPDATE path first; an empty
    // result set makes that update report no matching row, after which the
    // INSERT fallback returns the stored model.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new(), vec![stored]])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let saved = repo.save(post).await.unwrap();
    assert_eq!(saved.id, post_id);
    assert_eq!(saved.read_time, 1);
}

#[tokio::test]
async fn save_updates_an_existing_post() {
    let post = sample_post("Some content");
    let post_id = post.id;
    let mut stored = sample_model(post.clone());
    stored.read_time = 1;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![stored]])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let saved = repo.save(post).await.unwrap();
    assert_eq!(saved.id, post_id);
}

#[tokio::test]
async fn before_save_computes_read_time_from_content() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    // 400 words at 200 words per minute reads in 2 minutes.
    let content = vec!["word"; 400].join(" ");
    let active: post::ActiveModel = sample_post(&content).into();

    let saved = active.before_save(&db, true).await.unwrap();

    assert_eq!(saved.read_time, Set(2));
}

#[tokio::test]
async fn before_save_zeroes_read_time_for_empty_content() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let mut active: post::ActiveModel = sample_post("").into();
    // A stale value must never survive a save with empty content.
    active.read_time = Set(7);

    let saved = active.before_save(&db, true).await.unwrap();

    assert_eq!(saved.read_time, Set(0));
}

#[tokio::test]
async fn before_save_is_deterministic_for_identical_content() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let content = "# Title\n\nA short *markdown* article body.";
    let first: post::ActiveModel = sample_post(content).into();
    let second: post::ActiveModel = sample_post(content).into();

    let first = first.before_save(&db, true).await.unwrap();
    let second = second.before_save(&db, false).await.unwrap();

    assert_eq!(first.read_time, second.read_time);
}

#[tokio::test]
async fn before_save_ignores_read_time_when_content_not_carried() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let model = sample_model(sample_post("unchanged"));
    let mut active = post::ActiveModel {
        id: ActiveValue::Unchanged(model.id),
        ..Default::default()
    };
    active.featured = Set(true);

    let saved = active.before_save(&db, false).await.unwrap();

    assert_eq!(saved.read_time, ActiveValue::NotSet);
}

#[tokio::test]
async fn before_save_rejects_self_links() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let mut post = sample_post("content");
    post.previous_post_id = Some(post.id);
    let active: post::ActiveModel = post.into();

    let result = active.before_save(&db, true).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn comment_count_is_derived_from_rows() {
    let mut count_row = BTreeMap::new();
    count_row.insert("num_items", Value::BigInt(Some(3)));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row]])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let count = repo.comment_count(Uuid::new_v4()).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn record_view_appends_a_row() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_view::Model {
            id: Uuid::new_v4(),
            user_id,
            post_id,
        }]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let view = repo.record_view(post_id, user_id).await.unwrap();
    assert_eq!(view.post_id, post_id);
    assert_eq!(view.user_id, user_id);
}

#[tokio::test]
async fn find_featured_filters_on_the_flag() {
    let mut featured = sample_post("content");
    featured.featured = true;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![sample_model(featured)]])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let posts = repo.find_featured().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].featured);
}

#[tokio::test]
async fn link_posts_rejects_direct_self_link() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PgPostRepository::new(db);

    let post_id = Uuid::new_v4();
    let result = repo.link_posts(post_id, Some(post_id), None).await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn link_posts_detects_cycles_through_the_previous_chain() {
    let post_a = sample_post("a");
    let mut post_b = sample_post("b");
    // b already points back at a, so a -> b would close a loop.
    post_b.previous_post_id = Some(post_a.id);

    let a_id = post_a.id;
    let b_id = post_b.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![sample_model(post_b)]])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let result = repo.link_posts(a_id, Some(b_id), None).await;
    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn link_posts_detects_cycles_through_the_next_chain() {
    let post_a = sample_post("a");
    let mut post_b = sample_post("b");
    // b already names a as its successor, so a -> next b would close a
    // loop built purely out of next links.
    post_b.next_post_id = Some(post_a.id);

    let a_id = post_a.id;
    let b_id = post_b.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![sample_model(post_b)]])
        .into_connection();

    let repo = PgPostRepository::new(db);

    let result = repo.link_posts(a_id, None, Some(b_id)).await;
    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

/// Open an in-memory SQLite database with the real schema applied, so the
/// cascade rules in the DDL can be exercised end to end.
///
/// A single pooled connection keeps the in-memory database alive across
/// the whole test.
async fn schema_db() -> DbConn {
    let opts = ConnectOptions::new("sqlite::memory:")
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false)
        .to_owned();

    let db = Database::connect(opts).await.unwrap();
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn seed_author(db: &DbConn, username: &str) -> (user::Model, author::Model) {
    let user: user::ActiveModel =
        User::new(username.to_owned(), format!("{username}@example.com")).into();
    let user = user.insert(db).await.unwrap();

    let author: author::ActiveModel = Author::new(user.id, "pic.png".to_owned()).into();
    let author = author.insert(db).await.unwrap();

    (user, author)
}

async fn seed_post(db: &DbConn, author_id: Uuid, title: &str) -> post::Model {
    let post: post::ActiveModel = Post::new(
        author_id,
        title.to_owned(),
        "An overview".to_owned(),
        "A few words of content".to_owned(),
        "thumb.png".to_owned(),
    )
    .into();
    post.insert(db).await.unwrap()
}

#[tokio::test]
async fn deleting_a_post_cascades_to_comments_views_and_category_links() {
    let db = schema_db().await;

    let (user, author) = seed_author(&db, "writer").await;
    let post = seed_post(&db, author.id, "Doomed").await;

    let category: category::ActiveModel = Category::new("rust".to_owned()).into();
    let category = category.insert(&db).await.unwrap();
    post_category::ActiveModel {
        post_id: Set(post.id),
        category_id: Set(category.id),
    }
    .insert(&db)
    .await
    .unwrap();

    let comment: comment::ActiveModel = Comment::new(user.id, post.id, "nice".to_owned()).into();
    comment.insert(&db).await.unwrap();
    let view: post_view::ActiveModel = PostView::new(user.id, post.id).into();
    view.insert(&db).await.unwrap();

    post::Entity::delete_by_id(post.id).exec(&db).await.unwrap();

    assert!(comment::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(post_view::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(post_category::Entity::find().all(&db).await.unwrap().is_empty());
    // The category itself and the author are untouched.
    assert_eq!(category::Entity::find().all(&db).await.unwrap().len(), 1);
    assert!(
        author::Entity::find_by_id(author.id)
            .one(&db)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn deleting_a_user_cascades_to_profile_comments_and_views() {
    let db = schema_db().await;

    let (_writer, author) = seed_author(&db, "writer").await;
    let post = seed_post(&db, author.id, "Sticky").await;

    let reader: user::ActiveModel =
        User::new("reader".to_owned(), "reader@example.com".to_owned()).into();
    let reader = reader.insert(&db).await.unwrap();
    let reader_profile: author::ActiveModel = Author::new(reader.id, "face.png".to_owned()).into();
    let reader_profile = reader_profile.insert(&db).await.unwrap();

    let comment: comment::ActiveModel = Comment::new(reader.id, post.id, "hello".to_owned()).into();
    comment.insert(&db).await.unwrap();
    let view: post_view::ActiveModel = PostView::new(reader.id, post.id).into();
    view.insert(&db).await.unwrap();

    user::Entity::delete_by_id(reader.id).exec(&db).await.unwrap();

    assert!(
        author::Entity::find_by_id(reader_profile.id)
            .one(&db)
            .await
            .unwrap()
            .is_none()
    );
    assert!(comment::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(post_view::Entity::find().all(&db).await.unwrap().is_empty());
    // The writer's post survives the reader's departure.
    assert!(
        post::Entity::find_by_id(post.id)
            .one(&db)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn deleting_a_neighbour_nulls_the_link() {
    let db = schema_db().await;

    let (_user, author) = seed_author(&db, "writer").await;
    let first = seed_post(&db, author.id, "First").await;
    let second = seed_post(&db, author.id, "Second").await;

    let mut linked = second.clone().into_active_model();
    linked.previous_post_id = Set(Some(first.id));
    linked.update(&db).await.unwrap();

    post::Entity::delete_by_id(first.id).exec(&db).await.unwrap();

    let second = post::Entity::find_by_id(second.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.previous_post_id, None);
}
