//! SeaORM entity definitions.
//!
//! Cascade semantics live in the relations here and in the migration DDL:
//! deleting a post removes its comments, views and category links;
//! deleting a user removes their author profile, comments and views;
//! deleting a linked neighbour post nulls the link.

pub mod author;
pub mod category;
pub mod comment;
pub mod post;
pub mod post_category;
pub mod post_view;
pub mod signup;
pub mod user;
