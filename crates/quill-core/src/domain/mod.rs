//! Domain entities - the core business objects.

mod author;
mod category;
mod comment;
mod post;
mod post_view;
mod signup;
mod user;

pub use author::Author;
pub use category::Category;
pub use comment::Comment;
pub use post::Post;
pub use post_view::PostView;
pub use signup::Signup;
pub use user::User;
