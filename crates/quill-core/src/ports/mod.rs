//! Ports - trait definitions the persistence layer must implement.

mod repository;

pub use repository::{
    AuthorRepository, BaseRepository, CategoryRepository, PostRepository, SignupRepository,
};
