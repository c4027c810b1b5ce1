pub mod model;

pub use model::BookEntity;
