pub mod service;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;

// AddBookRequest carries the unvalidated input of a catalog addition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub copies: i64,
    pub category: String,
}

impl AddBookRequest {
    pub fn new(title: &str, author: &str, isbn: &str, publication_year: i32, copies: i64, category: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            publication_year,
            copies,
            category: category.to_string(),
        }
    }
}

// CatalogService owns book records. Lookups return None for unknown identities.
pub trait CatalogService: Sync + Send {
    fn add_book(&mut self, req: &AddBookRequest, now: NaiveDateTime) -> LibraryResult<String>;
    fn update_book(&mut self, book: &BookEntity) -> LibraryResult<BookEntity>;
    fn remove_book(&mut self, id: &str) -> LibraryResult<()>;
    fn find_book_by_id(&self, id: &str) -> Option<BookEntity>;
    fn find_book_by_isbn(&self, isbn: &str) -> Option<BookEntity>;
    fn search_books(&self, text: &str) -> Vec<BookEntity>;
    fn list_books(&self) -> Vec<BookEntity>;
}
