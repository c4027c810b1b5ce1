use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::BookCategory;
use crate::utils::date::serializer;

// BookEntity abstracts a catalog title with a number of interchangeable copies.
// Invariant: available_copies <= total_copies.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BookEntity {
    pub book_id: String,
    pub version: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub total_copies: u32,
    pub available_copies: u32,
    pub category: BookCategory,
    pub active: bool,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    #[allow(clippy::too_many_arguments)]
    pub fn new(book_id: &str, title: &str, author: &str, isbn: &str, publication_year: i32,
               copies: u32, category: BookCategory, now: NaiveDateTime) -> Self {
        Self {
            book_id: book_id.to_string(),
            version: 0,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            publication_year,
            total_copies: copies,
            available_copies: copies,
            category,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn borrowed_copies(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    // matches is a case-insensitive substring search over title, author and ISBN
    pub fn matches(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.title.to_lowercase().contains(needle.as_str())
            || self.author.to_lowercase().contains(needle.as_str())
            || self.isbn.to_lowercase().contains(needle.as_str())
    }

    // take_copy hands out one copy, returns false when none is left
    pub fn take_copy(&mut self) -> bool {
        if self.available_copies == 0 {
            return false;
        }
        self.available_copies -= 1;
        true
    }

    // restore_copy puts one copy back, returns false when all copies are already shelved
    pub fn restore_copy(&mut self) -> bool {
        if self.available_copies >= self.total_copies {
            return false;
        }
        self.available_copies += 1;
        true
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}


#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::books::domain::model::BookEntity;
    use crate::core::library::BookCategory;

    fn book(copies: u32) -> BookEntity {
        BookEntity::new("B00001", "Clean Code", "Robert C. Martin", "9780132350884", 2008,
                        copies, BookCategory::Technical, Utc::now().naive_utc())
    }

    #[tokio::test]
    async fn test_should_build_books() {
        let book = book(2);
        assert_eq!("9780132350884", book.isbn.as_str());
        assert_eq!("Clean Code", book.title.as_str());
        assert_eq!(2, book.available_copies);
        assert!(book.active);
    }

    #[tokio::test]
    async fn test_should_match_ignoring_case() {
        let book = book(1);
        assert!(book.matches("clean"));
        assert!(book.matches("MARTIN"));
        assert!(book.matches("0132350"));
        assert!(!book.matches("refactoring"));
    }

    #[tokio::test]
    async fn test_should_keep_copies_within_bounds() {
        let mut book = book(1);
        assert!(!book.restore_copy());
        assert!(book.take_copy());
        assert_eq!(0, book.available_copies);
        assert_eq!(1, book.borrowed_copies());
        assert!(!book.take_copy());
        assert!(book.restore_copy());
        assert_eq!(1, book.available_copies);
    }
}
