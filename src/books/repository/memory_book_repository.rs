use std::collections::{BTreeMap, HashMap};
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::{IdSequence, Repository};
use crate::utils::validation::normalize_isbn;

// MemoryBookRepository keeps books keyed by identity plus a unique ISBN index.
#[derive(Debug)]
pub(crate) struct MemoryBookRepository {
    books: BTreeMap<String, BookEntity>,
    isbn_index: HashMap<String, String>,
    ids: IdSequence,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self {
            books: BTreeMap::new(),
            isbn_index: HashMap::new(),
            ids: IdSequence::new('B'),
        }
    }
}

// one ISBN written with or without separators maps to the same key
fn isbn_key(isbn: &str) -> String {
    normalize_isbn(isbn)
}

impl Repository<BookEntity> for MemoryBookRepository {
    fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    fn create(&mut self, entity: &BookEntity) -> LibraryResult<usize> {
        if self.books.contains_key(entity.book_id.as_str()) {
            return Err(LibraryError::conflict(
                format!("book {} already exists", entity.book_id).as_str()));
        }
        let key = isbn_key(entity.isbn.as_str());
        if self.isbn_index.contains_key(key.as_str()) {
            return Err(LibraryError::conflict(
                format!("a book with ISBN {} already exists", entity.isbn).as_str()));
        }
        self.isbn_index.insert(key, entity.book_id.to_string());
        self.books.insert(entity.id(), entity.clone());
        Ok(1)
    }

    fn update(&mut self, entity: &BookEntity) -> LibraryResult<usize> {
        let existing = self.books.get(entity.book_id.as_str()).ok_or_else(|| LibraryError::not_found(
            format!("book {} not found", entity.book_id).as_str()))?;
        let old_key = isbn_key(existing.isbn.as_str());
        let new_key = isbn_key(entity.isbn.as_str());
        if old_key != new_key {
            if let Some(owner) = self.isbn_index.get(new_key.as_str()) {
                return Err(LibraryError::conflict(
                    format!("ISBN {} already belongs to book {}", entity.isbn, owner).as_str()));
            }
            self.isbn_index.remove(old_key.as_str());
            self.isbn_index.insert(new_key, entity.book_id.to_string());
        }
        let mut updated = entity.clone();
        updated.version = existing.version + 1;
        self.books.insert(updated.book_id.to_string(), updated);
        Ok(1)
    }

    fn get(&self, id: &str) -> Option<BookEntity> {
        self.books.get(id).cloned()
    }

    fn delete(&mut self, id: &str) -> LibraryResult<usize> {
        let removed = self.books.remove(id).ok_or_else(|| LibraryError::not_found(
            format!("book {} not found", id).as_str()))?;
        self.isbn_index.remove(isbn_key(removed.isbn.as_str()).as_str());
        Ok(1)
    }

    fn list(&self) -> Vec<BookEntity> {
        self.books.values().cloned().collect()
    }
}

impl BookRepository for MemoryBookRepository {
    fn find_by_isbn(&self, isbn: &str) -> Option<BookEntity> {
        self.isbn_index.get(isbn_key(isbn).as_str()).and_then(|id| self.books.get(id)).cloned()
    }

    fn search(&self, text: &str) -> Vec<BookEntity> {
        self.books.values().filter(|b| b.matches(text)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::{BookCategory, LibraryError};
    use crate::core::repository::Repository;

    fn new_book(repo: &mut MemoryBookRepository, isbn: &str, title: &str) -> BookEntity {
        let id = repo.next_id();
        BookEntity::new(id.as_str(), title, "author", isbn, 2001, 1, BookCategory::Novel, Utc::now().naive_utc())
    }

    #[tokio::test]
    async fn test_should_create_and_get_book() {
        let mut repo = MemoryBookRepository::new();
        let book = new_book(&mut repo, "1234567890", "title");
        assert_eq!("B00001", book.book_id.as_str());
        let _ = repo.create(&book).expect("should create book");
        assert_eq!(Some(book.clone()), repo.get(book.book_id.as_str()));
        assert_eq!(Some(book), repo.find_by_isbn("1234567890"));
        assert_eq!(None, repo.get("B99999"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_isbn() {
        let mut repo = MemoryBookRepository::new();
        let first = new_book(&mut repo, "1234567890", "first");
        let second = new_book(&mut repo, "1234567890", "second");
        let _ = repo.create(&first).expect("should create book");
        assert!(matches!(repo.create(&second), Err(LibraryError::Conflict{ .. })));
    }

    #[tokio::test]
    async fn test_should_index_isbn_without_separators() {
        let mut repo = MemoryBookRepository::new();
        let plain = new_book(&mut repo, "9780132350884", "plain");
        let dashed = new_book(&mut repo, "978-0-13-235088-4", "dashed");
        let _ = repo.create(&plain).expect("should create book");
        assert!(matches!(repo.create(&dashed), Err(LibraryError::Conflict{ .. })));
        assert_eq!(Some(plain.clone()), repo.find_by_isbn("978 0 13 235088 4"));
        assert_eq!(Some(plain), repo.find_by_isbn("978-0132350884"));
    }

    #[tokio::test]
    async fn test_should_update_and_reindex_isbn() {
        let mut repo = MemoryBookRepository::new();
        let mut book = new_book(&mut repo, "1234567890", "title");
        let other = new_book(&mut repo, "0987654321", "other");
        let _ = repo.create(&book).expect("should create book");
        let _ = repo.create(&other).expect("should create book");

        book.isbn = "0987654321".to_string();
        assert!(matches!(repo.update(&book), Err(LibraryError::Conflict{ .. })));

        book.isbn = "1111111111".to_string();
        let _ = repo.update(&book).expect("should update book");
        assert_eq!(None, repo.find_by_isbn("1234567890"));
        let loaded = repo.find_by_isbn("1111111111").expect("should find by new isbn");
        assert_eq!(1, loaded.version);
    }

    #[tokio::test]
    async fn test_should_delete_and_search() {
        let mut repo = MemoryBookRepository::new();
        let dune = new_book(&mut repo, "1234567890", "Dune");
        let messiah = new_book(&mut repo, "1234567891", "Dune Messiah");
        let _ = repo.create(&dune).expect("should create book");
        let _ = repo.create(&messiah).expect("should create book");
        assert_eq!(2, repo.search("dune").len());

        let _ = repo.delete(dune.book_id.as_str()).expect("should delete book");
        assert_eq!(1, repo.search("dune").len());
        assert_eq!(None, repo.find_by_isbn("1234567890"));
        assert!(matches!(repo.delete(dune.book_id.as_str()), Err(LibraryError::NotFound{ .. })));
        assert_eq!(1, repo.list().len());
    }
}
