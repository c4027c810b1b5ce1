use std::str::FromStr;
use chrono::NaiveDateTime;
use tracing::{debug, info};
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::catalog::domain::{AddBookRequest, CatalogService};
use crate::core::domain::Configuration;
use crate::core::library::{BookCategory, LibraryError, LibraryResult};
use crate::utils::validation;

pub(crate) struct CatalogServiceImpl {
    branch_id: String,
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            book_repository,
        }
    }
}

fn required(value: &str, field: &str) -> LibraryResult<()> {
    if validation::is_not_empty(Some(value)) {
        Ok(())
    } else {
        Err(LibraryError::validation(validation::required_field_message(field).as_str(),
                                     Some("REQUIRED_FIELD".to_string())))
    }
}

fn validate_book(title: &str, author: &str, isbn: &str, year: i32) -> LibraryResult<()> {
    required(title, "title")?;
    required(author, "author")?;
    if !validation::is_valid_isbn(Some(isbn)) {
        return Err(LibraryError::validation(validation::isbn_error_message(), Some("INVALID_ISBN".to_string())));
    }
    if !validation::is_valid_publication_year(year) {
        return Err(LibraryError::validation(validation::year_error_message(), Some("INVALID_YEAR".to_string())));
    }
    Ok(())
}

impl CatalogService for CatalogServiceImpl {
    fn add_book(&mut self, req: &AddBookRequest, now: NaiveDateTime) -> LibraryResult<String> {
        validate_book(req.title.as_str(), req.author.as_str(), req.isbn.as_str(), req.publication_year)?;
        let copies = u32::try_from(req.copies).ok().filter(|c| validation::is_positive(i64::from(*c)))
            .ok_or_else(|| LibraryError::validation(validation::copies_error_message(), Some("INVALID_COPIES".to_string())))?;
        let category = BookCategory::from_str(req.category.as_str())?;
        if let Some(existing) = self.book_repository.find_by_isbn(req.isbn.as_str()) {
            return Err(LibraryError::conflict(
                format!("a book with ISBN {} already exists as {}", req.isbn, existing.book_id).as_str()));
        }
        let book_id = self.book_repository.next_id();
        let book = BookEntity::new(book_id.as_str(), req.title.trim(), req.author.trim(), req.isbn.as_str(),
                                   req.publication_year, copies, category, now);
        self.book_repository.create(&book)?;
        info!(branch = %self.branch_id, book_id = %book_id, isbn = %book.isbn, copies, "book added");
        Ok(book_id)
    }

    fn update_book(&mut self, book: &BookEntity) -> LibraryResult<BookEntity> {
        validate_book(book.title.as_str(), book.author.as_str(), book.isbn.as_str(), book.publication_year)?;
        if book.total_copies == 0 || book.available_copies > book.total_copies {
            return Err(LibraryError::validation(
                format!("book {} must keep 0 <= available ({}) <= total ({}) copies with at least one copy",
                        book.book_id, book.available_copies, book.total_copies).as_str(),
                Some("INVALID_COPIES".to_string())));
        }
        self.book_repository.update(book)?;
        debug!(branch = %self.branch_id, book_id = %book.book_id, available = book.available_copies, "book updated");
        self.book_repository.get(book.book_id.as_str()).ok_or_else(|| LibraryError::not_found(
            format!("book {} not found", book.book_id).as_str()))
    }

    fn remove_book(&mut self, id: &str) -> LibraryResult<()> {
        self.book_repository.delete(id)?;
        info!(branch = %self.branch_id, book_id = %id, "book removed");
        Ok(())
    }

    fn find_book_by_id(&self, id: &str) -> Option<BookEntity> {
        self.book_repository.get(id)
    }

    fn find_book_by_isbn(&self, isbn: &str) -> Option<BookEntity> {
        self.book_repository.find_by_isbn(isbn)
    }

    fn search_books(&self, text: &str) -> Vec<BookEntity> {
        self.book_repository.search(text)
    }

    fn list_books(&self) -> Vec<BookEntity> {
        self.book_repository.list()
    }
}
