use tracing::info;
use crate::catalog::domain::AddBookRequest;
use crate::circulation::engine::CirculationEngine;
use crate::core::library::LibraryResult;
use crate::directory::domain::AddMemberRequest;

const BOOKS: [(&str, &str, &str, i32, i64, &str); 6] = [
    ("Clean Code", "Robert C. Martin", "978-0-13-235088-4", 2008, 3, "TECHNICAL"),
    ("The Pragmatic Programmer", "Andrew Hunt", "978-0-20-161622-4", 1999, 2, "TECHNICAL"),
    ("Dune", "Frank Herbert", "978-0-44-101359-7", 1965, 2, "NOVEL"),
    ("A Brief History of Time", "Stephen Hawking", "978-0-55-338016-3", 1988, 1, "SCIENCE"),
    ("Sapiens", "Yuval Noah Harari", "978-0-06-231609-7", 2011, 2, "HISTORY"),
    ("The Little Prince", "Antoine de Saint-Exupery", "978-0-15-601219-5", 1943, 1, "YOUTH"),
];

const MEMBERS: [(&str, &str, &str, &str); 4] = [
    ("Marie", "Curie", "marie.curie@example.com", "STUDENT"),
    ("Alan", "Turing", "alan.turing@example.com", "TEACHER"),
    ("Grace", "Hopper", "grace.hopper@example.com", "STAFF"),
    ("Ada", "Lovelace", "ada.lovelace@example.com", "EXTERNAL"),
];

/// Registers a small catalog and one member of every type, returning how many books and
/// members were added.
pub async fn load_sample_data(engine: &CirculationEngine) -> LibraryResult<(usize, usize)> {
    for (title, author, isbn, year, copies, category) in BOOKS {
        let _ = engine.add_book(&AddBookRequest::new(title, author, isbn, year, copies, category)).await?;
    }
    for (first_name, last_name, email, member_type) in MEMBERS {
        let _ = engine.add_member(&AddMemberRequest::new(first_name, last_name, email, member_type)).await?;
    }
    info!(branch = %engine.config().branch_id, books = BOOKS.len(), members = MEMBERS.len(), "sample data loaded");
    Ok((BOOKS.len(), MEMBERS.len()))
}
