pub mod books;
pub mod catalog;
pub mod circulation;
pub mod core;
pub mod directory;
pub mod gateway;
pub mod loans;
pub mod members;
pub mod reservations;
pub mod utils;

pub use crate::circulation::domain::LoanFilter;
pub use crate::circulation::engine::CirculationEngine;
pub use crate::core::domain::Configuration;
pub use crate::core::library::{LibraryError, LibraryResult, RuleViolation};
