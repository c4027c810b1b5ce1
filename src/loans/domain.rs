pub mod model;

pub use model::LoanEntity;
