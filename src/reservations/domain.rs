pub mod model;

pub use model::ReservationEntity;
