pub mod domain;
pub mod engine;
pub mod factory;
pub mod seed;
