pub mod model;

pub use model::MemberEntity;
