pub mod condition;
pub mod response;
