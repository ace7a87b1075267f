pub mod class_students;
pub mod common;
pub mod exams;
pub mod results;
pub mod skills;

pub use common::condition::{Compare, Condition, ConditionSet};
pub use common::response::ApiResponse;
