pub mod retry;
pub mod token;
pub mod validate;

pub use retry::{RetryPolicy, retry_operation};
pub use token::{AuthTokenProvider, EnvTokenProvider, NoAuthProvider, StaticTokenProvider};
pub use validate::{ExamValidationResult, is_valid_condition_key, validate_exam_payload};
