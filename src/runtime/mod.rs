pub mod startup;

pub use startup::{CoreContext, prepare_core, prepare_core_from_env};
