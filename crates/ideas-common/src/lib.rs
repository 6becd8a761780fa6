pub mod errors;
pub mod id;
pub mod reactive;

pub use errors::{ConfigError, IdeasError};
pub use id::{new_correlation_id, new_id};
pub use reactive::Reactive;
