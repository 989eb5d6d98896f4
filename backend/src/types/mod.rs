mod environment;
mod error;
mod extractors;
mod responses;

pub use environment::Environment;
pub use error::{ApiErrorResponse, AppError};
pub use extractors::{validation_message, JsonBody, ValidatedJson};
pub use responses::Created;
