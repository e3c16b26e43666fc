pub mod envelope;
pub mod error;
pub mod ids;
pub mod role;

pub use envelope::DataEnvelope;
pub use error::AppError;
pub use ids::RecordId;
pub use role::CallerRole;
