pub mod duplicate;
pub mod error;
pub mod handlers;
pub mod images;
pub mod normalize;
pub mod risk;
pub mod router;
pub mod services;

pub use error::WebhookError;
pub use normalize::{normalize_submission, parse_submission, NormalizedSubmission};
pub use router::create_webhook_router;
