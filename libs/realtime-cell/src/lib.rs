pub mod handlers;
pub mod hub;
pub mod router;

pub use hub::{LiveEvent, LiveEventKind, LiveUpdateHub};
pub use router::create_realtime_router;
