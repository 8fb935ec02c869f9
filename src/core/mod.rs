pub mod cancel;
pub mod executor;
pub mod fallback;
pub mod interpreter;
pub mod planner;

pub use crate::domain::model::{FailureKind, ItineraryLine, RequestOutcome, RequestSpec};
pub use crate::domain::ports::{ConfigProvider, Transport, TransportResponse};
pub use crate::utils::error::Result;
