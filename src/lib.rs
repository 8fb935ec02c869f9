pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::ReqwestTransport;
pub use core::{
    cancel::{CancelReason, CancellationToken},
    executor::RequestExecutor,
    interpreter::parse as parse_itinerary,
    planner::TripPlanner,
};
pub use domain::model::{
    Attraction, FailureKind, IconHint, Itinerary, ItineraryLine, Preferences, RequestOutcome,
    RequestSpec,
};
pub use utils::error::{PlannerError, Result};
