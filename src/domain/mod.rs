// Domain layer: request/itinerary models and ports (interfaces).

pub mod model;
pub mod ports;
