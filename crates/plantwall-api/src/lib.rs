// plantwall-api: Async Rust client for the plant-wall control backend

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::PlantWallClient;
pub use error::Error;
pub use models::{
    Ack, ApiErrorBody, HealthStatus, LightingControl, LightingSchedule, LightingStatus,
    SensorData, SystemHealth, SystemStatus, WateringControl, WateringSchedule, WateringStatus,
};
pub use transport::TransportConfig;
