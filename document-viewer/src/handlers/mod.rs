pub mod app;
pub mod documents;
pub mod events;
pub mod metrics;
