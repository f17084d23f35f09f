pub mod ports;
pub mod event_bus;
pub mod classifier;
pub mod aggregator;
pub mod session_store;
pub mod controller;
pub mod export;
