pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod manager;
pub mod render;
pub mod report;
pub mod tekx;
pub mod trend;
