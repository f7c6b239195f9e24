pub mod layers;

mod config;
mod manager;


pub use config::RelayConfig;
pub use manager::ConfigManager;
