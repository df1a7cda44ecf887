mod commands;
mod config;
mod events;
mod hub;
mod mixer;
mod notifier;
pub mod relay;
pub mod runtime;

pub use commands::HubCommand;
pub use config::HubConfig;
pub use events::HubEvent;
pub use hub::Hub;
pub use mixer::{ApplyReport, Mixer, TeardownReport};
pub use notifier::Notifier;
pub use relay::RelayOutcome;
