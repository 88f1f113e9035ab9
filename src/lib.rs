pub mod account;
pub mod api;
pub mod client;
pub mod clock;
pub mod configuration;
pub mod display;
pub mod error;
pub mod harvest;
pub mod payload;
pub mod proxy;
pub mod retry;
pub mod scheduler;
pub mod signal;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{HarvestError, HarvestResult};
pub use scheduler::Scheduler;
