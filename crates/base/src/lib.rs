pub mod logging;
pub use logging::*;

mod vec2;
pub use vec2::*;

// Re-export the log facade so dependents can write base::log::debug!
pub use log;
