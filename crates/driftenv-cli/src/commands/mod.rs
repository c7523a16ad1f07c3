//! Command implementations

mod drift;
mod env;
mod put;
mod redact;
mod scan;
mod show;

pub use drift::run_drift;
pub use env::run_env;
pub use put::run_put;
pub use redact::run_redact;
pub use scan::run_scan;
pub use show::run_show;
