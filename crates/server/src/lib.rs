pub mod errors;
pub mod flash;
pub mod method_override;
pub mod routes;
pub mod sandbox;
pub mod startup;
pub mod state;
pub mod views;

pub use startup::{run, run_sandbox};
