//! Domain models for the capture launcher.
//!
//! These types carry no process or console concerns; they describe the
//! values passed between the interface lister and the capture launcher.

mod interface;
mod state;

pub use interface::{listed_interfaces, InterfaceName};
pub use state::{CaptureOutcome, CaptureState};
