//! Reading scenario files and rendering reports.

pub use callsim_utils::*;
