//! Call requests.

use crate::network::NodeId;
use crate::units::Secs;

identifier!(CallId, usize);

/// A request to hold one circuit between `src` and `dst` for `duration`, starting at `arrival`.
#[derive(Debug, Clone, Copy, PartialEq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct Call {
    pub id: CallId,
    pub src: NodeId,
    pub dst: NodeId,
    pub arrival: Secs,
    pub duration: Secs,
}

impl Call {
    /// The time at which the call releases its circuits.
    pub fn end(&self) -> Secs {
        self.arrival + self.duration
    }
}
