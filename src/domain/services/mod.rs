mod resolution_gate;

pub use resolution_gate::{GateDecision, ResolutionGate};
