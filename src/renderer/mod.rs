//! The render graph (§4.6) and its per-pass parameter shaping. Buffer and
//! surface ownership lives in `rhi`; `camera` and `atmosphere` feed this
//! module the per-frame inputs the pass list consumes.

pub mod graph;
pub mod passes;
pub mod shadow;

pub use graph::{run_frame, FrameInputs, PassKind, PassOutcome};
