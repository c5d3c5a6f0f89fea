//! Choreography engine: coordinates, timing, formations, templates and
//! the play script compiler.

pub mod choreographer;
pub mod context;
pub mod coordinates;
pub mod easing;
pub mod formation;
pub mod templates;
pub mod timing;

pub use choreographer::{idle_frame, Choreographer, PlayScript};
pub use context::PlayContext;
pub use templates::{template_for, PlayTemplate};
pub use timing::{PhaseTimingTable, PlayPhase};
