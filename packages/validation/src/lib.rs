//! # Flowconf Validation
//!
//! The two-phase validation pipeline behind the configuration editor.
//!
//! ```text
//! text change
//!     ↓ debounce (new edits cancel older runs)
//! parse ──failure──→ one parse diagnostic, stop
//!     ↓
//! structural rules (synchronous)
//!     ↓
//! per-component remote validation (concurrent fan-out, join)
//!     ↓
//! merge + dedupe
//!     ↓ only if still the newest run
//! DiagnosticsSink::publish (full replacement)
//! ```
//!
//! Individual schema fetches or remote calls failing degrade that one
//! component's findings to nothing; they never fail the run.

mod fields;
mod pipeline;
mod remote;
mod sink;

pub use fields::extract_field;
pub use pipeline::{RunStatus, ValidationOutcome, ValidationPipeline};
pub use remote::{RemoteError, RemoteValidation, RemoteValidator};
pub use sink::DiagnosticsSink;
