// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]

//! Staged mechanical assembly visualization built on wgpu.
//!
//! motorviz animates a multi-part V8 from an exploded layout into a running
//! engine, one stage at a time. Stage changes retarget per-part transitions,
//! the final stage spins the crankshaft and camshaft and drives the pistons,
//! and a choreographed camera eases between authored poses.
//!
//! # Key entry points
//!
//! - [`assembly::AssemblyScene`] - headless tick loop owning every piece of
//!   animated state
//! - [`engine::AssemblyEngine`] - the scene plus GPU resources
//! - [`parts::PartSet`] - static part descriptors (`reference_engine()` is
//!   the bundled V8)
//! - [`options::Options`] - runtime configuration (camera, animation,
//!   kinematics, lighting, display, keybindings)
//!
//! # Architecture
//!
//! Each tick applies the latest stage request, steps the kinematic
//! simulator, samples per-part transitions against one accumulated clock and
//! advances the camera. The engine then uploads the camera, lighting and
//! per-primitive instances and draws every part in a single pass.

pub mod assembly;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod parts;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use assembly::{AssemblyScene, TickOutcome};
pub use engine::{AssemblyCommand, AssemblyEngine};
pub use error::VizError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
pub use parts::PartSet;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
