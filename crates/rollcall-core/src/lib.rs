//! rollcall-core — attendance table and simulated recognition console.
//!
//! The table is rebuilt from flat files (registered face images, a daily
//! attendance CSV, per-user age JSON) plus a gender classifier running on
//! ONNX Runtime. The console fabricates recognition results behind the
//! detector/recognizer traits in [`simulation`].

pub mod age;
pub mod attendance;
pub mod console;
pub mod gender;
pub mod registry;
pub mod render;
pub mod simulation;
pub mod table;
pub mod types;

pub use age::AgeStore;
pub use attendance::AttendanceLedger;
pub use console::Console;
pub use gender::{GenderClassifier, NoClassifier, OnnxGenderClassifier};
pub use registry::Registry;
pub use render::RenderStyle;
pub use table::{TableSources, UserRow, UserTable};
pub use types::{AgeEstimate, AttendanceStatus, Gender, GenderScores, Recognition};
