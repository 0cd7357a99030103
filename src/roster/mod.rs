//! Wrestler records and the roster that owns them.
//!
//! ## Key Types
//!
//! - `Wrestler`: grades, skills, specialty, finisher, per-match state
//! - `TvGrade` / `GrudgeGrade`: the two ratings cards compare
//! - `SkillZone`: where on the track a skill may be used
//! - `Roster`: lookup and grade-edit seam; `InMemoryRoster` implements it

pub mod registry;
pub mod wrestler;

pub use registry::{apply_grade, GradeChange, GradeKind, InMemoryRoster, Roster};
pub use wrestler::{Finisher, GrudgeGrade, SkillZone, Specialty, TvGrade, Wrestler};
