//! Code-driven animation state machine.
//!
//! Animation clips, their transition graph, and per-layer lock state are
//! declared in code and evaluated against boolean parameters — no
//! engine-side transition assets. The machine tracks the current clip per
//! layer as the source of truth and emits crossfade commands for whatever
//! actually renders the character.
//!
//! Transitions ("connections") are re-evaluated after every parameter change
//! and after every clip completion; the first declared match wins.

pub mod builder;
pub mod data;
pub mod error;
pub mod machine;

pub use builder::AnimatorBuilder;
pub use data::{Animation, Connection};
pub use error::AnimError;
pub use machine::{AnimationMachine, CrossfadeCommand, ParamView};
