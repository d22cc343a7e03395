//! Additive animator builder.
//!
//! Movement states and extensions each declare their own slice of the
//! animation set. Building twice never deletes what an earlier build put in:
//! same-name animations override, new ones are added, and parameters are
//! only added when absent so their runtime values survive a rebuild. The
//! default-animation hook is single-listener: a new one replaces the old.

use crate::data::{Animation, Connection};
use crate::machine::{AnimationMachine, DefaultAnimationFn, ParamView};

#[derive(Default)]
pub struct AnimatorBuilder {
    animations: Vec<Animation>,
    bool_params: Vec<String>,
    float_params: Vec<String>,
    default_animation: Option<DefaultAnimationFn>,
}

impl AnimatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    /// Shorthand for a looping clip whose only interesting data is its
    /// connection list.
    pub fn add_connected(
        mut self,
        name: impl Into<String>,
        connections: impl IntoIterator<Item = Connection>,
    ) -> Self {
        self.animations
            .push(Animation::new(name).connections(connections));
        self
    }

    /// Declares a boolean parameter used by connections and `set_bool`.
    pub fn add_parameter(mut self, name: impl Into<String>) -> Self {
        self.bool_params.push(name.into());
        self
    }

    /// Declares a float parameter (blend speeds and the like).
    pub fn add_float_parameter(mut self, name: impl Into<String>) -> Self {
        self.float_params.push(name.into());
        self
    }

    /// Hook consulted when a non-looping clip finishes with nothing chained.
    /// Replaces any hook a previous build installed.
    pub fn set_default_animation(
        mut self,
        hook: impl Fn(&ParamView<'_>) -> Option<String> + 'static,
    ) -> Self {
        self.default_animation = Some(Box::new(hook));
        self
    }

    /// Merges this builder's contents into the machine.
    pub fn build(self, machine: &mut AnimationMachine) {
        for animation in self.animations {
            machine.insert_animation(animation);
        }
        for param in &self.bool_params {
            machine.insert_bool_param(param);
        }
        for param in &self.float_params {
            machine.insert_float_param(param);
        }
        if let Some(hook) = self.default_animation {
            machine.replace_default_animation(hook);
        }
    }
}
