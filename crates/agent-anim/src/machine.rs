//! Per-layer animation runtime: current clip, locks, chains, transitions.

use std::collections::HashMap;

use agent_timing::{CountdownTimer, TimerTick};

use crate::data::Animation;
use crate::error::AnimError;

/// Clip name a layer falls back to when initialized with an unregistered
/// clip. Matches the conventional base locomotion state.
pub const FALLBACK_CLIP: &str = "Locomotion";

/// Bound on connection-triggered recursive plays within one call. A cycle of
/// clips transitioning into each other under the same parameter values would
/// otherwise never terminate.
const MAX_CHAIN_DEPTH: u8 = 8;

/// A crossfade the machine has decided on. Whatever renders the character
/// consumes these; the machine itself never touches rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossfadeCommand {
    pub clip: String,
    pub layer: usize,
    pub duration: f32,
}

/// Read-only parameter view handed to the default-animation hook.
pub struct ParamView<'a> {
    bools: &'a HashMap<String, bool>,
    floats: &'a HashMap<String, f32>,
}

impl ParamView<'_> {
    pub fn get_bool(&self, param: &str) -> bool {
        self.bools.get(param).copied().unwrap_or(false)
    }

    pub fn get_float(&self, param: &str) -> f32 {
        self.floats.get(param).copied().unwrap_or(0.0)
    }
}

/// Decides what to play when a layer has nothing better to do (a non-looping
/// clip finished with no auto-next). Returns the clip name to play.
pub type DefaultAnimationFn = Box<dyn Fn(&ParamView<'_>) -> Option<String>>;

enum ChainTarget {
    /// Auto-next hand-off declared on the clip.
    Clip(String),
    /// Non-looping clip ran out; ask the default-animation hook.
    Default,
}

struct PendingChain {
    timer: CountdownTimer,
    target: ChainTarget,
}

#[derive(Default)]
struct LayerState {
    current: Option<String>,
    locked: bool,
    chain: Option<PendingChain>,
}

/// The animation state machine.
///
/// Single-threaded: parameter updates may originate from external events but
/// must be applied on the owning agent's tick before re-evaluation.
pub struct AnimationMachine {
    animations: HashMap<String, Animation>,
    bools: HashMap<String, bool>,
    floats: HashMap<String, f32>,
    layers: Vec<LayerState>,
    default_animation: Option<DefaultAnimationFn>,
    on_crossfade: Option<Box<dyn FnMut(&CrossfadeCommand)>>,
    last_transition: Option<CrossfadeCommand>,
}

impl AnimationMachine {
    pub fn new(layer_count: usize) -> Self {
        let mut layers = Vec::with_capacity(layer_count);
        layers.resize_with(layer_count, LayerState::default);
        Self {
            animations: HashMap::new(),
            bools: HashMap::new(),
            floats: HashMap::new(),
            layers,
            default_animation: None,
            on_crossfade: None,
            last_transition: None,
        }
    }

    /// Registers a sink for crossfade commands (the rendering collaborator).
    pub fn set_crossfade_sink(&mut self, sink: impl FnMut(&CrossfadeCommand) + 'static) {
        self.on_crossfade = Some(Box::new(sink));
    }

    /// Derives per-layer current clips from whatever the host reports as
    /// playing. Unregistered names fall back to [`FALLBACK_CLIP`].
    pub fn initialize(&mut self, playing: &[&str]) {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.locked = false;
            layer.chain = None;

            let reported = playing.get(index).copied();
            layer.current = match reported {
                Some(name) if self.animations.contains_key(name) => Some(name.to_string()),
                _ => {
                    if self.animations.contains_key(FALLBACK_CLIP) {
                        Some(FALLBACK_CLIP.to_string())
                    } else {
                        tracing::warn!(
                            layer = index,
                            clip = ?reported,
                            "no registered clip to initialize layer with"
                        );
                        None
                    }
                }
            };
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn current_animation(&self, layer: usize) -> Option<&str> {
        self.layers.get(layer)?.current.as_deref()
    }

    pub fn is_locked(&self, layer: usize) -> bool {
        self.layers.get(layer).map(|l| l.locked).unwrap_or(false)
    }

    /// Locks or unlocks a whole layer.
    pub fn set_locked(&mut self, locked: bool, layer: usize) {
        match self.layers.get_mut(layer) {
            Some(state) => state.locked = locked,
            None => tracing::warn!(layer, "set_locked on out-of-range layer"),
        }
    }

    pub fn clip_length(&self, clip: &str) -> Option<f32> {
        self.animations.get(clip).map(|a| a.length_secs())
    }

    /// The most recent crossfade command, mostly useful for tests and debug
    /// overlays.
    pub fn last_transition(&self) -> Option<&CrossfadeCommand> {
        self.last_transition.as_ref()
    }

    pub fn get_bool(&self, param: &str) -> bool {
        match self.bools.get(param) {
            Some(value) => *value,
            None => {
                tracing::warn!(param, "get_bool on unknown parameter");
                false
            }
        }
    }

    pub fn get_float(&self, param: &str) -> f32 {
        match self.floats.get(param) {
            Some(value) => *value,
            None => {
                tracing::warn!(param, "get_float on unknown parameter");
                0.0
            }
        }
    }

    /// Sets a boolean parameter and re-evaluates connections on unlocked
    /// layers. Unknown parameters and unchanged values are no-ops.
    pub fn set_bool(&mut self, param: &str, value: bool) {
        if let Err(err) = self.try_set_bool(param, value) {
            tracing::warn!(%err, "set_bool ignored");
        }
    }

    pub fn try_set_bool(&mut self, param: &str, value: bool) -> Result<(), AnimError> {
        let slot = self
            .bools
            .get_mut(param)
            .ok_or_else(|| AnimError::UnknownParameter(param.to_string()))?;
        if *slot == value {
            return Ok(());
        }
        *slot = value;
        self.evaluate_connections();
        Ok(())
    }

    /// Sets a float parameter. Floats never drive connections.
    pub fn set_float(&mut self, param: &str, value: f32) {
        match self.floats.get_mut(param) {
            Some(slot) => *slot = value,
            None => tracing::warn!(param, "set_float on unknown parameter"),
        }
    }

    /// Plays a clip on a layer using its configured entry crossfade.
    pub fn play(&mut self, clip: &str, layer: usize) {
        self.play_with(clip, layer, None);
    }

    /// Plays a clip with an explicit crossfade duration.
    pub fn play_with(&mut self, clip: &str, layer: usize, crossfade: Option<f32>) {
        if let Err(err) = self.try_play(clip, layer, crossfade) {
            tracing::warn!(%err, "play ignored");
        }
    }

    pub fn try_play(
        &mut self,
        clip: &str,
        layer: usize,
        crossfade: Option<f32>,
    ) -> Result<(), AnimError> {
        if !self.animations.contains_key(clip) {
            return Err(AnimError::UnknownClip(clip.to_string()));
        }
        if layer >= self.layers.len() {
            return Err(AnimError::LayerOutOfRange(layer, self.layers.len()));
        }
        self.play_inner(clip, layer, crossfade, 0);
        Ok(())
    }

    /// Advances pending chain waits. When a wait expires the layer unlocks
    /// and hands off to the auto-next clip or the default-animation hook.
    pub fn update(&mut self, delta: f32) {
        if !delta.is_finite() || delta < 0.0 {
            tracing::warn!(delta, "ignoring invalid animation delta");
            return;
        }

        for layer in 0..self.layers.len() {
            let fired = match self.layers[layer].chain.as_mut() {
                Some(chain) => chain.timer.tick(delta) == TimerTick::Finished,
                None => false,
            };
            if !fired {
                continue;
            }

            // The chain is consumed before playing anything, so a play call
            // from inside the hand-off cannot race a stale continuation.
            let chain = match self.layers[layer].chain.take() {
                Some(chain) => chain,
                None => continue,
            };
            self.layers[layer].locked = false;

            match chain.target {
                ChainTarget::Clip(next) => self.play_inner(&next, layer, None, 0),
                ChainTarget::Default => self.run_default_animation(layer),
            }
        }
    }

    fn run_default_animation(&mut self, layer: usize) {
        let hook = match self.default_animation.take() {
            Some(hook) => hook,
            None => return,
        };
        let choice = {
            let view = ParamView {
                bools: &self.bools,
                floats: &self.floats,
            };
            hook(&view)
        };
        self.default_animation = Some(hook);

        if let Some(clip) = choice {
            self.play_inner(&clip, layer, None, 0);
        }
    }

    fn play_inner(&mut self, clip: &str, layer: usize, crossfade: Option<f32>, depth: u8) {
        if depth >= MAX_CHAIN_DEPTH {
            tracing::warn!(clip, layer, "connection chain too deep, stopping");
            return;
        }

        let state = &self.layers[layer];
        if state.locked || state.current.as_deref() == Some(clip) {
            return;
        }

        let Some(data) = self.animations.get(clip) else {
            tracing::warn!(clip, layer, "play of unknown clip");
            return;
        };
        let (locks, auto_next, loops, entry_crossfade, length) = (
            data.locks_layer(),
            data.auto_next_clip().map(str::to_string),
            data.loops_forever(),
            data.entry_crossfade_secs(),
            data.length_secs(),
        );

        let state = &mut self.layers[layer];
        state.chain = None;
        state.locked = locks;
        state.current = Some(clip.to_string());

        // The just-started clip's own connections are considered before the
        // crossfade is issued; if one fires it wins outright.
        if let Some((target, custom)) = self.find_transition(layer) {
            self.play_inner(&target, layer, custom, depth + 1);
            return;
        }

        let command = CrossfadeCommand {
            clip: clip.to_string(),
            layer,
            duration: crossfade.unwrap_or(entry_crossfade),
        };
        if let Some(sink) = self.on_crossfade.as_mut() {
            sink(&command);
        }
        self.last_transition = Some(command);

        if let Some(next) = auto_next {
            // Wait out this clip, less the blend into the next one.
            let next_entry = self
                .animations
                .get(&next)
                .map(|a| a.entry_crossfade_secs())
                .unwrap_or(0.0);
            let delay = (length - next_entry).max(0.0);
            self.schedule_chain(layer, delay, ChainTarget::Clip(next));
        } else if !loops {
            self.schedule_chain(layer, length, ChainTarget::Default);
        }
    }

    fn schedule_chain(&mut self, layer: usize, delay: f32, target: ChainTarget) {
        let mut timer = CountdownTimer::new(delay);
        timer.start();
        self.layers[layer].chain = Some(PendingChain { timer, target });
    }

    /// First declared connection on the layer's current clip whose every
    /// condition matches, if the layer is unlocked.
    fn find_transition(&self, layer: usize) -> Option<(String, Option<f32>)> {
        let state = self.layers.get(layer)?;
        if state.locked {
            return None;
        }
        let data = self.animations.get(state.current.as_deref()?)?;

        for connection in data.connection_list() {
            let matched = connection
                .conditions()
                .iter()
                .all(|c| self.bools.get(&c.param) == Some(&c.value));
            if matched {
                return Some((
                    connection.target().to_string(),
                    connection.crossfade_override(),
                ));
            }
        }
        None
    }

    /// One pass over unlocked layers; the first transition that fires ends
    /// the pass.
    fn evaluate_connections(&mut self) {
        for layer in 0..self.layers.len() {
            if let Some((target, custom)) = self.find_transition(layer) {
                self.play_inner(&target, layer, custom, 0);
                return;
            }
        }
    }

    pub(crate) fn insert_animation(&mut self, animation: Animation) {
        self.animations.insert(animation.name().to_string(), animation);
    }

    pub(crate) fn insert_bool_param(&mut self, param: &str) {
        self.bools.entry(param.to_string()).or_insert(false);
    }

    pub(crate) fn insert_float_param(&mut self, param: &str) {
        self.floats.entry(param.to_string()).or_insert(0.0);
    }

    pub(crate) fn replace_default_animation(&mut self, hook: DefaultAnimationFn) {
        self.default_animation = Some(hook);
    }
}
