//! Declarative animation data: clips and their transition graph.

/// A single parameter requirement on a [`Connection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub param: String,
    pub value: bool,
}

/// A declared, condition-gated transition from one clip to another.
///
/// Declaration order is significant: when a clip has several connections, the
/// first one whose every condition matches the current parameter values wins.
#[derive(Debug, Clone)]
pub struct Connection {
    target: String,
    crossfade: Option<f32>,
    conditions: Vec<Condition>,
}

impl Connection {
    /// Starts a connection toward the named clip.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            crossfade: None,
            conditions: Vec::new(),
        }
    }

    /// Overrides the target clip's entry crossfade for this transition.
    pub fn crossfade(mut self, duration: f32) -> Self {
        self.crossfade = Some(duration.max(0.0));
        self
    }

    /// Requires a boolean parameter to hold the given value.
    pub fn when(mut self, param: impl Into<String>, value: bool) -> Self {
        self.conditions.push(Condition {
            param: param.into(),
            value,
        });
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn crossfade_override(&self) -> Option<f32> {
        self.crossfade
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// Everything the machine knows about one clip.
///
/// Built once at animator setup and only replaced wholesale through a
/// rebuild; never mutated at runtime. The clip length is declared here since
/// the machine tracks clips by name and has no host animator to ask.
#[derive(Debug, Clone)]
pub struct Animation {
    name: String,
    lock_layer: bool,
    auto_next: Option<String>,
    loops: bool,
    entry_crossfade: f32,
    length: f32,
    connections: Vec<Connection>,
}

impl Animation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lock_layer: false,
            auto_next: None,
            loops: true,
            entry_crossfade: 0.0,
            length: 1.0,
            connections: Vec::new(),
        }
    }

    /// Clip playing length in seconds. Used to size auto-chain waits.
    pub fn length(mut self, seconds: f32) -> Self {
        self.length = seconds.max(0.0);
        self
    }

    /// Locks the layer while this clip plays: no `play` call or connection
    /// can replace it until something unlocks the layer.
    pub fn lock_layer(mut self) -> Self {
        self.lock_layer = true;
        self
    }

    /// Automatically chains into the named clip when this one finishes.
    pub fn auto_next(mut self, clip: impl Into<String>) -> Self {
        self.auto_next = Some(clip.into());
        self
    }

    /// Marks the clip as non-looping. A non-looping clip with no auto-next
    /// hands control to the default-animation hook when it finishes.
    pub fn once(mut self) -> Self {
        self.loops = false;
        self
    }

    /// Blend duration used when transitioning into this clip.
    pub fn entry_crossfade(mut self, duration: f32) -> Self {
        self.entry_crossfade = duration.max(0.0);
        self
    }

    /// Appends connections, preserving declaration order.
    pub fn connections(mut self, connections: impl IntoIterator<Item = Connection>) -> Self {
        self.connections.extend(connections);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locks_layer(&self) -> bool {
        self.lock_layer
    }

    pub fn auto_next_clip(&self) -> Option<&str> {
        self.auto_next.as_deref()
    }

    pub fn loops_forever(&self) -> bool {
        self.loops
    }

    pub fn entry_crossfade_secs(&self) -> f32 {
        self.entry_crossfade
    }

    pub fn length_secs(&self) -> f32 {
        self.length
    }

    pub fn connection_list(&self) -> &[Connection] {
        &self.connections
    }
}
