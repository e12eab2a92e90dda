//! Named animation sequences

use log::warn;

use crate::frame::Frame;

/// Index of an animation inside its [`AnimationTable`]
pub type AnimationId = usize;

/// What happens when playback reaches the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Wrap back to the first frame
    #[default]
    Loop,
    /// Hold the last frame
    Once,
}

/// A named range of frames played at a fixed rate
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    /// First frame, inclusive
    pub first_frame: usize,
    /// Last frame, inclusive
    pub last_frame: usize,
    /// Playback rate in frames per second
    pub fps: f32,
    pub mode: PlaybackMode,
}

impl Animation {
    /// Create a looping animation
    pub fn new(name: impl Into<String>, first_frame: usize, last_frame: usize, fps: f32) -> Self {
        Self {
            name: name.into(),
            first_frame,
            last_frame,
            fps,
            mode: PlaybackMode::Loop,
        }
    }

    /// Play once and hold the last frame
    #[must_use]
    pub fn once(mut self) -> Self {
        self.mode = PlaybackMode::Once;
        self
    }

    /// Number of frames in the sequence
    pub fn frame_count(&self) -> usize {
        self.last_frame.saturating_sub(self.first_frame) + 1
    }

    /// Seconds one pass over the sequence takes, if the rate is positive
    pub fn duration(&self) -> Option<f32> {
        (self.fps > 0.0).then(|| self.frame_count() as f32 / self.fps)
    }
}

/// The set of animations attached to a model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationTable {
    animations: Vec<Animation>,
}

impl AnimationTable {
    /// Build a table, dropping entries whose first frame is after the last
    pub fn new(animations: Vec<Animation>) -> Self {
        let animations = animations
            .into_iter()
            .filter(|a| {
                let ordered = a.first_frame <= a.last_frame;
                if !ordered {
                    warn!(
                        "Dropping animation {}: first frame {} after last frame {}",
                        a.name, a.first_frame, a.last_frame
                    );
                }
                ordered
            })
            .collect();
        Self { animations }
    }

    /// The standard Quake 2 player and monster sequences
    pub fn quake2_player() -> Self {
        Self::new(vec![
            Animation::new("stand", 0, 39, 9.0),
            Animation::new("run", 40, 45, 10.0),
            Animation::new("attack", 46, 53, 10.0),
            Animation::new("pain_a", 54, 57, 7.0),
            Animation::new("pain_b", 58, 61, 7.0),
            Animation::new("pain_c", 62, 65, 7.0),
            Animation::new("jump", 66, 71, 7.0),
            Animation::new("flip", 72, 83, 7.0),
            Animation::new("salute", 84, 94, 7.0),
            Animation::new("fallback", 95, 111, 10.0),
            Animation::new("wave", 112, 122, 7.0),
            Animation::new("point", 123, 134, 6.0),
            Animation::new("crstand", 135, 153, 10.0),
            Animation::new("crwalk", 154, 159, 7.0),
            Animation::new("crattack", 160, 168, 10.0),
            Animation::new("crpain", 169, 172, 7.0),
            Animation::new("crdeath", 173, 177, 5.0).once(),
            Animation::new("death_fall_back", 178, 183, 7.0).once(),
            Animation::new("death_fall_forward", 184, 189, 7.0).once(),
            Animation::new("death_fall_back_slow", 190, 197, 7.0).once(),
            Animation::new("boom", 198, 198, 5.0).once(),
        ])
    }

    /// Group consecutive frames sharing a name prefix ("run1", "run2", ...)
    /// into looping animations
    ///
    /// A prefix that comes back after other frames starts a new animation
    /// named with a numeric suffix ("stand", "stand_2", ...).
    pub fn from_frame_names(frames: &[Frame], fps: f32) -> Self {
        let mut animations: Vec<Animation> = Vec::new();
        let mut last_prefix = String::new();
        for (index, frame) in frames.iter().enumerate() {
            let name = frame.name();
            let prefix = match name.trim_end_matches(|c: char| c.is_ascii_digit()) {
                "" => &*name,
                prefix => prefix,
            };
            match animations.last_mut() {
                Some(last) if last_prefix == prefix => last.last_frame = index,
                _ => {
                    let unique = unique_name(&animations, prefix);
                    animations.push(Animation::new(unique, index, index, fps));
                    last_prefix = prefix.to_string();
                }
            }
        }
        Self { animations }
    }

    /// Drop animations that reach past the model's last frame
    pub fn retain_playable(&mut self, num_frames: usize) {
        self.animations.retain(|a| {
            let playable = a.last_frame < num_frames;
            if !playable {
                warn!(
                    "Dropping animation {}: frames {}-{} exceed the model's {} frames",
                    a.name, a.first_frame, a.last_frame, num_frames
                );
            }
            playable
        });
    }

    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(id)
    }

    /// Find an animation by name
    pub fn id_of(&self, name: &str) -> Option<AnimationId> {
        self.animations.iter().position(|a| a.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.animations.iter().map(|a| a.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.iter()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

fn unique_name(animations: &[Animation], prefix: &str) -> String {
    let taken = |name: &str| animations.iter().any(|a| a.name == name);
    if !taken(prefix) {
        return prefix.to_string();
    }
    (2..)
        .map(|n| format!("{prefix}_{n}"))
        .find(|name| !taken(name))
        .unwrap_or_else(|| prefix.to_string())
}
