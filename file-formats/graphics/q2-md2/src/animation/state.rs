//! Playback state machine for frame-interpolated animation

use glam::Vec3;

use super::types::{Animation, AnimationId, AnimationTable, PlaybackMode};
use crate::error::AnimError;
use crate::frame::Frame;

/// Largest interpolation factor; the factor never reaches 1.0
const MAX_INTERPOLATION: f32 = 1.0 - f32::EPSILON;

/// Whether an animation is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing(AnimationId),
}

/// Current playback position of a model
///
/// `current_frame` and `next_frame` always lie inside the active animation's
/// range and `interpolation` inside `[0, 1)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    playback: PlaybackState,
    animation: Option<Animation>,
    current_frame: usize,
    next_frame: usize,
    interpolation: f32,
    /// Time spent since `current_frame` became current
    elapsed: f32,
    /// Time spent in the active animation
    total_time: f32,
    finished: bool,
}

impl AnimationState {
    /// A stopped state showing frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animation `id` from its first frame
    ///
    /// An unknown id leaves the state untouched.
    pub fn set_animation(&mut self, table: &AnimationTable, id: AnimationId) -> Result<(), AnimError> {
        let animation = table
            .get(id)
            .ok_or_else(|| AnimError::UnknownAnimation(id.to_string()))?;

        self.current_frame = animation.first_frame;
        self.next_frame = (animation.first_frame + 1).min(animation.last_frame);
        self.interpolation = 0.0;
        self.elapsed = 0.0;
        self.total_time = 0.0;
        self.finished = false;
        self.animation = Some(animation.clone());
        self.playback = PlaybackState::Playing(id);
        Ok(())
    }

    /// Stop playback, keeping the current pose
    pub fn stop(&mut self) {
        self.playback = PlaybackState::Stopped;
    }

    /// Advance playback by `delta` seconds
    ///
    /// Does nothing while stopped, for non-positive or non-finite deltas and
    /// for animations with a zero rate.
    pub fn advance(&mut self, delta: f32) {
        if !matches!(self.playback, PlaybackState::Playing(_)) || !delta.is_finite() || delta <= 0.0 {
            return;
        }
        let Some(animation) = self.animation.take() else {
            return;
        };

        self.total_time += delta;
        if animation.fps > 0.0 && !self.finished {
            let frame_time = 1.0 / animation.fps;
            self.elapsed += delta;
            if self.elapsed >= frame_time {
                let steps = (self.elapsed / frame_time).floor();
                self.elapsed = (self.elapsed - steps * frame_time).max(0.0);
                self.step(&animation, steps as u64);
            }
            self.interpolation = if self.finished {
                0.0
            } else {
                (self.elapsed * animation.fps).clamp(0.0, MAX_INTERPOLATION)
            };
        }

        self.animation = Some(animation);
    }

    fn step(&mut self, animation: &Animation, steps: u64) {
        let span = animation.frame_count() as u64;
        let steps = match animation.mode {
            // The (current, next) pair cycles with period `span`
            PlaybackMode::Loop => steps % span,
            PlaybackMode::Once => steps.min(span),
        };

        for _ in 0..steps {
            self.current_frame = self.next_frame;
            if self.current_frame >= animation.last_frame {
                match animation.mode {
                    PlaybackMode::Loop => self.next_frame = animation.first_frame,
                    PlaybackMode::Once => {
                        self.next_frame = animation.last_frame;
                        self.finished = true;
                        self.elapsed = 0.0;
                        break;
                    }
                }
            } else {
                self.next_frame = self.current_frame + 1;
            }
        }
    }

    /// Vertex positions blended between the current and next frame
    pub fn current_pose(&self, frames: &[Frame]) -> Vec<Vec3> {
        let (Some(current), Some(next)) = (frames.get(self.current_frame), frames.get(self.next_frame))
        else {
            return Vec::new();
        };
        current
            .vertices
            .iter()
            .zip(&next.vertices)
            .map(|(a, b)| current.decompress(a).lerp(next.decompress(b), self.interpolation))
            .collect()
    }

    /// Vertex normals blended like [`Self::current_pose`] and re-normalized
    pub fn current_normals(&self, frames: &[Frame]) -> Vec<Vec3> {
        let (Some(current), Some(next)) = (frames.get(self.current_frame), frames.get(self.next_frame))
        else {
            return Vec::new();
        };
        current
            .vertices
            .iter()
            .zip(&next.vertices)
            .map(|(a, b)| {
                a.normal()
                    .lerp(b.normal(), self.interpolation)
                    .normalize_or_zero()
            })
            .collect()
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// The animation last started, if any
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn next_frame(&self) -> usize {
        self.next_frame
    }

    pub fn interpolation(&self) -> f32 {
        self.interpolation
    }

    /// Seconds since the current frame became current
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds spent playing the active animation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// True once a play-once animation has reached its last frame
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
