//! MD2 animation playback
//!
//! MD2 files carry no animation metadata; sequences are named frame ranges
//! supplied by an [`AnimationTable`]. [`AnimationState`] walks a range over
//! time and blends neighbouring keyframes.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use q2_md2::{AnimationState, AnimationTable, Frame, Vertex};
//!
//! let frames: Vec<Frame> = (0..4u8)
//!     .map(|b| Frame {
//!         name: format!("run{b}").into(),
//!         scale: Vec3::ONE,
//!         translate: Vec3::ZERO,
//!         vertices: vec![Vertex { position: [b, 0, 0], normal_index: 0 }],
//!     })
//!     .collect();
//! let table = AnimationTable::from_frame_names(&frames, 4.0);
//!
//! let mut state = AnimationState::new();
//! state.set_animation(&table, table.id_of("run").unwrap())?;
//! state.advance(0.375);
//! assert_eq!(state.current_frame(), 1);
//! assert_eq!(state.current_pose(&frames)[0].x, 1.5);
//! # Ok::<(), q2_md2::AnimError>(())
//! ```

mod state;
mod types;

pub use state::{AnimationState, PlaybackState};
pub use types::{Animation, AnimationId, AnimationTable, PlaybackMode};
