//! Parser for Quake 2 MD2 (vertex-animated model) files.
//!
//! This crate reads and writes MD2 models and plays back their keyframe
//! animations. Every frame stores all vertex positions quantized to bytes;
//! poses between keyframes are produced by linear interpolation.
//!
//! # Examples
//!
//! ```
//! use q2_md2::{Animation, AnimationTable, Frame, Md2Builder, Md2Model, Vertex};
//! use glam::Vec3;
//!
//! let frame = |b: u8| Frame {
//!     name: format!("wave{b}").into(),
//!     scale: Vec3::ONE,
//!     translate: Vec3::ZERO,
//!     vertices: vec![Vertex { position: [b, 0, 0], normal_index: 0 }],
//! };
//! let bytes = Md2Builder::new().frame(frame(0)).frame(frame(2)).build()?;
//!
//! let table = AnimationTable::new(vec![Animation::new("wave", 0, 1, 2.0)]);
//! let mut model = Md2Model::load_with_animations(&bytes, table)?;
//! model.set_animation("wave")?;
//! model.tick(0.25);
//! assert_eq!(model.vertex_positions()[0], Vec3::new(1.0, 0.0, 0.0));
//! # Ok::<(), q2_md2::Md2Error>(())
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod animation;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod header;
pub mod model;
pub mod normals;
pub mod reader;
pub mod writer;

pub use animation::{
    Animation, AnimationId, AnimationState, AnimationTable, PlaybackMode, PlaybackState,
};
pub use error::{AnimError, FormatError, Md2Error, Result};
pub use frame::{Frame, Vertex};
pub use geometry::{GlCommand, GlCommandKind, GlVertex, Skin, TexCoord, Triangle};
pub use header::{Md2Header, decode_header};
pub use model::{Md2Model, ModelSummary};
pub use normals::{build_normal_table, normal_table};
pub use writer::Md2Builder;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
