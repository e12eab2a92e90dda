//! Integration tests for MD2 loading, playback and encoding

mod animation;
mod parser;
mod round_trip;

use glam::Vec3;
use q2_md2::{
    Frame, GlCommand, GlCommandKind, GlVertex, Md2Builder, TexCoord, Triangle, Vertex,
};

/// Route `log` output through the test harness
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A triangle model with `num_frames` frames; frame `i` places every vertex
/// at `2 * i + 1` on each axis
pub fn model_bytes(num_frames: u8) -> Vec<u8> {
    init_logger();
    let mut builder = Md2Builder::new()
        .skin_size(64, 64)
        .skin("players/male/grunt.pcx")
        .tex_coords([
            TexCoord { s: 0, t: 0 },
            TexCoord { s: 63, t: 0 },
            TexCoord { s: 0, t: 63 },
        ])
        .triangles([Triangle {
            vertex: [0, 1, 2],
            st: [0, 1, 2],
        }])
        .gl_command(GlCommand {
            kind: GlCommandKind::Strip,
            vertices: vec![
                GlVertex {
                    s: 0.0,
                    t: 0.0,
                    vertex_index: 0,
                },
                GlVertex {
                    s: 1.0,
                    t: 0.0,
                    vertex_index: 1,
                },
                GlVertex {
                    s: 0.0,
                    t: 1.0,
                    vertex_index: 2,
                },
            ],
        });
    for i in 0..num_frames {
        builder = builder.frame(Frame {
            name: format!("frame{i}").into(),
            scale: Vec3::splat(2.0),
            translate: Vec3::ONE,
            vertices: vec![
                Vertex {
                    position: [i, i, i],
                    normal_index: 5,
                };
                3
            ],
        });
    }
    builder.build().unwrap()
}
