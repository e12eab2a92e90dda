//! Re-encoding loaded models

use crate::{init_logger, model_bytes};
use glam::Vec3;
use pretty_assertions::assert_eq;
use q2_md2::header::{
    GLCMD_WORD_SIZE, HEADER_SIZE, MD2_MAGIC, MD2_VERSION, Md2Header, frame_size_for,
};
use q2_md2::{Frame, GlCommand, GlCommandKind, GlVertex, Md2Model, Skin, TexCoord, Triangle, Vertex};

#[test]
fn test_to_bytes_reproduces_input() {
    let bytes = model_bytes(5);
    let model = Md2Model::load(&bytes).unwrap();
    assert_eq!(model.to_bytes().unwrap(), bytes);
}

#[test]
fn test_reloaded_model_matches() {
    let model = Md2Model::load(&model_bytes(3)).unwrap();
    let again = Md2Model::load(&model.to_bytes().unwrap()).unwrap();
    assert_eq!(again.header(), model.header());
    assert_eq!(again.frames(), model.frames());
    assert_eq!(again.triangles(), model.triangles());
    assert_eq!(again.gl_commands(), model.gl_commands());
}

#[test]
fn test_trailing_bytes_dropped() {
    let bytes = model_bytes(2);
    let mut padded = bytes.clone();
    padded.extend_from_slice(b"junk");
    let model = Md2Model::load(&padded).unwrap();
    assert_eq!(model.to_bytes().unwrap(), bytes);
}

#[derive(Debug, Clone, Copy)]
enum Part {
    Skins,
    TexCoords,
    Triangles,
    Frames,
    GlCommands,
}

/// Encoded section bodies for a three-vertex, two-frame model
struct Parts {
    skins: Vec<u8>,
    tex_coords: Vec<u8>,
    triangles: Vec<u8>,
    frames: Vec<u8>,
    gl_commands: Vec<u8>,
}

impl Parts {
    /// `gl_padding` zero words follow the stream terminator
    fn new(skin_name: &[u8], frame_name: &[u8], gl_padding: usize) -> Self {
        let mut skins = Vec::new();
        Skin {
            name: skin_name.to_vec(),
        }
        .write(&mut skins)
        .unwrap();

        let mut tex_coords = Vec::new();
        for (s, t) in [(0, 0), (63, 0), (0, 63)] {
            TexCoord { s, t }.write(&mut tex_coords).unwrap();
        }

        let mut triangles = Vec::new();
        Triangle {
            vertex: [0, 1, 2],
            st: [0, 1, 2],
        }
        .write(&mut triangles)
        .unwrap();

        let mut frames = Vec::new();
        for i in 0..2u8 {
            Frame {
                name: frame_name.to_vec(),
                scale: Vec3::splat(0.5),
                translate: Vec3::new(-8.0, 0.0, 4.0),
                vertices: vec![
                    Vertex {
                        position: [i, 2 * i, 3 * i],
                        normal_index: 7,
                    };
                    3
                ],
            }
            .write(&mut frames)
            .unwrap();
        }

        let mut gl_commands = Vec::new();
        GlCommand {
            kind: GlCommandKind::Fan,
            vertices: (0..3u32)
                .map(|i| GlVertex {
                    s: i as f32 * 0.25,
                    t: 0.75,
                    vertex_index: i,
                })
                .collect(),
        }
        .write(&mut gl_commands)
        .unwrap();
        gl_commands.resize(gl_commands.len() + (1 + gl_padding) * GLCMD_WORD_SIZE, 0);

        Self {
            skins,
            tex_coords,
            triangles,
            frames,
            gl_commands,
        }
    }

    fn get(&self, part: Part) -> &[u8] {
        match part {
            Part::Skins => &self.skins,
            Part::TexCoords => &self.tex_coords,
            Part::Triangles => &self.triangles,
            Part::Frames => &self.frames,
            Part::GlCommands => &self.gl_commands,
        }
    }

    /// Lay the sections out in `order`, each preceded by `gap` zero bytes
    fn assemble(&self, order: [Part; 5], gap: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        let mut offsets = [0i32; 5];
        for part in order {
            bytes.resize(bytes.len() + gap, 0);
            offsets[part as usize] = bytes.len() as i32;
            bytes.extend_from_slice(self.get(part));
        }

        let header = Md2Header {
            magic: MD2_MAGIC,
            version: MD2_VERSION,
            skin_width: 64,
            skin_height: 64,
            frame_size: frame_size_for(3) as i32,
            num_skins: 1,
            num_xyz: 3,
            num_st: 3,
            num_tris: 1,
            num_glcmds: (self.gl_commands.len() / GLCMD_WORD_SIZE) as i32,
            num_frames: 2,
            ofs_skins: offsets[Part::Skins as usize],
            ofs_st: offsets[Part::TexCoords as usize],
            ofs_tris: offsets[Part::Triangles as usize],
            ofs_frames: offsets[Part::Frames as usize],
            ofs_glcmds: offsets[Part::GlCommands as usize],
            ofs_end: bytes.len() as i32,
        };
        let mut head = Vec::new();
        header.write(&mut head).unwrap();
        bytes[..HEADER_SIZE].copy_from_slice(&head);
        bytes
    }
}

const CANONICAL: [Part; 5] = [
    Part::Skins,
    Part::TexCoords,
    Part::Triangles,
    Part::Frames,
    Part::GlCommands,
];

fn reencode(bytes: &[u8]) -> Vec<u8> {
    init_logger();
    Md2Model::load(bytes).unwrap().to_bytes().unwrap()
}

#[test]
fn test_out_of_order_sections_kept_in_place() {
    let parts = Parts::new(b"models/monsters/tank/skin.pcx", b"walk1", 0);
    let bytes = parts.assemble(
        [
            Part::GlCommands,
            Part::Frames,
            Part::Triangles,
            Part::Skins,
            Part::TexCoords,
        ],
        0,
    );
    assert_eq!(reencode(&bytes), bytes);
}

#[test]
fn test_zero_gaps_between_sections_kept() {
    let parts = Parts::new(b"models/monsters/tank/skin.pcx", b"walk1", 0);
    let bytes = parts.assemble(CANONICAL, 20);
    assert_eq!(reencode(&bytes), bytes);
}

#[test]
fn test_gl_stream_padded_after_terminator() {
    let parts = Parts::new(b"models/monsters/tank/skin.pcx", b"walk1", 3);
    let bytes = parts.assemble(
        [
            Part::Frames,
            Part::GlCommands,
            Part::Skins,
            Part::TexCoords,
            Part::Triangles,
        ],
        8,
    );

    let model = Md2Model::load(&bytes).unwrap();
    assert_eq!(model.header().num_glcmds, 14);
    assert_eq!(model.gl_commands().len(), 1);
    assert_eq!(reencode(&bytes), bytes);
}

#[test]
fn test_non_ascii_names_kept() {
    let skin_name = b"models/monsters/ch\xE2teau/skin.pcx";
    let frame_name = b"d\xE9fense\xFF1";
    let parts = Parts::new(skin_name, frame_name, 0);
    let bytes = parts.assemble(CANONICAL, 0);

    let model = Md2Model::load(&bytes).unwrap();
    assert_eq!(model.skins()[0].name, skin_name.to_vec());
    assert_eq!(model.frames()[1].name, frame_name.to_vec());
    assert_eq!(model.frames()[1].name(), "d\u{FFFD}fense\u{FFFD}1");
    assert_eq!(reencode(&bytes), bytes);
}
