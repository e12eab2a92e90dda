//! Keyframes of compressed vertex positions

use byteorder::{LittleEndian, WriteBytesExt};
use glam::Vec3;
use std::borrow::Cow;
use log::debug;
use std::io::{self, Write};

use crate::error::FormatError;
use crate::geometry::write_fixed_name;
use crate::header::{SectionTable, frame_size_for};
use crate::normals::{NUM_VERTEX_NORMALS, normal};
use crate::reader::{ByteReader, Cursor, ParseResult, read_fixed_name, read_vec3};

/// Length of the fixed frame name field
pub const FRAME_NAME_SIZE: usize = 16;

/// A vertex quantized to one byte per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vertex {
    /// Position bytes, expanded with the frame's scale and translate
    pub position: [u8; 3],
    /// Index into the normal table
    pub normal_index: u8,
}

impl Vertex {
    /// Unit normal of this vertex
    ///
    /// Indices are checked at load time, so this only falls back to zero for
    /// vertices built by hand with an invalid index.
    pub fn normal(&self) -> Vec3 {
        normal(self.normal_index).unwrap_or(Vec3::ZERO)
    }

    /// Raw position bytes as floats
    pub fn raw(&self) -> Vec3 {
        let [x, y, z] = self.position;
        Vec3::new(f32::from(x), f32::from(y), f32::from(z))
    }
}

/// One animation keyframe
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame name bytes, e.g. "run3", trimmed at the first null
    pub name: Vec<u8>,
    pub scale: Vec3,
    pub translate: Vec3,
    pub vertices: Vec<Vertex>,
}

impl Frame {
    /// Frame name for display; bytes that are not UTF-8 are replaced
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Decompress a vertex: `scale * bytes + translate`, per axis
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.vertices.get(index).map(|v| self.decompress(v))
    }

    /// Decompress every vertex of the frame
    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|v| self.decompress(v)).collect()
    }

    pub(crate) fn decompress(&self, vertex: &Vertex) -> Vec3 {
        self.scale * vertex.raw() + self.translate
    }

    /// Axis-aligned bounds of the decompressed vertices
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.vertices.iter().map(|v| self.decompress(v));
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Write the frame block
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for v in [self.scale, self.translate] {
            writer.write_f32::<LittleEndian>(v.x)?;
            writer.write_f32::<LittleEndian>(v.y)?;
            writer.write_f32::<LittleEndian>(v.z)?;
        }
        write_fixed_name::<FRAME_NAME_SIZE, W>(writer, &self.name)?;
        for vertex in &self.vertices {
            writer.write_all(&vertex.position)?;
            writer.write_u8(vertex.normal_index)?;
        }
        Ok(())
    }
}

/// Read the `num_frames` frame blocks at `ofs_frames`
///
/// `frame_size` must match `num_xyz`, as [`Md2Header::validate`] ensures.
///
/// [`Md2Header::validate`]: crate::header::Md2Header::validate
pub fn read_frames(input: &[u8], sections: &SectionTable) -> ParseResult<Vec<Frame>> {
    let offset = sections.ofs_frames;
    let implied = frame_size_for(sections.num_xyz);
    if sections.frame_size != implied {
        return Err(FormatError::SectionCountMismatch {
            section: "framesize",
            expected: implied,
            actual: sections.frame_size,
        });
    }

    let mut frames = Vec::with_capacity(sections.num_frames.min(input.len() / sections.frame_size));

    for i in 0..sections.num_frames {
        let start = i
            .checked_mul(sections.frame_size)
            .and_then(|o| o.checked_add(offset))
            .ok_or(FormatError::Truncated {
                section: "frames",
                offset,
                needed: usize::MAX,
                available: input.len(),
            })?;
        let mut reader = Cursor::at(input, start, "frames");
        reader.ensure(sections.frame_size)?;

        let scale = read_vec3(&mut reader)?;
        let translate = read_vec3(&mut reader)?;
        let name = read_frame_name(&mut reader)?;

        let mut vertices = Vec::with_capacity(sections.num_xyz);
        for _ in 0..sections.num_xyz {
            let mut position = [0u8; 3];
            reader.read_into(&mut position)?;
            let normal_index = reader.read_u8()?;
            if usize::from(normal_index) >= NUM_VERTEX_NORMALS {
                return Err(FormatError::IndexOutOfRange {
                    section: "frames",
                    index: i64::from(normal_index),
                    limit: NUM_VERTEX_NORMALS,
                });
            }
            vertices.push(Vertex {
                position,
                normal_index,
            });
        }

        frames.push(Frame {
            name,
            scale,
            translate,
            vertices,
        });
    }

    debug!("Read {} frames at offset {}", frames.len(), offset);
    Ok(frames)
}

fn read_frame_name(reader: &mut impl ByteReader) -> ParseResult<Vec<u8>> {
    read_fixed_name::<FRAME_NAME_SIZE>(reader)
}
