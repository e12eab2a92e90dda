//! Skins, texture coordinates, triangles and the GL command stream

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, warn};
use std::borrow::Cow;
use std::io::{self, Write};

use crate::error::FormatError;
use crate::header::{GLCMD_WORD_SIZE, SKIN_SIZE, TEX_COORD_SIZE, TRIANGLE_SIZE};
use crate::reader::{ByteReader, Cursor, ParseResult, read_fixed_name};

/// Size of one GL command vertex (s, t, vertex index)
pub const GLCMD_VERTEX_SIZE: usize = 3 * GLCMD_WORD_SIZE;

/// Skin texture reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    /// Texture path bytes, trimmed at the first null
    pub name: Vec<u8>,
}

impl Skin {
    /// Texture path for display; bytes that are not UTF-8 are replaced
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Write the 64-byte, zero-padded record
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_fixed_name::<SKIN_SIZE, W>(writer, &self.name)
    }
}

/// Texture coordinate in skin pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexCoord {
    pub s: i16,
    pub t: i16,
}

impl TexCoord {
    /// Map to `[0, 1]` texture space using the skin size
    pub fn normalized(&self, skin_width: usize, skin_height: usize) -> (f32, f32) {
        let w = skin_width.max(1) as f32;
        let h = skin_height.max(1) as f32;
        (f32::from(self.s) / w, f32::from(self.t) / h)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i16::<LittleEndian>(self.s)?;
        writer.write_i16::<LittleEndian>(self.t)
    }
}

/// Triangle referencing three vertices and three texture coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triangle {
    /// Indices into each frame's vertex list
    pub vertex: [u16; 3],
    /// Indices into the texture coordinate list
    pub st: [u16; 3],
}

impl Triangle {
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for index in self.vertex.iter().chain(self.st.iter()) {
            writer.write_u16::<LittleEndian>(*index)?;
        }
        Ok(())
    }
}

/// Primitive type of a GL command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlCommandKind {
    /// Triangle strip (positive count)
    Strip,
    /// Triangle fan (negative count)
    Fan,
}

/// One vertex of a GL command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlVertex {
    /// Texture coordinate, already normalized
    pub s: f32,
    pub t: f32,
    /// Index into each frame's vertex list
    pub vertex_index: u32,
}

/// A triangle strip or fan from the GL command stream
#[derive(Debug, Clone, PartialEq)]
pub struct GlCommand {
    pub kind: GlCommandKind,
    pub vertices: Vec<GlVertex>,
}

impl GlCommand {
    /// Number of 32-bit words this command occupies in the stream
    pub fn word_count(&self) -> usize {
        1 + 3 * self.vertices.len()
    }

    /// Expand the strip or fan into individual triangles
    ///
    /// Odd strip triangles swap their first two vertices to keep the winding.
    pub fn triangles(&self) -> Vec<[GlVertex; 3]> {
        let v = &self.vertices;
        if v.len() < 3 {
            return Vec::new();
        }
        (0..v.len() - 2)
            .map(|i| match self.kind {
                GlCommandKind::Strip if i % 2 == 1 => [v[i + 1], v[i], v[i + 2]],
                GlCommandKind::Strip => [v[i], v[i + 1], v[i + 2]],
                GlCommandKind::Fan => [v[0], v[i + 1], v[i + 2]],
            })
            .collect()
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let count = i32::try_from(self.vertices.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "GL command too long"))?;
        let count = match self.kind {
            GlCommandKind::Strip => count,
            GlCommandKind::Fan => -count,
        };
        writer.write_i32::<LittleEndian>(count)?;
        for vertex in &self.vertices {
            writer.write_f32::<LittleEndian>(vertex.s)?;
            writer.write_f32::<LittleEndian>(vertex.t)?;
            let index = i32::try_from(vertex.vertex_index).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "vertex index too large")
            })?;
            writer.write_i32::<LittleEndian>(index)?;
        }
        Ok(())
    }
}

pub(crate) fn write_fixed_name<const N: usize, W: Write>(
    writer: &mut W,
    name: &[u8],
) -> io::Result<()> {
    let mut raw = [0u8; N];
    let len = name.len().min(N);
    raw[..len].copy_from_slice(&name[..len]);
    writer.write_all(&raw)
}

fn check_index(section: &'static str, index: i64, limit: usize) -> ParseResult<()> {
    match usize::try_from(index) {
        Ok(i) if i < limit => Ok(()),
        _ => Err(FormatError::IndexOutOfRange {
            section,
            index,
            limit,
        }),
    }
}

/// Read `count` skin names at `offset`
pub fn read_skins(input: &[u8], offset: usize, count: usize) -> ParseResult<Vec<Skin>> {
    let mut reader = Cursor::at(input, offset, "skins");
    reader.ensure(count.saturating_mul(SKIN_SIZE))?;

    let mut skins = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_fixed_name::<SKIN_SIZE>(&mut reader)?;
        skins.push(Skin { name });
    }
    debug!("Read {} skins at offset {}", skins.len(), offset);
    Ok(skins)
}

/// Read `count` texture coordinates at `offset`
pub fn read_tex_coords(input: &[u8], offset: usize, count: usize) -> ParseResult<Vec<TexCoord>> {
    let mut reader = Cursor::at(input, offset, "texcoords");
    reader.ensure(count.saturating_mul(TEX_COORD_SIZE))?;

    let mut tex_coords = Vec::with_capacity(count);
    for _ in 0..count {
        let s = reader.read_i16_le()?;
        let t = reader.read_i16_le()?;
        tex_coords.push(TexCoord { s, t });
    }
    debug!("Read {} texture coordinates at offset {}", tex_coords.len(), offset);
    Ok(tex_coords)
}

/// Read `count` triangles at `offset`, checking every index
pub fn read_triangles(
    input: &[u8],
    offset: usize,
    count: usize,
    num_xyz: usize,
    num_st: usize,
) -> ParseResult<Vec<Triangle>> {
    let mut reader = Cursor::at(input, offset, "triangles");
    reader.ensure(count.saturating_mul(TRIANGLE_SIZE))?;

    let mut triangles = Vec::with_capacity(count);
    for _ in 0..count {
        let mut triangle = Triangle::default();
        for index in &mut triangle.vertex {
            *index = reader.read_u16_le()?;
            check_index("triangles", i64::from(*index), num_xyz)?;
        }
        for index in &mut triangle.st {
            *index = reader.read_u16_le()?;
            check_index("triangles", i64::from(*index), num_st)?;
        }
        triangles.push(triangle);
    }
    debug!("Read {} triangles at offset {}", triangles.len(), offset);
    Ok(triangles)
}

/// Read the GL command stream at `offset`
///
/// Stops at the first zero count or once `num_words` words are consumed.
/// A stream that disagrees with `num_words` is logged, not rejected.
pub fn read_gl_commands(
    input: &[u8],
    offset: usize,
    num_words: usize,
    num_xyz: usize,
) -> ParseResult<Vec<GlCommand>> {
    let mut reader = Cursor::at(input, offset, "glcmds");
    let mut commands = Vec::new();
    let mut words = 0usize;
    let mut terminated = false;

    while words < num_words {
        let count = reader.read_i32_le()?;
        words += 1;
        if count == 0 {
            terminated = true;
            break;
        }

        let kind = if count > 0 {
            GlCommandKind::Strip
        } else {
            GlCommandKind::Fan
        };
        let num_vertices = count.unsigned_abs() as usize;
        reader.ensure(num_vertices.saturating_mul(GLCMD_VERTEX_SIZE))?;

        let mut vertices = Vec::with_capacity(num_vertices);
        for _ in 0..num_vertices {
            let s = reader.read_f32_le()?;
            let t = reader.read_f32_le()?;
            let index = reader.read_i32_le()?;
            check_index("glcmds", i64::from(index), num_xyz)?;
            vertices.push(GlVertex {
                s,
                t,
                vertex_index: index as u32,
            });
        }
        words += 3 * num_vertices;
        commands.push(GlCommand { kind, vertices });
    }

    if words > num_words {
        warn!("GL command stream overruns its budget: {words} words used, {num_words} declared");
    } else if !terminated && num_words > 0 {
        warn!("GL command stream has no terminator within {num_words} words");
    } else if words < num_words {
        warn!(
            "GL command stream ends {} words before its declared size",
            num_words - words
        );
    }

    debug!("Read {} GL commands at offset {}", commands.len(), offset);
    Ok(commands)
}
