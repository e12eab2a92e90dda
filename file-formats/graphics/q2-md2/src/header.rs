//! MD2 file header
//!
//! The header is 17 little-endian `i32` fields. The first two identify the
//! format; the rest are counts and byte offsets of the sections.

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, warn};
use std::io::Write;

use crate::error::FormatError;
use crate::reader::{ByteReader, Cursor, ParseResult};

/// Magic signature for MD2 files ("IDP2")
pub const MD2_MAGIC: [u8; 4] = *b"IDP2";

/// The only MD2 version this crate reads
pub const MD2_VERSION: i32 = 8;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 17 * 4;

/// Size of one skin record (64-byte name)
pub const SKIN_SIZE: usize = 64;

/// Size of one texture coordinate record (2 x i16)
pub const TEX_COORD_SIZE: usize = 4;

/// Size of one triangle record (6 x u16)
pub const TRIANGLE_SIZE: usize = 12;

/// Size of one GL command word
pub const GLCMD_WORD_SIZE: usize = 4;

/// Fixed part of a frame: scale, translate and a 16-byte name
pub const FRAME_HEADER_SIZE: usize = 3 * 4 + 3 * 4 + 16;

/// Size of one compressed vertex (3 position bytes + normal index)
pub const VERTEX_SIZE: usize = 4;

/// Byte size of one frame block for `num_xyz` vertices
pub const fn frame_size_for(num_xyz: usize) -> usize {
    FRAME_HEADER_SIZE + num_xyz * VERTEX_SIZE
}

/// MD2 header structure, field for field as stored in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Md2Header {
    /// Magic signature ("IDP2")
    pub magic: [u8; 4],
    /// Format version (8)
    pub version: i32,
    /// Skin texture width in pixels
    pub skin_width: i32,
    /// Skin texture height in pixels
    pub skin_height: i32,
    /// Size of one frame block in bytes
    pub frame_size: i32,
    /// Number of skins
    pub num_skins: i32,
    /// Number of vertices per frame
    pub num_xyz: i32,
    /// Number of texture coordinates
    pub num_st: i32,
    /// Number of triangles
    pub num_tris: i32,
    /// Number of 32-bit words in the GL command stream
    pub num_glcmds: i32,
    /// Number of frames
    pub num_frames: i32,
    /// Offset of the skin names
    pub ofs_skins: i32,
    /// Offset of the texture coordinates
    pub ofs_st: i32,
    /// Offset of the triangles
    pub ofs_tris: i32,
    /// Offset of the frames
    pub ofs_frames: i32,
    /// Offset of the GL command stream
    pub ofs_glcmds: i32,
    /// Offset of the end of the file
    pub ofs_end: i32,
}

/// Header counts and offsets after validation, as native sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTable {
    /// Skin width in pixels
    pub skin_width: usize,
    /// Skin height in pixels
    pub skin_height: usize,
    /// Bytes per frame record
    pub frame_size: usize,
    /// Number of skin names
    pub num_skins: usize,
    /// Vertices per frame
    pub num_xyz: usize,
    /// Number of texture coordinates
    pub num_st: usize,
    /// Number of triangles
    pub num_tris: usize,
    /// Length of the GL command stream in 32-bit words
    pub num_glcmds: usize,
    /// Number of frames
    pub num_frames: usize,
    /// Offset of the skin names
    pub ofs_skins: usize,
    /// Offset of the texture coordinates
    pub ofs_st: usize,
    /// Offset of the triangles
    pub ofs_tris: usize,
    /// Offset of the frames
    pub ofs_frames: usize,
    /// Offset of the GL command stream
    pub ofs_glcmds: usize,
    /// Declared file length
    pub ofs_end: usize,
}

/// Decode the fixed header at the start of `input`
///
/// Fields are read in file order, so a wrong identifier is reported as
/// [`FormatError::BadMagic`] even when the buffer is also too short.
pub fn decode_header(input: &[u8]) -> ParseResult<Md2Header> {
    let mut reader = Cursor::at(input, 0, "header");

    let mut magic = [0u8; 4];
    reader.read_into(&mut magic)?;
    if magic != MD2_MAGIC {
        return Err(FormatError::BadMagic { found: magic });
    }

    let version = reader.read_i32_le()?;
    if version != MD2_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }

    reader.ensure(HEADER_SIZE - reader.position())?;

    let header = Md2Header {
        magic,
        version,
        skin_width: reader.read_i32_le()?,
        skin_height: reader.read_i32_le()?,
        frame_size: reader.read_i32_le()?,
        num_skins: reader.read_i32_le()?,
        num_xyz: reader.read_i32_le()?,
        num_st: reader.read_i32_le()?,
        num_tris: reader.read_i32_le()?,
        num_glcmds: reader.read_i32_le()?,
        num_frames: reader.read_i32_le()?,
        ofs_skins: reader.read_i32_le()?,
        ofs_st: reader.read_i32_le()?,
        ofs_tris: reader.read_i32_le()?,
        ofs_frames: reader.read_i32_le()?,
        ofs_glcmds: reader.read_i32_le()?,
        ofs_end: reader.read_i32_le()?,
    };

    debug!(
        "MD2 header: {} frames, {} vertices, {} triangles, {} skins",
        header.num_frames, header.num_xyz, header.num_tris, header.num_skins
    );

    Ok(header)
}

fn non_negative(field: &'static str, value: i32) -> ParseResult<usize> {
    usize::try_from(value).map_err(|_| FormatError::NegativeField { field, value })
}

fn check_span(
    section: &'static str,
    offset: usize,
    count: usize,
    record_size: usize,
    file_len: usize,
) -> ParseResult<()> {
    let needed = count.checked_mul(record_size).unwrap_or(usize::MAX);
    match offset.checked_add(needed) {
        Some(end) if end <= file_len => Ok(()),
        _ => Err(FormatError::Truncated {
            section,
            offset,
            needed,
            available: file_len,
        }),
    }
}

impl Md2Header {
    /// Check the header invariants against a buffer of `file_len` bytes
    ///
    /// Every count and offset must be non-negative, every section must lie
    /// inside the buffer and `frame_size` must match `num_xyz`.
    pub fn validate(&self, file_len: usize) -> ParseResult<SectionTable> {
        let table = SectionTable {
            skin_width: non_negative("skinwidth", self.skin_width)?,
            skin_height: non_negative("skinheight", self.skin_height)?,
            frame_size: non_negative("framesize", self.frame_size)?,
            num_skins: non_negative("num_skins", self.num_skins)?,
            num_xyz: non_negative("num_xyz", self.num_xyz)?,
            num_st: non_negative("num_st", self.num_st)?,
            num_tris: non_negative("num_tris", self.num_tris)?,
            num_glcmds: non_negative("num_glcmds", self.num_glcmds)?,
            num_frames: non_negative("num_frames", self.num_frames)?,
            ofs_skins: non_negative("ofs_skins", self.ofs_skins)?,
            ofs_st: non_negative("ofs_st", self.ofs_st)?,
            ofs_tris: non_negative("ofs_tris", self.ofs_tris)?,
            ofs_frames: non_negative("ofs_frames", self.ofs_frames)?,
            ofs_glcmds: non_negative("ofs_glcmds", self.ofs_glcmds)?,
            ofs_end: non_negative("ofs_end", self.ofs_end)?,
        };

        let implied = frame_size_for(table.num_xyz);
        if table.frame_size != implied {
            return Err(FormatError::SectionCountMismatch {
                section: "framesize",
                expected: implied,
                actual: table.frame_size,
            });
        }

        check_span("file", 0, table.ofs_end, 1, file_len)?;
        check_span("skins", table.ofs_skins, table.num_skins, SKIN_SIZE, file_len)?;
        check_span("texcoords", table.ofs_st, table.num_st, TEX_COORD_SIZE, file_len)?;
        check_span("triangles", table.ofs_tris, table.num_tris, TRIANGLE_SIZE, file_len)?;
        check_span(
            "frames",
            table.ofs_frames,
            table.num_frames,
            table.frame_size,
            file_len,
        )?;
        check_span(
            "glcmds",
            table.ofs_glcmds,
            table.num_glcmds,
            GLCMD_WORD_SIZE,
            file_len,
        )?;

        if file_len > table.ofs_end {
            warn!(
                "{} trailing bytes after ofs_end ({})",
                file_len - table.ofs_end,
                table.ofs_end
            );
        }

        Ok(table)
    }

    /// Write the 68 header bytes
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.magic)?;
        for field in [
            self.version,
            self.skin_width,
            self.skin_height,
            self.frame_size,
            self.num_skins,
            self.num_xyz,
            self.num_st,
            self.num_tris,
            self.num_glcmds,
            self.num_frames,
            self.ofs_skins,
            self.ofs_st,
            self.ofs_tris,
            self.ofs_frames,
            self.ofs_glcmds,
            self.ofs_end,
        ] {
            writer.write_i32::<LittleEndian>(field)?;
        }
        Ok(())
    }
}
