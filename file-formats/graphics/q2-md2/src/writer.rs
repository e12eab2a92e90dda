//! Encoding MD2 files
//!
//! [`Md2Builder`] lays out a new file from parts. Loaded models re-encode
//! through the same section writers at their stored offsets.

use std::io::{self, Cursor, Seek, SeekFrom, Write};

use crate::error::{FormatError, Result};
use crate::frame::Frame;
use crate::geometry::{GlCommand, Skin, TexCoord, Triangle};
use crate::header::{
    GLCMD_WORD_SIZE, HEADER_SIZE, MD2_MAGIC, MD2_VERSION, Md2Header, SKIN_SIZE, TEX_COORD_SIZE,
    TRIANGLE_SIZE, frame_size_for,
};

/// Borrowed view of every section of a file
pub(crate) struct Sections<'a> {
    pub skins: &'a [Skin],
    pub tex_coords: &'a [TexCoord],
    pub triangles: &'a [Triangle],
    pub frames: &'a [Frame],
    pub gl_commands: &'a [GlCommand],
}

fn offset(value: i32) -> io::Result<u64> {
    u64::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "negative section offset"))
}

/// Write the header and each section at the header's offsets into a
/// zero-filled buffer of `ofs_end` bytes
pub(crate) fn encode_at_offsets(header: &Md2Header, sections: &Sections<'_>) -> io::Result<Vec<u8>> {
    let len = usize::try_from(header.ofs_end).unwrap_or(0).max(HEADER_SIZE);
    let mut cursor = Cursor::new(vec![0u8; len]);

    header.write(&mut cursor)?;

    cursor.seek(SeekFrom::Start(offset(header.ofs_skins)?))?;
    for skin in sections.skins {
        skin.write(&mut cursor)?;
    }

    cursor.seek(SeekFrom::Start(offset(header.ofs_st)?))?;
    for st in sections.tex_coords {
        st.write(&mut cursor)?;
    }

    cursor.seek(SeekFrom::Start(offset(header.ofs_tris)?))?;
    for triangle in sections.triangles {
        triangle.write(&mut cursor)?;
    }

    cursor.seek(SeekFrom::Start(offset(header.ofs_frames)?))?;
    for frame in sections.frames {
        frame.write(&mut cursor)?;
    }

    // The terminating zero count is already present in the zeroed buffer
    cursor.seek(SeekFrom::Start(offset(header.ofs_glcmds)?))?;
    for command in sections.gl_commands {
        command.write(&mut cursor)?;
    }

    cursor.flush()?;
    Ok(cursor.into_inner())
}

/// Assembles a new MD2 file
///
/// Sections are laid out in the conventional order: header, skins, texture
/// coordinates, triangles, frames, GL commands.
///
/// # Examples
///
/// ```
/// use q2_md2::{Md2Builder, Md2Model};
///
/// let bytes = Md2Builder::new().skin_size(64, 64).build().unwrap();
/// let model = Md2Model::load(&bytes).unwrap();
/// assert_eq!(model.header().skin_width, 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Md2Builder {
    skin_width: i32,
    skin_height: i32,
    skins: Vec<Skin>,
    tex_coords: Vec<TexCoord>,
    triangles: Vec<Triangle>,
    frames: Vec<Frame>,
    gl_commands: Vec<GlCommand>,
}

impl Md2Builder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn skin_size(mut self, width: i32, height: i32) -> Self {
        self.skin_width = width;
        self.skin_height = height;
        self
    }

    #[must_use]
    pub fn skin(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.skins.push(Skin { name: name.into() });
        self
    }

    #[must_use]
    pub fn tex_coords(mut self, tex_coords: impl IntoIterator<Item = TexCoord>) -> Self {
        self.tex_coords.extend(tex_coords);
        self
    }

    #[must_use]
    pub fn triangles(mut self, triangles: impl IntoIterator<Item = Triangle>) -> Self {
        self.triangles.extend(triangles);
        self
    }

    #[must_use]
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    #[must_use]
    pub fn gl_command(mut self, command: GlCommand) -> Self {
        self.gl_commands.push(command);
        self
    }

    /// Compute the header for the current parts
    ///
    /// Every frame must hold the same number of vertices.
    pub fn header(&self) -> Result<Md2Header> {
        let num_xyz = self.frames.first().map_or(0, |f| f.vertices.len());
        if let Some(frame) = self.frames.iter().find(|f| f.vertices.len() != num_xyz) {
            return Err(FormatError::SectionCountMismatch {
                section: "frames",
                expected: num_xyz,
                actual: frame.vertices.len(),
            }
            .into());
        }

        let frame_size = frame_size_for(num_xyz);
        let gl_words = self
            .gl_commands
            .iter()
            .map(GlCommand::word_count)
            .sum::<usize>()
            + 1;

        let ofs_skins = HEADER_SIZE;
        let ofs_st = ofs_skins + self.skins.len() * SKIN_SIZE;
        let ofs_tris = ofs_st + self.tex_coords.len() * TEX_COORD_SIZE;
        let ofs_frames = ofs_tris + self.triangles.len() * TRIANGLE_SIZE;
        let ofs_glcmds = ofs_frames + self.frames.len() * frame_size;
        let ofs_end = ofs_glcmds + gl_words * GLCMD_WORD_SIZE;

        Ok(Md2Header {
            magic: MD2_MAGIC,
            version: MD2_VERSION,
            skin_width: self.skin_width,
            skin_height: self.skin_height,
            frame_size: to_i32(frame_size)?,
            num_skins: to_i32(self.skins.len())?,
            num_xyz: to_i32(num_xyz)?,
            num_st: to_i32(self.tex_coords.len())?,
            num_tris: to_i32(self.triangles.len())?,
            num_glcmds: to_i32(gl_words)?,
            num_frames: to_i32(self.frames.len())?,
            ofs_skins: to_i32(ofs_skins)?,
            ofs_st: to_i32(ofs_st)?,
            ofs_tris: to_i32(ofs_tris)?,
            ofs_frames: to_i32(ofs_frames)?,
            ofs_glcmds: to_i32(ofs_glcmds)?,
            ofs_end: to_i32(ofs_end)?,
        })
    }

    /// Encode the file
    pub fn build(&self) -> Result<Vec<u8>> {
        let header = self.header()?;
        let sections = Sections {
            skins: &self.skins,
            tex_coords: &self.tex_coords,
            triangles: &self.triangles,
            frames: &self.frames,
            gl_commands: &self.gl_commands,
        };
        Ok(encode_at_offsets(&header, &sections)?)
    }
}

fn to_i32(value: usize) -> io::Result<i32> {
    i32::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "value does not fit an MD2 field"))
}
