//! The loaded MD2 model and its playback state

use glam::Vec3;
use log::debug;
use std::fmt;

use crate::animation::{AnimationState, AnimationTable};
use crate::error::{AnimError, FormatError, Result};
use crate::frame::{Frame, read_frames};
use crate::geometry::{
    GlCommand, Skin, TexCoord, Triangle, read_gl_commands, read_skins, read_tex_coords,
    read_triangles,
};
use crate::header::{Md2Header, decode_header};
use crate::reader::ParseResult;
use crate::writer::{Sections, encode_at_offsets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Skins,
    TexCoords,
    Triangles,
    Frames,
    GlCommands,
}

/// A fully decoded MD2 model
///
/// Geometry is immutable once loaded. Only [`Md2Model::set_animation`],
/// [`Md2Model::tick`], [`Md2Model::stop`] and [`Md2Model::set_scale`] change
/// the model, and only its playback state.
#[derive(Debug, Clone)]
pub struct Md2Model {
    header: Md2Header,
    skins: Vec<Skin>,
    tex_coords: Vec<TexCoord>,
    triangles: Vec<Triangle>,
    frames: Vec<Frame>,
    gl_commands: Vec<GlCommand>,
    animations: AnimationTable,
    state: AnimationState,
    scale: f32,
}

impl Md2Model {
    /// Decode a model and attach the standard Quake 2 animation table
    ///
    /// # Examples
    ///
    /// ```
    /// use q2_md2::{FormatError, Md2Model};
    ///
    /// let err = Md2Model::load(&[0u8; 68]).unwrap_err();
    /// assert_eq!(err, FormatError::BadMagic { found: [0; 4] });
    /// ```
    pub fn load(input: &[u8]) -> ParseResult<Self> {
        Self::load_with_animations(input, AnimationTable::quake2_player())
    }

    /// Decode a model and attach `animations`
    ///
    /// Animations reaching past the model's last frame are dropped.
    pub fn load_with_animations(input: &[u8], mut animations: AnimationTable) -> ParseResult<Self> {
        let header = decode_header(input)?;
        let table = header.validate(input.len())?;

        let mut order = [
            (table.ofs_skins, Section::Skins),
            (table.ofs_st, Section::TexCoords),
            (table.ofs_tris, Section::Triangles),
            (table.ofs_frames, Section::Frames),
            (table.ofs_glcmds, Section::GlCommands),
        ];
        order.sort_unstable();

        let mut skins = Vec::new();
        let mut tex_coords = Vec::new();
        let mut triangles = Vec::new();
        let mut frames = Vec::new();
        let mut gl_commands = Vec::new();
        for (offset, section) in order {
            match section {
                Section::Skins => skins = read_skins(input, offset, table.num_skins)?,
                Section::TexCoords => tex_coords = read_tex_coords(input, offset, table.num_st)?,
                Section::Triangles => {
                    triangles =
                        read_triangles(input, offset, table.num_tris, table.num_xyz, table.num_st)?;
                }
                Section::Frames => frames = read_frames(input, &table)?,
                Section::GlCommands => {
                    gl_commands = read_gl_commands(input, offset, table.num_glcmds, table.num_xyz)?;
                }
            }
        }

        check_count("skins", table.num_skins, skins.len())?;
        check_count("texcoords", table.num_st, tex_coords.len())?;
        check_count("triangles", table.num_tris, triangles.len())?;
        check_count("frames", table.num_frames, frames.len())?;
        for frame in &frames {
            check_count("vertices", table.num_xyz, frame.vertices.len())?;
        }

        animations.retain_playable(frames.len());
        debug!(
            "Loaded MD2 model: {} frames, {} playable animations",
            frames.len(),
            animations.len()
        );

        Ok(Self {
            header,
            skins,
            tex_coords,
            triangles,
            frames,
            gl_commands,
            animations,
            state: AnimationState::new(),
            scale: 1.0,
        })
    }

    pub fn header(&self) -> &Md2Header {
        &self.header
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    pub fn tex_coords(&self) -> &[TexCoord] {
        &self.tex_coords
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn gl_commands(&self) -> &[GlCommand] {
        &self.gl_commands
    }

    pub fn animations(&self) -> &AnimationTable {
        &self.animations
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Names of the animations this model can play
    pub fn animation_names(&self) -> Vec<String> {
        self.animations.names()
    }

    /// Start the named animation from its first frame
    ///
    /// On error the previous playback state is kept.
    pub fn set_animation(&mut self, name: &str) -> std::result::Result<(), AnimError> {
        let id = self
            .animations
            .id_of(name)
            .ok_or_else(|| AnimError::UnknownAnimation(name.to_string()))?;
        self.state.set_animation(&self.animations, id)
    }

    /// Advance playback by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) {
        self.state.advance(delta_time);
    }

    /// Stop playback, holding the current pose
    pub fn stop(&mut self) {
        self.state.stop();
    }

    /// Uniform scale applied to [`Self::vertex_positions`]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Interpolated vertex positions of the current pose
    pub fn vertex_positions(&self) -> Vec<Vec3> {
        self.state
            .current_pose(&self.frames)
            .into_iter()
            .map(|p| p * self.scale)
            .collect()
    }

    /// Interpolated unit normals of the current pose
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        self.state.current_normals(&self.frames)
    }

    /// Re-encode the model at its stored section offsets
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let sections = Sections {
            skins: &self.skins,
            tex_coords: &self.tex_coords,
            triangles: &self.triangles,
            frames: &self.frames,
            gl_commands: &self.gl_commands,
        };
        Ok(encode_at_offsets(&self.header, &sections)?)
    }

    /// Counts and extents for display
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            skin_width: self.header.skin_width,
            skin_height: self.header.skin_height,
            num_skins: self.skins.len(),
            num_vertices: self.frames.first().map_or(0, |f| f.vertices.len()),
            num_tex_coords: self.tex_coords.len(),
            num_triangles: self.triangles.len(),
            num_frames: self.frames.len(),
            num_gl_commands: self.gl_commands.len(),
            bounds: self.frames.first().and_then(Frame::bounds),
            animations: self.animation_names(),
        }
    }
}

fn check_count(section: &'static str, expected: usize, actual: usize) -> ParseResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(FormatError::SectionCountMismatch {
            section,
            expected,
            actual,
        })
    }
}

/// Overview of a model's contents
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub skin_width: i32,
    pub skin_height: i32,
    pub num_skins: usize,
    pub num_vertices: usize,
    pub num_tex_coords: usize,
    pub num_triangles: usize,
    pub num_frames: usize,
    pub num_gl_commands: usize,
    /// Bounds of the first frame
    pub bounds: Option<(Vec3, Vec3)>,
    pub animations: Vec<String>,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Skin size:    {}x{}", self.skin_width, self.skin_height)?;
        writeln!(f, "Skins:        {}", self.num_skins)?;
        writeln!(f, "Vertices:     {}", self.num_vertices)?;
        writeln!(f, "Tex coords:   {}", self.num_tex_coords)?;
        writeln!(f, "Triangles:    {}", self.num_triangles)?;
        writeln!(f, "Frames:       {}", self.num_frames)?;
        writeln!(f, "GL commands:  {}", self.num_gl_commands)?;
        if let Some((min, max)) = self.bounds {
            writeln!(
                f,
                "Bounds:       ({:.2}, {:.2}, {:.2}) - ({:.2}, {:.2}, {:.2})",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }
        write!(f, "Animations:   {}", self.animations.join(", "))
    }
}
