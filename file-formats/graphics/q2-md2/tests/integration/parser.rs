//! Decoding failures and section contents

use crate::model_bytes;
use pretty_assertions::assert_eq;
use q2_md2::{FormatError, GlCommandKind, Md2Model, decode_header};
use test_case::test_case;

fn set_field(bytes: &mut [u8], offset: usize, value: i32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[test]
fn test_load_counts() {
    let model = Md2Model::load(&model_bytes(4)).unwrap();
    let header = model.header();
    assert_eq!(&header.magic, b"IDP2");
    assert_eq!(header.version, 8);
    assert_eq!(header.num_xyz, 3);
    assert_eq!(header.frame_size, 40 + 3 * 4);
    assert_eq!(model.skins().len(), 1);
    assert_eq!(model.tex_coords().len(), 3);
    assert_eq!(model.triangles().len(), 1);
    assert_eq!(model.frames().len(), 4);
    assert_eq!(model.gl_commands()[0].kind, GlCommandKind::Strip);
    assert_eq!(model.gl_commands()[0].triangles().len(), 1);
}

#[test]
fn test_zero_header_is_bad_magic() {
    let err = Md2Model::load(&[0u8; 68]).unwrap_err();
    assert_eq!(err, FormatError::BadMagic { found: [0; 4] });
}

#[test]
fn test_short_buffer_with_bad_magic() {
    let err = decode_header(b"MD3\0").unwrap_err();
    assert_eq!(err, FormatError::BadMagic { found: *b"MD3\0" });
}

#[test]
fn test_wrong_version() {
    let mut bytes = model_bytes(1);
    set_field(&mut bytes, 4, 15);
    assert_eq!(
        Md2Model::load(&bytes).unwrap_err(),
        FormatError::UnsupportedVersion(15)
    );
}

#[test]
fn test_truncated_mid_frame() {
    let bytes = model_bytes(3);
    let header = decode_header(&bytes).unwrap();
    let cut = header.ofs_frames as usize + header.frame_size as usize + 10;
    let err = Md2Model::load(&bytes[..cut]).unwrap_err();
    assert!(matches!(err, FormatError::Truncated { .. }), "{err}");
}

// Header byte offsets of the patched fields
#[test_case(20, -1 ; "negative skin count")]
#[test_case(24, -3 ; "negative vertex count")]
#[test_case(56, -68 ; "negative frame offset")]
fn test_negative_fields(offset: usize, value: i32) {
    let mut bytes = model_bytes(1);
    set_field(&mut bytes, offset, value);
    assert!(matches!(
        Md2Model::load(&bytes).unwrap_err(),
        FormatError::NegativeField { value: v, .. } if v == value
    ));
}

#[test_case(20, 50 ; "too many skins")]
#[test_case(32, 1000 ; "too many triangles")]
#[test_case(64, 1 << 20 ; "end past buffer")]
fn test_sections_past_buffer(offset: usize, value: i32) {
    let mut bytes = model_bytes(1);
    set_field(&mut bytes, offset, value);
    assert!(matches!(
        Md2Model::load(&bytes).unwrap_err(),
        FormatError::Truncated { .. }
    ));
}

#[test]
fn test_frame_size_mismatch() {
    let mut bytes = model_bytes(1);
    set_field(&mut bytes, 16, 60);
    assert_eq!(
        Md2Model::load(&bytes).unwrap_err(),
        FormatError::SectionCountMismatch {
            section: "framesize",
            expected: 52,
            actual: 60,
        }
    );
}

#[test]
fn test_triangle_index_out_of_range() {
    let mut bytes = model_bytes(1);
    let header = decode_header(&bytes).unwrap();
    let tri = header.ofs_tris as usize;
    bytes[tri + 2..tri + 4].copy_from_slice(&7u16.to_le_bytes());
    assert_eq!(
        Md2Model::load(&bytes).unwrap_err(),
        FormatError::IndexOutOfRange {
            section: "triangles",
            index: 7,
            limit: 3,
        }
    );
}

#[test]
fn test_trailing_bytes_accepted() {
    let mut bytes = model_bytes(2);
    bytes.extend_from_slice(&[0xAB; 16]);
    let model = Md2Model::load(&bytes).unwrap();
    assert_eq!(model.frames().len(), 2);
}
