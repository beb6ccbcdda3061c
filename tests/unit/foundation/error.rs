use super::*;
use crate::foundation::core::{PixelComponents, PixelDepth};

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DrosteError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DrosteError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn format_mismatch_names_both_formats() {
    let err = DrosteError::FormatMismatch {
        src: PixelFormat::new(PixelDepth::U8, PixelComponents::Rgba),
        dst: PixelFormat::new(PixelDepth::F32, PixelComponents::Alpha),
    };
    let msg = err.to_string();
    assert!(msg.contains("rgba/u8"), "{msg}");
    assert!(msg.contains("alpha/f32"), "{msg}");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DrosteError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
