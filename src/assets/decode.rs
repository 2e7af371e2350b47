use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// One decoded frame of the sequence, straight (non-premultiplied) RGBA8.
///
/// Frames replace the surface wholesale, so no compositing form is kept.
#[derive(Clone, Debug)]
pub struct PreparedFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, shared between the store and any surface copy.
    pub rgba8: Arc<Vec<u8>>,
}

/// Decode the encoded bytes (JPEG, PNG, ...) of frame `number`.
pub fn decode_frame(number: usize, bytes: &[u8]) -> ReelResult<PreparedFrame> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| ReelError::frame(number, format!("decode: {e}")))?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ReelError::frame(number, "decoded to an empty image"));
    }
    Ok(PreparedFrame {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
