use std::path::Path;

use anyhow::Context as _;
use image::imageops::FilterType;

use crate::{
    assets::decode::PreparedFrame,
    foundation::core::{FrameIndex, SurfaceSize},
    foundation::error::{ReelError, ReelResult},
};

/// Persistent drawing surface that frames are painted onto.
///
/// The surface owns a fixed pixel canvas; every frame is stretched to fill it.
pub trait FrameSurface {
    /// Fixed intrinsic size of the surface.
    fn size(&self) -> SurfaceSize;

    /// Replace the surface contents with `frame`, stretched to [`FrameSurface::size`].
    fn draw_frame(&mut self, index: FrameIndex, frame: &PreparedFrame) -> ReelResult<()>;
}

/// Readback of the surface contents.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// In-memory CPU surface backed by a straight RGBA8 buffer.
#[derive(Clone, Debug)]
pub struct CpuSurface {
    size: SurfaceSize,
    pixels: Vec<u8>,
    drawn: Option<FrameIndex>,
    draw_count: u64,
}

impl CpuSurface {
    /// Create a transparent surface of `size`.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixels: vec![0; size.rgba8_len()],
            drawn: None,
            draw_count: 0,
        }
    }

    /// Index of the most recently drawn frame, if any.
    pub fn drawn(&self) -> Option<FrameIndex> {
        self.drawn
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn readback_rgba8(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data: self.pixels.clone(),
            premultiplied: false,
        }
    }

    /// Encode the current contents as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> ReelResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.size.width,
            self.size.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

impl FrameSurface for CpuSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn draw_frame(&mut self, index: FrameIndex, frame: &PreparedFrame) -> ReelResult<()> {
        let expected = (frame.width as usize) * (frame.height as usize) * 4;
        if frame.rgba8.len() != expected || expected == 0 {
            return Err(ReelError::surface(format!(
                "frame {} has {} bytes, expected {expected}",
                index.number(),
                frame.rgba8.len()
            )));
        }

        if frame.width == self.size.width && frame.height == self.size.height {
            self.pixels.copy_from_slice(&frame.rgba8);
        } else {
            let src = image::RgbaImage::from_raw(
                frame.width,
                frame.height,
                frame.rgba8.to_vec(),
            )
            .ok_or_else(|| ReelError::surface("frame buffer does not match its dimensions"))?;
            let stretched = image::imageops::resize(
                &src,
                self.size.width,
                self.size.height,
                FilterType::Triangle,
            );
            self.pixels = stretched.into_raw();
        }

        self.drawn = Some(index);
        self.draw_count += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
