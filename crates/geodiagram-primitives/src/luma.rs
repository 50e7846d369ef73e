//! Conversions between the diagram raster and `image` buffers.

use geodiagram_core::GrayImage;
use image::{ImageBuffer, Luma};

pub(crate) type LumaImage = image::GrayImage;
pub(crate) type LumaF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

pub(crate) fn to_luma(img: &GrayImage) -> LumaImage {
    ImageBuffer::from_fn(img.width as u32, img.height as u32, |x, y| {
        Luma([img.get(x as usize, y as usize)])
    })
}

pub(crate) fn to_luma_f32(img: &GrayImage) -> LumaF32 {
    ImageBuffer::from_fn(img.width as u32, img.height as u32, |x, y| {
        Luma([img.get(x as usize, y as usize) as f32])
    })
}

pub(crate) fn from_luma(img: LumaImage) -> GrayImage {
    GrayImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    }
}
