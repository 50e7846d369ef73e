//! Binary preprocessing used by the contour strategy.

use geodiagram_core::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology;

use crate::luma::{from_luma, to_luma, to_luma_f32};

/// Sigma of the Gaussian window for an odd block size
/// (`0.3 * ((size - 1) / 2 - 1) + 0.8`).
fn block_sigma(block: usize) -> f32 {
    0.3 * ((block as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Inverted adaptive threshold: a pixel becomes foreground (255) when it is
/// not brighter than its Gaussian-weighted neighbourhood mean minus `c`.
pub fn adaptive_threshold_inv(gray: &GrayImage, block_size: usize, c: f64) -> GrayImage {
    let mut out = GrayImage::new(gray.width, gray.height);
    if gray.width == 0 || gray.height == 0 {
        return out;
    }
    let block = (block_size | 1).max(3);
    let mean = gaussian_blur_f32(&to_luma_f32(gray), block_sigma(block));
    for (i, (&src, m)) in gray.data.iter().zip(mean.pixels()).enumerate() {
        if (src as f64) <= m[0] as f64 - c {
            out.data[i] = 255;
        }
    }
    out
}

/// 3x3 erosion. Pixels outside the raster count as foreground.
pub fn erode3x3(img: &GrayImage) -> GrayImage {
    from_luma(morphology::erode(&to_luma(img), Norm::LInf, 1))
}

/// 3x3 dilation.
pub fn dilate3x3(img: &GrayImage) -> GrayImage {
    from_luma(morphology::dilate(&to_luma(img), Norm::LInf, 1))
}

/// 3x3 closing (dilation then erosion).
pub fn close3x3(img: &GrayImage) -> GrayImage {
    from_luma(morphology::close(&to_luma(img), Norm::LInf, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_raster_has_no_foreground() {
        let gray = GrayImage::filled(20, 20, 128);
        assert!(adaptive_threshold_inv(&gray, 11, 2.0).foreground_pixels().is_empty());
        // Window sigma for the default block size.
        assert!((block_sigma(11) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn dark_stroke_becomes_foreground() {
        let mut gray = GrayImage::filled(30, 30, 250);
        for y in 0..30 {
            for x in 14..18 {
                gray.set(x, y, 10);
            }
        }
        let bin = adaptive_threshold_inv(&gray, 11, 2.0);
        assert_eq!(bin.get(15, 15), 255);
        assert_eq!(bin.get(5, 15), 0);
        assert_eq!(bin.get(25, 3), 0);
    }

    #[test]
    fn close_fills_pinholes_and_erode_thins() {
        let mut img = GrayImage::new(9, 9);
        for y in 2..7 {
            for x in 2..7 {
                img.set(x, y, 255);
            }
        }
        img.set(4, 4, 0);
        let closed = close3x3(&img);
        assert_eq!(closed.get(4, 4), 255);

        let eroded = erode3x3(&closed);
        assert_eq!(eroded.foreground_pixels().len(), 9);
        assert_eq!(eroded.get(2, 2), 0);
        assert_eq!(dilate3x3(&eroded), closed);
    }
}
