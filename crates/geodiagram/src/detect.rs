use std::path::Path;

use crate::core::{DiagramSegment, GrayImage, SegmentError};
use crate::pipeline::{DiagramParams, DiagramParse, DiagramParser, ParseError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the image helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Copy an `image::GrayImage` into the `geodiagram-core` raster type.
pub fn gray_raster(img: &::image::GrayImage) -> Result<GrayImage, SegmentError> {
    GrayImage::from_raw(img.width() as usize, img.height() as usize, img.as_raw().clone())
}

/// Binarize a grayscale image into a diagram segment (dark ink on bright
/// paper).
pub fn segment_image(img: &::image::GrayImage) -> Result<DiagramSegment, SegmentError> {
    Ok(DiagramSegment::from_gray(gray_raster(img)?))
}

/// Decode an image file, convert it to grayscale and segment it.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(path)))]
pub fn load_segment(path: impl AsRef<Path>) -> Result<DiagramSegment, DetectError> {
    let img = ::image::open(path.as_ref())?.to_luma8();
    log::debug!("loaded {}x{} image", img.width(), img.height());
    Ok(segment_image(&img)?)
}

/// Parse a grayscale image end-to-end with coverage selection.
pub fn parse_image(img: &::image::GrayImage, params: DiagramParams) -> Result<DiagramParse, DetectError> {
    let segment = segment_image(img)?;
    Ok(DiagramParser::new(params).parse(&segment)?)
}

/// Convenience overload using default parameters.
pub fn parse_image_default(img: &::image::GrayImage) -> Result<DiagramParse, DetectError> {
    parse_image(img, DiagramParams::default())
}
