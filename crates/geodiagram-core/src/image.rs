use crate::geometry::Point;

/// Errors raised when building rasters or diagram segments.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SegmentError {
    #[error("invalid raster dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid raster buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
    #[error("grayscale and binary rasters differ in size ({gray:?} vs {binary:?})")]
    SizeMismatch {
        gray: (usize, usize),
        binary: (usize, usize),
    },
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl GrayImageView<'_> {
    /// Pixel value, `0` outside the raster.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Black raster of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap a row-major buffer, validating its length.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SegmentError> {
        if width == 0 || height == 0 {
            return Err(SegmentError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(SegmentError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(SegmentError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    /// Set a pixel given signed coordinates; out-of-range writes are ignored.
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, value: u8) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.set(x as usize, y as usize, value);
        }
    }

    /// Swap dark and bright values.
    pub fn inverted(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| 255 - v).collect(),
        }
    }

    /// Coordinates of all non-zero pixels, row-major order.
    pub fn foreground_pixels(&self) -> Vec<Point> {
        let mut out = Vec::new();
        for y in 0..self.height {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    out.push(Point::new(x as f64, y as f64));
                }
            }
        }
        out
    }
}

/// Compute Otsu threshold from a set of sample intensities.
///
/// Values `<= threshold` form the dark class.
pub fn otsu_threshold(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }

    let mut hist = [0u64; 256];
    let (mut min_v, mut max_v) = (255u8, 0u8);
    for &v in samples {
        hist[v as usize] += 1;
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v == max_v {
        return min_v;
    }
    if hist.iter().filter(|&&h| h > 0).count() <= 2 {
        return ((min_v as u16 + max_v as u16) / 2) as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

/// One diagram region as delivered by segmentation.
///
/// `gray` is the segmented grayscale raster (dark ink on bright paper),
/// `binary` marks ink pixels with non-zero values and `pixels` enumerates
/// those ink pixels.
#[derive(Clone, Debug)]
pub struct DiagramSegment {
    gray: GrayImage,
    binary: GrayImage,
    pixels: Vec<Point>,
}

impl DiagramSegment {
    /// Build a segment from matching grayscale and binary rasters.
    pub fn new(gray: GrayImage, binary: GrayImage) -> Result<Self, SegmentError> {
        if gray.width != binary.width || gray.height != binary.height {
            return Err(SegmentError::SizeMismatch {
                gray: (gray.width, gray.height),
                binary: (binary.width, binary.height),
            });
        }
        let pixels = binary.foreground_pixels();
        Ok(Self {
            gray,
            binary,
            pixels,
        })
    }

    /// Binarize a grayscale raster with a global Otsu threshold.
    ///
    /// Uniform rasters contain no ink.
    pub fn from_gray(gray: GrayImage) -> Self {
        let threshold = otsu_threshold(&gray.data);
        let uniform = gray.data.iter().all(|&v| v == gray.data[0]);
        let data = gray
            .data
            .iter()
            .map(|&v| if !uniform && v <= threshold { 255 } else { 0 })
            .collect();
        let binary = GrayImage {
            width: gray.width,
            height: gray.height,
            data,
        };
        let pixels = binary.foreground_pixels();
        log::debug!(
            "binarized {}x{} segment at threshold {threshold}: {} ink pixels",
            gray.width,
            gray.height,
            pixels.len()
        );
        Self {
            gray,
            binary,
            pixels,
        }
    }

    /// Build a segment from an ink mask alone; the grayscale raster is its
    /// inverse (ink dark on bright background).
    pub fn from_binary(binary: GrayImage) -> Self {
        let gray = GrayImage {
            width: binary.width,
            height: binary.height,
            data: binary
                .data
                .iter()
                .map(|&v| if v != 0 { 0 } else { 255 })
                .collect(),
        };
        let pixels = binary.foreground_pixels();
        Self {
            gray,
            binary,
            pixels,
        }
    }

    #[inline]
    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    #[inline]
    pub fn binary(&self) -> &GrayImage {
        &self.binary
    }

    #[inline]
    pub fn pixels(&self) -> &[Point] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.gray.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.gray.height
    }

    /// `(width, height)` in pixels.
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.gray.width as f64, self.gray.height as f64)
    }
}
