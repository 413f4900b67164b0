use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::face_location::FaceLocation;

/// A single video/image frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// True for frames with no pixels (zero area or no backing data).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Bilinear resize by `factor` on both axes. Keeps the frame index.
    ///
    /// Output dimensions are truncated and never drop below 1 pixel.
    pub fn scaled(&self, factor: f64) -> Result<Frame, Box<dyn std::error::Error>> {
        if self.channels != 3 {
            return Err(format!("Cannot scale {}-channel frame", self.channels).into());
        }
        let new_w = ((self.width as f64 * factor) as u32).max(1);
        let new_h = ((self.height as f64 * factor) as u32).max(1);

        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or("Failed to create image from frame data")?;
        let resized =
            image::imageops::resize(&img, new_w, new_h, image::imageops::FilterType::Triangle);

        Ok(Frame::new(resized.into_raw(), new_w, new_h, 3, self.index))
    }

    /// Copies the pixels inside `location`, clamped to frame bounds.
    ///
    /// Returns `None` when nothing of the box lies inside the frame.
    pub fn crop(&self, location: &FaceLocation) -> Option<Frame> {
        let clamped = location.clamp(self.width, self.height);
        if clamped.is_empty() {
            return None;
        }

        let x1 = clamped.left as usize;
        let y1 = clamped.top as usize;
        let x2 = clamped.right as usize;
        let y2 = clamped.bottom as usize;
        let crop_w = x2 - x1;
        let crop_h = y2 - y1;
        let channels = self.channels as usize;
        let stride = self.width as usize * channels;

        let mut data = Vec::with_capacity(crop_w * crop_h * channels);
        for row in y1..y2 {
            let start = row * stride + x1 * channels;
            data.extend_from_slice(&self.data[start..start + crop_w * channels]);
        }

        Some(Frame::new(
            data,
            crop_w as u32,
            crop_h as u32,
            self.channels,
            self.index,
        ))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(x as u8);
                data.push(y as u8);
                data.push(0);
            }
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_data_mut_allows_modification() {
        let data = vec![0u8; 6]; // 2x1x3
        let mut frame = Frame::new(data, 2, 1, 3, 0);
        frame.data_mut()[0] = 255;
        assert_eq!(frame.data()[0], 255);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 3, 0);
    }

    #[test]
    fn test_is_empty_zero_area() {
        assert!(Frame::new(Vec::new(), 0, 10, 3, 0).is_empty());
        assert!(Frame::new(Vec::new(), 10, 0, 3, 0).is_empty());
        assert!(!Frame::new(vec![0u8; 3], 1, 1, 3, 0).is_empty());
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2, 3, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_as_ndarray_mut_modification() {
        let mut frame = Frame::new(vec![0u8; 12], 2, 2, 3, 0);
        {
            let mut arr = frame.as_ndarray_mut();
            arr[[0, 1, 2]] = 128;
        }
        assert_eq!(frame.as_ndarray()[[0, 1, 2]], 128);
    }

    #[test]
    fn test_scaled_half_dimensions() {
        let frame = Frame::new(vec![90u8; 64 * 48 * 3], 64, 48, 3, 7);
        let small = frame.scaled(0.5).unwrap();
        assert_eq!(small.width(), 32);
        assert_eq!(small.height(), 24);
        assert_eq!(small.index(), 7);
        // Uniform input stays uniform under bilinear filtering
        assert!(small.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_scaled_odd_dimensions_truncate() {
        let frame = Frame::new(vec![0u8; 5 * 3 * 3], 5, 3, 3, 0);
        let small = frame.scaled(0.5).unwrap();
        assert_eq!((small.width(), small.height()), (2, 1));
    }

    #[test]
    fn test_scaled_rejects_non_rgb() {
        let frame = Frame::new(vec![0u8; 4], 2, 2, 1, 0);
        assert!(frame.scaled(0.5).is_err());
    }

    #[test]
    fn test_crop_copies_region() {
        let frame = gradient_frame(10, 8);
        let crop = frame.crop(&FaceLocation::new(2, 7, 5, 3)).unwrap();
        assert_eq!(crop.width(), 4);
        assert_eq!(crop.height(), 3);
        let arr = crop.as_ndarray();
        assert_eq!(arr[[0, 0, 0]], 3); // x
        assert_eq!(arr[[0, 0, 1]], 2); // y
        assert_eq!(arr[[2, 3, 0]], 6);
        assert_eq!(arr[[2, 3, 1]], 4);
    }

    #[test]
    fn test_crop_clamps_to_frame() {
        let frame = gradient_frame(10, 10);
        let crop = frame.crop(&FaceLocation::new(-5, 20, 4, 8)).unwrap();
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 4);
    }

    #[test]
    fn test_crop_outside_frame_is_none() {
        let frame = gradient_frame(10, 10);
        assert!(frame.crop(&FaceLocation::new(20, 40, 30, 25)).is_none());
    }
}
