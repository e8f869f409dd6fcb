use ndarray::ArrayView3;

/// A single camera frame: contiguous RGB or RGBA bytes in row-major order.
///
/// Format conversion happens at the frame-source boundary; the detection
/// layer reads pixels through [`Frame::pixel`] and never touches alpha.
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
        debug_assert!(channels == 3 || channels == 4, "channels must be 3 or 4");
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

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Frame-source sequence number.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True for frames that carry no usable pixels (e.g. a video element
    /// that has not been sized yet). The detection loop skips these.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// RGB triple at `(x, y)`. Alpha, if present, is ignored.
    ///
    /// Callers must stay in bounds; the scanner clips its windows before
    /// sampling.
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height);
        let offset =
            (y as usize * self.width as usize + x as usize) * self.channels as usize;
        (
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        )
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
