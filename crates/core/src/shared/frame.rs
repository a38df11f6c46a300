use ndarray::ArrayView3;

/// A single sampled image: contiguous RGB bytes in row-major order.
///
/// `index` is the position of the frame in its source (bundle record or
/// demuxed stream), kept for logging only.
#[derive(Clone, Debug, PartialEq)]
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

    /// A zero-sized frame. Produced by crops that fall outside the image.
    pub fn empty(channels: u8, index: usize) -> Self {
        Self::new(Vec::new(), 0, 0, channels, index)
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

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the `width × height` window at `(x, y)` into a new frame.
    ///
    /// The window is intersected with the frame bounds first, so the result
    /// may be smaller than requested or empty. Never panics.
    pub fn crop(&self, x: i32, y: i32, width: i32, height: i32) -> Frame {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + width.max(0) as i64).min(self.width as i64);
        let y1 = (y as i64 + height.max(0) as i64).min(self.height as i64);
        if x1 <= x0 || y1 <= y0 {
            return Frame::empty(self.channels, self.index);
        }

        let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);
        let channels = self.channels as usize;
        let row_len = self.width as usize * channels;
        let mut out = Vec::with_capacity((x1 - x0) * (y1 - y0) * channels);
        for row in y0..y1 {
            let start = row * row_len + x0 * channels;
            let end = row * row_len + x1 * channels;
            out.extend_from_slice(&self.data[start..end]);
        }
        Frame::new(
            out,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
            self.channels,
            self.index,
        )
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
