/// One still of the sequence, decoded to packed RGB24.
///
/// Pixel data is contiguous row-major RGB with no padding between
/// rows. Conversion to and from codec-native formats happens at the
/// I/O boundaries; everything in between treats the bytes as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
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

    /// Position of this still in the sorted sequence, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pixel row `y` as a `width * 3` byte slice.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width as usize * 3;
        &self.data[y * stride..(y + 1) * stride]
    }
}
