use crate::shared::constants::FRAME_RATE;

/// Fixed parameters the output video is opened with.
///
/// Width and height come from decoding the first still of the
/// sequence; the frame rate is always [`FRAME_RATE`].
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl VideoSettings {
    /// Settings derived from the probed dimensions of the first still.
    pub fn from_probe(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fps: FRAME_RATE,
        }
    }
}
