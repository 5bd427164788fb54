use std::path::Path;

use crate::shared::frame::Frame;

/// Decodes one still image file into an RGB frame.
///
/// `index` is the position the still will occupy in the video; the
/// decoder stamps it onto the returned [`Frame`].
pub trait FrameDecoder {
    fn decode(&self, path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>>;
}
