use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_settings::VideoSettings;

/// Appends frames to a growing video file.
///
/// The pipeline only ever drives one writer through one
/// open/write.../close cycle; implementations hide the codec and
/// container behind it.
pub trait VideoWriter {
    /// Creates (or overwrites) the output file and writes the
    /// container header.
    fn open(
        &mut self,
        path: &Path,
        settings: &VideoSettings,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Drains the encoder and writes the trailer. A file is only
    /// playable once this has succeeded.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
