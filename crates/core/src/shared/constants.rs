/// Playback rate of the produced video, in frames per second.
pub const FRAME_RATE: f64 = 20.0;

/// Suffix an entry must carry to join the sequence. Byte-exact:
/// `.JPEG` and `.jpg` do not qualify.
pub const IMAGE_SUFFIX: &str = ".jpeg";

/// Container extension appended to the output base name.
pub const OUTPUT_EXTENSION: &str = "mp4";
