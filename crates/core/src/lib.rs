//! Core library for turning a folder of JPEG stills into an MP4 video.
//!
//! The pipeline is deliberately linear: scan and sort the stills,
//! probe the first one for the output dimensions, then decode and
//! append every still as one frame at a fixed 20 fps. Codec access
//! sits behind the `video::domain` traits; `video::infrastructure`
//! holds the ffmpeg-backed implementations.

pub mod pipeline;
pub mod sequence;
pub mod shared;
pub mod video;
