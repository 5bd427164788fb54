pub mod frame_decoder;
pub mod video_writer;
