pub mod ffmpeg_frame_decoder;
pub mod ffmpeg_writer;
