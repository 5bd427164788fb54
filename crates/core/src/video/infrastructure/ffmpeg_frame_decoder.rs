use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::frame_decoder::FrameDecoder;

/// Decodes stills through ffmpeg (libavformat + libavcodec).
///
/// Noticeably faster than pure-Rust JPEG decoding for camera-sized
/// captures, and keeps decode and encode on the same media backend.
pub struct FfmpegFrameDecoder;

impl FfmpegFrameDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfmpegFrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder for FfmpegFrameDecoder {
    fn decode(&self, path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("no image data found")?;
        let stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            if let Some(frame) = receive_rgb(&mut decoder, &mut scaler, width, height, index)? {
                return Ok(frame);
            }
        }

        // Some formats hold the picture back until the decoder is flushed.
        let _ = decoder.send_eof();
        receive_rgb(&mut decoder, &mut scaler, width, height, index)?
            .ok_or_else(|| format!("failed to decode image {}", path.display()).into())
    }
}

fn receive_rgb(
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    index: usize,
) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
    let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
    if decoder.receive_frame(&mut decoded).is_ok() {
        let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&decoded, &mut rgb)?;
        let pixels = packed_rgb(&rgb, width, height);
        Ok(Some(Frame::new(pixels, width, height, index)))
    } else {
        Ok(None)
    }
}

/// Strips the per-row padding ffmpeg may leave after each scanline.
fn packed_rgb(rgb: &ffmpeg_next::util::frame::video::Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb.stride(0);
    let data = rgb.data(0);
    let row_len = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_len]);
    }
    pixels
}
