use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_settings::VideoSettings;
use crate::video::domain::video_writer::VideoWriter;

/// Encodes RGB frames to MPEG-4 video via ffmpeg-next.
///
/// The codec is MPEG-4 Part 2, carried in MP4 with the `mp4v` sample
/// entry; stock libavcodec builds encode it without extra codec
/// dependencies. Stills whose dimensions drift from the opened
/// settings are rescaled on the fly instead of rejected.
pub struct FfmpegWriter {
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: usize,
    stream_index: usize,
}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            octx: None,
            encoder: None,
            scaler: None,
            width: 0,
            height: 0,
            fps: 0,
            frame_count: 0,
            stream_index: 0,
        }
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        settings: &VideoSettings,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let fps = settings.fps.round() as i32;
        if fps < 1 {
            return Err(format!("invalid frame rate: {}", settings.fps).into());
        }

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(settings.width);
        encoder_ctx.set_height(settings.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);

        octx.write_header()?;

        // RGB -> YUV conversion at the opened dimensions
        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            settings.width,
            settings.height,
            ffmpeg_next::format::Pixel::YUV420P,
            settings.width,
            settings.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = Some(scaler);
        self.width = settings.width;
        self.height = settings.height;
        self.fps = fps;
        self.frame_count = 0;
        self.stream_index = 0; // sole stream of the output

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let encoder = self.encoder.as_mut().ok_or("FfmpegWriter: not opened")?;
        let scaler = self.scaler.as_mut().unwrap();
        let octx = self.octx.as_mut().unwrap();

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            frame.width(),
            frame.height(),
        );

        // Copy pixel rows, respecting the destination stride
        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data_mut(0);
        let row_len = frame.width() as usize * 3;
        for row in 0..frame.height() as usize {
            let dst_start = row * stride;
            data[dst_start..dst_start + row_len].copy_from_slice(frame.row(row));
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        if frame.width() == self.width && frame.height() == self.height {
            scaler.run(&rgb_frame, &mut yuv_frame)?;
        } else {
            log::warn!(
                "still {} is {}x{}, rescaling to {}x{}",
                frame.index(),
                frame.width(),
                frame.height(),
                self.width,
                self.height
            );
            let mut rescaler = ffmpeg_next::software::scaling::Context::get(
                ffmpeg_next::format::Pixel::RGB24,
                frame.width(),
                frame.height(),
                ffmpeg_next::format::Pixel::YUV420P,
                self.width,
                self.height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )?;
            rescaler.run(&rgb_frame, &mut yuv_frame)?;
        }
        yuv_frame.set_pts(Some(self.frame_count as i64));

        encoder.send_frame(&yuv_frame)?;

        let ost_time_base = octx.stream(self.stream_index).unwrap().time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.stream_index);
            encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
            encoded.write_interleaved(octx)?;
        }

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(ref mut encoder) = self.encoder {
            let octx = self.octx.as_mut().unwrap();
            let ost_time_base = octx.stream(self.stream_index).unwrap().time_base();

            // Flush delayed frames out of the encoder
            encoder.send_eof()?;
            let mut encoded = ffmpeg_next::Packet::empty();
            while encoder.receive_packet(&mut encoded).is_ok() {
                encoded.set_stream(self.stream_index);
                encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
                encoded.write_interleaved(octx)?;
            }

            octx.write_trailer()?;
            log::debug!("finalized video after {} frames", self.frame_count);
        }

        self.octx = None;
        self.encoder = None;
        self.scaler = None;

        Ok(())
    }
}
