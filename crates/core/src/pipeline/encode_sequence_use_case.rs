use std::path::Path;

use crate::sequence::image_set::ImageSet;
use crate::shared::constants::IMAGE_SUFFIX;
use crate::shared::video_settings::VideoSettings;
use crate::video::domain::frame_decoder::FrameDecoder;
use crate::video::domain::video_writer::VideoWriter;

/// Progress callback: `(stills_encoded, total_stills)`.
pub type ProgressFn = Box<dyn Fn(usize, usize)>;

/// Linear encode pipeline: probe the first still for the output
/// dimensions, open the writer, then decode and append every still in
/// set order.
pub struct EncodeSequenceUseCase {
    decoder: Box<dyn FrameDecoder>,
    writer: Box<dyn VideoWriter>,
    progress: Option<ProgressFn>,
}

impl EncodeSequenceUseCase {
    pub fn new(
        decoder: Box<dyn FrameDecoder>,
        writer: Box<dyn VideoWriter>,
        progress: Option<ProgressFn>,
    ) -> Self {
        Self {
            decoder,
            writer,
            progress,
        }
    }

    /// Encodes `set` into `output` and returns the settings the video
    /// was opened with.
    ///
    /// The output is finalized only after every still went through; a
    /// decode or write failure mid-sequence propagates immediately and
    /// leaves the file unfinished.
    pub fn execute(
        &mut self,
        set: &ImageSet,
        output: &Path,
    ) -> Result<VideoSettings, Box<dyn std::error::Error>> {
        let first = set.first().ok_or_else(|| {
            format!("no {} images found in {}", IMAGE_SUFFIX, set.dir().display())
        })?;

        let probe = self.decoder.decode(&set.path_of(first), 0)?;
        let settings = VideoSettings::from_probe(probe.width(), probe.height());
        log::info!("probed {}x{} from {first}", settings.width, settings.height);

        self.writer.open(output, &settings)?;

        let total = set.len();
        for (index, name) in set.names().iter().enumerate() {
            let frame = self.decoder.decode(&set.path_of(name), index)?;
            self.writer.write(&frame)?;
            log::debug!("appended {name} as frame {index}");
            if let Some(ref progress) = self.progress {
                progress(index + 1, total);
            }
        }

        self.writer.close()?;
        log::info!("encoded {total} stills into {}", output.display());

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // --- Stubs ---

    struct StubDecoder {
        dims: Vec<(u32, u32)>,
        fail_on: Option<usize>,
        calls: Arc<Mutex<Vec<(PathBuf, usize)>>>,
    }

    impl StubDecoder {
        /// `dims[i]` sizes the frame produced for still `i`; the last
        /// entry repeats for any stills beyond it.
        fn new(dims: Vec<(u32, u32)>) -> Self {
            Self {
                dims,
                fail_on: None,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing_on(mut self, index: usize) -> Self {
            self.fail_on = Some(index);
            self
        }
    }

    impl FrameDecoder for StubDecoder {
        fn decode(&self, path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
            if self.fail_on == Some(index) {
                return Err("decode failed".into());
            }
            self.calls.lock().unwrap().push((path.to_path_buf(), index));
            let (w, h) = self.dims[index.min(self.dims.len() - 1)];
            Ok(Frame::new(vec![0; (w * h * 3) as usize], w, h, index))
        }
    }

    #[derive(Default)]
    struct WriterLog {
        opened: Option<(PathBuf, VideoSettings)>,
        written: Vec<(u32, u32, usize)>,
        closed: bool,
    }

    struct StubWriter {
        log: Arc<Mutex<WriterLog>>,
        fail_on_write: Option<usize>,
    }

    impl StubWriter {
        fn new() -> Self {
            Self {
                log: Arc::new(Mutex::new(WriterLog::default())),
                fail_on_write: None,
            }
        }

        fn failing_on(mut self, index: usize) -> Self {
            self.fail_on_write = Some(index);
            self
        }
    }

    impl VideoWriter for StubWriter {
        fn open(
            &mut self,
            path: &Path,
            settings: &VideoSettings,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.log.lock().unwrap().opened = Some((path.to_path_buf(), settings.clone()));
            Ok(())
        }

        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_on_write == Some(frame.index()) {
                return Err("write failed".into());
            }
            self.log
                .lock()
                .unwrap()
                .written
                .push((frame.width(), frame.height(), frame.index()));
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.log.lock().unwrap().closed = true;
            Ok(())
        }
    }

    // --- Helpers ---

    fn set_of(names: &[&str]) -> (TempDir, ImageSet) {
        let tmp = TempDir::new().unwrap();
        for name in names {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let set = ImageSet::scan(tmp.path()).unwrap();
        (tmp, set)
    }

    // --- Tests ---

    #[test]
    fn test_encodes_every_still_in_sorted_order() {
        let (_tmp, set) = set_of(&["b.jpeg", "a.jpeg", "c.jpeg"]);
        let decoder = StubDecoder::new(vec![(4, 2)]);
        let calls = decoder.calls.clone();
        let writer = StubWriter::new();
        let log = writer.log.clone();

        let mut uc = EncodeSequenceUseCase::new(Box::new(decoder), Box::new(writer), None);
        uc.execute(&set, Path::new("out.mp4")).unwrap();

        // probe decodes the first still, then the loop revisits it
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls[0].0.ends_with("a.jpeg"));
        let loop_names: Vec<_> = calls[1..]
            .iter()
            .map(|(path, _)| path.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(loop_names, ["a.jpeg", "b.jpeg", "c.jpeg"]);

        let log = log.lock().unwrap();
        let indices: Vec<_> = log.written.iter().map(|&(_, _, i)| i).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert!(log.closed);
    }

    #[test]
    fn test_probe_settings_come_from_first_still() {
        let (_tmp, set) = set_of(&["a.jpeg", "b.jpeg"]);
        let decoder = StubDecoder::new(vec![(640, 480)]);
        let writer = StubWriter::new();
        let log = writer.log.clone();

        let mut uc = EncodeSequenceUseCase::new(Box::new(decoder), Box::new(writer), None);
        let settings = uc.execute(&set, Path::new("clip.mp4")).unwrap();

        assert_eq!(settings, VideoSettings::from_probe(640, 480));
        let log = log.lock().unwrap();
        let (path, opened) = log.opened.clone().unwrap();
        assert_eq!(path, Path::new("clip.mp4"));
        assert_eq!(opened, settings);
    }

    #[test]
    fn test_empty_set_fails_before_opening_writer() {
        let (_tmp, set) = set_of(&[]);
        let writer = StubWriter::new();
        let log = writer.log.clone();

        let mut uc = EncodeSequenceUseCase::new(
            Box::new(StubDecoder::new(vec![(4, 2)])),
            Box::new(writer),
            None,
        );
        let result = uc.execute(&set, Path::new("out.mp4"));

        assert!(result.is_err());
        let log = log.lock().unwrap();
        assert!(log.opened.is_none());
        assert!(!log.closed);
    }

    #[test]
    fn test_decode_failure_leaves_output_unfinished() {
        let (_tmp, set) = set_of(&["a.jpeg", "b.jpeg", "c.jpeg"]);
        let decoder = StubDecoder::new(vec![(4, 2)]).failing_on(1);
        let writer = StubWriter::new();
        let log = writer.log.clone();

        let mut uc = EncodeSequenceUseCase::new(Box::new(decoder), Box::new(writer), None);
        let result = uc.execute(&set, Path::new("out.mp4"));

        assert!(result.is_err());
        let log = log.lock().unwrap();
        assert_eq!(log.written.len(), 1);
        assert!(!log.closed);
    }

    #[test]
    fn test_write_failure_leaves_output_unfinished() {
        let (_tmp, set) = set_of(&["a.jpeg", "b.jpeg"]);
        let writer = StubWriter::new().failing_on(0);
        let log = writer.log.clone();

        let mut uc = EncodeSequenceUseCase::new(
            Box::new(StubDecoder::new(vec![(4, 2)])),
            Box::new(writer),
            None,
        );
        let result = uc.execute(&set, Path::new("out.mp4"));

        assert!(result.is_err());
        let log = log.lock().unwrap();
        assert!(log.opened.is_some());
        assert!(log.written.is_empty());
        assert!(!log.closed);
    }

    #[test]
    fn test_dimension_drift_is_passed_through() {
        let (_tmp, set) = set_of(&["a.jpeg", "b.jpeg"]);
        let decoder = StubDecoder::new(vec![(4, 2), (2, 2)]);
        let writer = StubWriter::new();
        let log = writer.log.clone();

        let mut uc = EncodeSequenceUseCase::new(Box::new(decoder), Box::new(writer), None);
        uc.execute(&set, Path::new("out.mp4")).unwrap();

        // the writer decides how to handle drifting dimensions
        let log = log.lock().unwrap();
        assert_eq!(log.opened.as_ref().unwrap().1, VideoSettings::from_probe(4, 2));
        assert_eq!(log.written, [(4, 2, 0), (2, 2, 1)]);
    }

    #[test]
    fn test_progress_reports_each_still() {
        let (_tmp, set) = set_of(&["a.jpeg", "b.jpeg", "c.jpeg"]);
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = reported.clone();
        let progress: ProgressFn = Box::new(move |done, total| {
            sink.lock().unwrap().push((done, total));
        });

        let mut uc = EncodeSequenceUseCase::new(
            Box::new(StubDecoder::new(vec![(4, 2)])),
            Box::new(StubWriter::new()),
            Some(progress),
        );
        uc.execute(&set, Path::new("out.mp4")).unwrap();

        assert_eq!(*reported.lock().unwrap(), [(1, 3), (2, 3), (3, 3)]);
    }
}
