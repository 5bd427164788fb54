use std::path::PathBuf;
use std::process;

use clap::Parser;

use stillreel_core::pipeline::encode_sequence_use_case::{EncodeSequenceUseCase, ProgressFn};
use stillreel_core::sequence::image_set::ImageSet;
use stillreel_core::shared::constants::OUTPUT_EXTENSION;
use stillreel_core::video::domain::frame_decoder::FrameDecoder;
use stillreel_core::video::domain::video_writer::VideoWriter;
use stillreel_core::video::infrastructure::ffmpeg_frame_decoder::FfmpegFrameDecoder;
use stillreel_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;

/// Printed on stdout when the required arguments are missing.
const USAGE_HINT: &str = "args: output name, input folder";

/// Turn a folder of .jpeg stills into an MP4 video.
///
/// There are no flags: every argument is a plain value, so a leading
/// hyphen never triggers help output.
#[derive(Parser)]
#[command(name = "stillreel", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Base name of the output video; ".mp4" is appended.
    #[arg(allow_hyphen_values = true)]
    output_name: Option<String>,

    /// Folder holding the .jpeg stills.
    #[arg(allow_hyphen_values = true)]
    input_folder: Option<PathBuf>,

    /// Anything further is accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    _extra: Vec<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (Some(output_name), Some(input_folder)) = (cli.output_name, cli.input_folder) else {
        println!("{USAGE_HINT}");
        return Ok(());
    };

    let set = ImageSet::scan(&input_folder)?;
    for name in set.names() {
        println!("{name}");
    }
    log::info!("{} stills found in {}", set.len(), input_folder.display());

    let output = PathBuf::from(format!("{output_name}.{OUTPUT_EXTENSION}"));

    let decoder: Box<dyn FrameDecoder> = Box::new(FfmpegFrameDecoder::new());
    let writer: Box<dyn VideoWriter> = Box::new(FfmpegWriter::new());

    let total = set.len();
    let progress: ProgressFn = Box::new(move |current, _| {
        eprint!("\rEncoding frame {current}/{total}");
    });

    let mut use_case = EncodeSequenceUseCase::new(decoder, writer, Some(progress));
    use_case.execute(&set, &output)?;
    eprintln!();
    log::info!("Output written to {}", output.display());

    Ok(())
}
