//! FFmpeg command building and execution for stitching final videos.

use std::path::{Path, PathBuf};

use crate::brand::overlay_coordinates;

/// Error type for FFmpeg operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("nothing to stitch")]
    NoInputs,
}

/// Brand watermark burned into the stitched output.
#[derive(Debug, Clone)]
pub struct WatermarkSpec {
    pub image_path: PathBuf,
    pub position: String,
    pub opacity: f64,
}

/// Body of a concat-demuxer list file, one `file '...'` line per clip.
///
/// Single quotes inside paths are escaped the way the demuxer expects.
pub fn build_concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|p| {
            let escaped = p.to_string_lossy().replace('\'', r"'\''");
            format!("file '{escaped}'\n")
        })
        .collect()
}

/// Arguments for stitching the clips named in `list_path` into `output`.
///
/// Without a watermark the streams are copied. With one, the video is
/// re-encoded with the overlay applied and audio (if any) is copied.
pub fn build_stitch_args(
    list_path: &Path,
    output: &Path,
    watermark: Option<&WatermarkSpec>,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list_path.to_string_lossy().into_owned(),
    ];

    match watermark {
        None => {
            args.extend(["-c".into(), "copy".into()]);
        }
        Some(wm) => {
            let filter = format!(
                "[1:v]format=rgba,colorchannelmixer=aa={opacity:.2}[wm];[0:v][wm]overlay={xy}[out]",
                opacity = wm.opacity.clamp(0.0, 1.0),
                xy = overlay_coordinates(&wm.position),
            );
            args.extend([
                "-i".into(),
                wm.image_path.to_string_lossy().into_owned(),
                "-filter_complex".into(),
                filter,
                "-map".into(),
                "[out]".into(),
                "-map".into(),
                "0:a?".into(),
                "-c:v".into(),
                "libx264".into(),
                "-preset".into(),
                "veryfast".into(),
                "-pix_fmt".into(),
                "yuv420p".into(),
                "-c:a".into(),
                "copy".into(),
            ]);
        }
    }

    args.extend(["-movflags".into(), "+faststart".into()]);
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Run `ffmpeg` with the given arguments.
pub async fn run_ffmpeg(args: &[String]) -> Result<(), FfmpegError> {
    let output = tokio::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error"])
        .args(args)
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;

    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}

/// Write the concat list into `work_dir` and stitch `clips` into `output`.
pub async fn stitch_clips(
    work_dir: &Path,
    clips: &[PathBuf],
    output: &Path,
    watermark: Option<&WatermarkSpec>,
) -> Result<(), FfmpegError> {
    if clips.is_empty() {
        return Err(FfmpegError::NoInputs);
    }
    let list_path = work_dir.join("concat.txt");
    tokio::fs::write(&list_path, build_concat_list(clips)).await?;
    run_ffmpeg(&build_stitch_args(&list_path, output, watermark)).await
}
