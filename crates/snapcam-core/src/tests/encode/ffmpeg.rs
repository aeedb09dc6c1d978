use crate::{
    CaptureError, EncoderFactory, EncoderParams, FfmpegEncoderFactory, FourCc,
    encode::codec_args,
};

/// WHAT: Supported tags map to ffmpeg codecs
/// WHY: AVI players rely on the container tag matching the stream
#[test]
fn given_supported_tags_when_mapping_then_codec_and_tag() {
    assert_eq!(codec_args(FourCc(*b"XVID")), Some(("mpeg4", Some("XVID"))));
    assert_eq!(codec_args(FourCc(*b"DIVX")), Some(("mpeg4", Some("DIVX"))));
    assert_eq!(codec_args(FourCc(*b"FMP4")), Some(("mpeg4", Some("FMP4"))));
    assert_eq!(codec_args(FourCc(*b"MJPG")), Some(("mjpeg", None)));
}

/// WHAT: Unknown tags are rejected when opening
/// WHY: An unsupported codec is an open failure, not a silent fallback
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_codec_when_opening_then_sink_open_failed() {
    // Given: Parameters with an unmapped codec
    let dir = tempfile::tempdir().unwrap();
    let params = EncoderParams {
        codec: FourCc(*b"H264"),
        ..EncoderParams::for_resolution(8, 6)
    };

    // When: Opening an encoder
    let result = FfmpegEncoderFactory::default().open(&dir.path().join("x.avi"), &params);

    // Then: Open fails before ffmpeg is spawned
    assert!(matches!(result, Err(CaptureError::SinkOpenFailed { .. })));
    assert_eq!(codec_args(FourCc(*b"H264")), None);
}

/// WHAT: An unwritable output path fails to open
/// WHY: The recording flag must stay off when no file can be written
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_directory_when_opening_then_sink_open_failed() {
    // Given: A path inside a directory that does not exist
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("x.avi");

    // When: Opening an encoder
    let result =
        FfmpegEncoderFactory::default().open(&path, &EncoderParams::for_resolution(8, 6));

    // Then: Open fails
    assert!(matches!(result, Err(CaptureError::SinkOpenFailed { .. })));
}

/// WHAT: A failed encoder start leaves no empty file behind
/// WHY: Retrying a recording without ffmpeg must not litter the output folder
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_ffmpeg_when_opening_then_no_output_file_left() {
    // Given: A factory pointing at a nonexistent executable
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Video_2024_01_01-00-00-00.avi");
    let factory = FfmpegEncoderFactory::new(dir.path().join("no-such-ffmpeg"));

    // When: Opening an encoder twice
    let first = factory.open(&path, &EncoderParams::for_resolution(8, 6));
    let second = factory.open(&path, &EncoderParams::for_resolution(8, 6));

    // Then: Both fail and the output directory stays empty
    assert!(matches!(first, Err(CaptureError::SinkOpenFailed { .. })));
    assert!(matches!(second, Err(CaptureError::SinkOpenFailed { .. })));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// WHAT: An encoder that floods its log keeps accepting frames
/// WHY: The encoder's log output is never drained, so it must not be able to
/// block frame writes on the capture thread
#[cfg(unix)]
#[test]
#[allow(clippy::unwrap_used)]
fn given_encoder_flooding_its_log_when_writing_many_frames_then_writes_complete() {
    use std::os::unix::fs::PermissionsExt;

    // Given: A stand-in encoder that writes 256 KiB to stderr, then drains stdin
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("chatty-ffmpeg");
    std::fs::write(
        &script,
        "#!/bin/sh\nhead -c 262144 /dev/zero >&2\ncat > /dev/null\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    let params = EncoderParams::for_resolution(64, 48);
    let mut encoder = FfmpegEncoderFactory::new(&script)
        .open(&dir.path().join("clip.avi"), &params)
        .unwrap();
    let frame = crate::Frame::new(64, 48);

    // When: Writing far more frame data than a pipe buffer holds
    for _ in 0..40 {
        encoder.write_frame(&frame).unwrap();
    }
    let finished = encoder.finish();

    // Then: Every write returned and the encoder closed cleanly
    assert!(finished.is_ok());
    assert!(!encoder.is_open());
}

/// WHAT: FourCc renders as its four characters
/// WHY: Tags appear in logs and errors
#[test]
fn given_fourcc_when_formatted_then_plain_text() {
    assert_eq!(FourCc(*b"XVID").to_string(), "XVID");
    assert_eq!(format!("{:?}", FourCc(*b"MJPG")), "FourCc(MJPG)");
    assert_eq!(FourCc([0xff, 0, 0, 0]).as_str(), "????");
}

/// WHAT: Frames written through ffmpeg produce a non-empty AVI
/// WHY: Exercises the real encoder process end to end
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_ffmpeg_installed_when_writing_frames_then_avi_written() {
    // Given: A real ffmpeg encoder
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.avi");
    let params = EncoderParams::for_resolution(64, 48);
    let mut encoder = FfmpegEncoderFactory::default().open(&path, &params).unwrap();
    let frame = crate::Frame::from_pixel(64, 48, image::Rgb([200, 100, 50]));

    // When: Writing a second of frames and finishing
    for _ in 0..30 {
        encoder.write_frame(&frame).unwrap();
    }
    encoder.finish().unwrap();

    // Then: The file has content and the encoder is closed
    assert!(!encoder.is_open());
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

/// WHAT: A frame of the wrong size is rejected without closing the stream
/// WHY: Size mismatches are per-frame failures
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_ffmpeg_installed_when_writing_wrong_size_then_frame_write_failed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.avi");
    let mut encoder = FfmpegEncoderFactory::default()
        .open(&path, &EncoderParams::for_resolution(64, 48))
        .unwrap();

    let result = encoder.write_frame(&crate::Frame::new(32, 24));

    assert!(matches!(result, Err(CaptureError::FrameWriteFailed { .. })));
    assert!(encoder.is_open());
    encoder.finish().unwrap();
}
