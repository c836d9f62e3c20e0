// Aggregate configuration: defaults, TOML loading, cross-section validation

use drishti_pipeline::DrishtiConfig;
use std::path::PathBuf;

#[test]
fn test_defaults_match_deployed_profile() {
    let config = DrishtiConfig::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.camera.device_index, 0);
    assert_eq!(config.camera.resolution, (640, 480));
    assert_eq!(config.camera.focus_settle_ms, 500);
    assert_eq!(config.camera.warmup_ms, 2000);

    assert!(config.recording.enabled);
    assert_eq!(config.recording.framerate, 20);

    assert_eq!(config.detection.timeout_secs, 10);
    assert!(!config.detection.accept_invalid_certs);

    assert_eq!(config.speech.retry.max_attempts, 3);
    assert_eq!(config.speech.retry.pause_ms, 1000);

    assert_eq!(config.pipeline.frame_queue_capacity, 1);
    assert_eq!(config.pipeline.speech_queue_capacity, 5);
    assert_eq!(config.pipeline.capture_interval_ms, 1000);
}

#[test]
fn test_load_full_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drishti.toml");
    std::fs::write(
        &path,
        r#"
[camera]
device_index = 1
resolution = [1280, 720]
focus_settle_ms = 300

[recording]
enabled = false
raw_path = "/var/lib/drishti/session_raw.h264"
output_path = "/var/lib/drishti/session.mp4"
framerate = 30

[detection]
endpoint = "https://vision.example.com/api/v1/image-to-text"
timeout_secs = 20
accept_invalid_certs = true
min_confidence = 0.4

[speech]
voice = "en-us"
rate_wpm = 170

[speech.retry]
max_attempts = 5
pause_ms = 500

[pipeline]
capture_interval_ms = 500
supervise_workers = false
"#,
    )
    .unwrap();

    let config = DrishtiConfig::load(&path).unwrap();
    assert_eq!(config.camera.device_index, 1);
    assert_eq!(config.camera.device_path(), "/dev/video1");
    assert_eq!(config.camera.resolution, (1280, 720));
    assert!(!config.recording.enabled);
    assert_eq!(
        config.recording.raw_path,
        PathBuf::from("/var/lib/drishti/session_raw.h264")
    );
    assert!(config.detection.accept_invalid_certs);
    assert_eq!(config.detection.min_confidence, 0.4);
    assert_eq!(config.speech.voice, "en-us");
    assert_eq!(config.speech.retry.max_attempts, 5);
    assert_eq!(config.pipeline.capture_interval_ms, 500);
    assert!(!config.pipeline.supervise_workers);
}

#[test]
fn test_partial_toml_keeps_defaults_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drishti.toml");
    std::fs::write(&path, "[speech]\nrate_wpm = 200\n").unwrap();

    let config = DrishtiConfig::load(&path).unwrap();
    assert_eq!(config.speech.rate_wpm, 200);
    assert_eq!(config.speech.voice, "en");
    assert_eq!(config.pipeline.frame_queue_capacity, 1);
    assert_eq!(config.detection.timeout_secs, 10);
}

#[test]
fn test_validation_covers_every_section() {
    let mut config = DrishtiConfig::default();
    config.camera.resolution = (0, 480);
    assert!(config.validate().is_err());

    let mut config = DrishtiConfig::default();
    config.recording.framerate = 0;
    assert!(config.validate().is_err());

    let mut config = DrishtiConfig::default();
    config.detection.endpoint = "not-a-url".to_string();
    assert!(config.validate().is_err());

    let mut config = DrishtiConfig::default();
    config.speech.retry.max_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = DrishtiConfig::default();
    config.pipeline.shutdown_grace_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drishti.toml");
    std::fs::write(&path, "[detection]\nendpoint = \"ftp://wrong\"\n").unwrap();
    assert!(DrishtiConfig::load(&path).is_err());
}

#[test]
fn test_load_rejects_broken_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drishti.toml");
    std::fs::write(&path, "[camera\ndevice_index = 1").unwrap();
    assert!(DrishtiConfig::load(&path).is_err());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let path = PathBuf::from("/nonexistent/drishti.toml");
    assert!(DrishtiConfig::load(&path).is_err());
}
