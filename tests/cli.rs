//! Exit-status and stream contract of the kokoro-tts binary.

use std::process::{Command, Output};

use kokoro_tts::audio::{SpeechAudio, decode_wav};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE_URL: &str = "http://127.0.0.1:9/models/hexgrad/Kokoro-82M";

fn kokoro() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kokoro-tts"));
    cmd.env_remove("KOKORO_API_URL")
        .env_remove("HUGGINGFACE_API_KEY")
        .env_remove("KOKORO_CACHE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    kokoro().args(args).output().unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn empty_text_exits_one() {
    let output = run(&["", "af_bella", "--no-cache", "--api-url", UNREACHABLE_URL]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Text cannot be empty"));
    assert!(output.stdout.is_empty());
}

#[test]
fn long_text_exits_one() {
    let text = "a".repeat(501);
    let output = run(&[text.as_str(), "af_bella", "--no-cache", "--api-url", UNREACHABLE_URL]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Text too long"));
    assert!(output.stdout.is_empty());
}

#[test]
fn speed_out_of_range_exits_one() {
    for speed in ["0.4", "2.5", "-1"] {
        let output = run(&["Hello", "af_bella", speed, "--no-cache"]);

        assert_eq!(output.status.code(), Some(1), "speed {speed}");
        assert!(stderr(&output).contains("Speed must be between 0.5 and 2.0"));
    }
}

#[test]
fn non_numeric_speed_exits_one() {
    let output = run(&["Hello", "af_bella", "fast"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_arguments_print_usage() {
    for args in [&[][..], &["Hello"][..]] {
        let output = run(args);

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Usage"));
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn help_exits_zero() {
    let output = run(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn unreachable_backend_exits_one_without_output() {
    let output = run(&[
        "Hello there",
        "af_bella",
        "--no-cache",
        "--timeout",
        "2",
        "--api-url",
        UNREACHABLE_URL,
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("Failed to generate audio"));
}

#[test]
fn list_voices_goes_to_stdout() {
    let output = run(&["--list-voices", "--gender", "neutral"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NARRATOR -> am_michael"));
    assert!(!stdout.contains("WARRIOR_DEEP"));
}

#[test]
fn clean_cache_on_missing_dir_succeeds() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let dir = temp_dir.path().join("audio");

    let output = run(&["--clean-cache", "--cache-dir", dir.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("Removed 0 cached file(s)"));
}

#[tokio::test]
async fn valid_input_writes_wav_to_stdout() {
    let server = MockServer::start().await;
    let wav = SpeechAudio::new(vec![0.0, 0.5, -0.5, 0.25], 24000)
        .to_wav_bytes()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/models/hexgrad/Kokoro-82M"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/hexgrad/Kokoro-82M"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/models/hexgrad/Kokoro-82M", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run(&["Welcome, traveler", "NARRATOR", "1.2", "--no-cache", "--api-url", &url])
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let audio = decode_wav(&output.stdout).unwrap();
    assert_eq!(audio.sample_rate, 24000);
    assert_eq!(audio.samples.len(), 4);

    let log = stderr(&output);
    assert!(log.contains("Loading Kokoro model"));
    assert!(log.contains("Generating audio for: 'Welcome, traveler...'"));
}

#[tokio::test]
async fn pcm_format_writes_raw_samples() {
    let server = MockServer::start().await;
    let wav = SpeechAudio::new(vec![0.0, 1.0, -1.0], 24000)
        .to_wav_bytes()
        .unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav))
        .mount(&server)
        .await;

    let url = format!("{}/models/hexgrad/Kokoro-82M", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run(&["Hi", "af_sky", "--format", "pcm", "--no-cache", "--api-url", &url])
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(output.stdout.len(), 6);
    assert_eq!(i16::from_le_bytes([output.stdout[2], output.stdout[3]]), i16::MAX);
}

#[tokio::test]
async fn backend_returning_non_audio_exits_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![101_u8, 0, 0, 0, 102, 0, 0, 0]))
        .mount(&server)
        .await;

    let url = format!("{}/models/hexgrad/Kokoro-82M", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run(&["Hi", "af_sky", "--no-cache", "--api-url", &url])
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("unsupported format"));
}

fn model_url(server: &MockServer) -> String {
    format!("{}/models/hexgrad/Kokoro-82M", server.uri())
}

async fn mount_kokoro(server: &MockServer, wav: Vec<u8>, syntheses: u64) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav))
        .expect(syntheses)
        .mount(server)
        .await;
}

fn speech_wav() -> Vec<u8> {
    SpeechAudio::new(vec![0.0, 0.5, -0.5, 0.25], 24000)
        .to_wav_bytes()
        .unwrap()
}

async fn run_blocking(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run(&args)
    })
    .await
    .unwrap()
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

#[tokio::test]
async fn health_reports_healthy_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = model_url(&server);
    let output = run_blocking(owned(&["--health", "--api-url", &url])).await;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "healthy");
    assert_eq!(report["service"], "Kokoro TTS");
    assert!(report["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn health_reports_unhealthy_json_and_exits_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = model_url(&server);
    let output = run_blocking(owned(&["--health", "--api-url", &url])).await;

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "unhealthy");
    assert_eq!(report["service"], "Kokoro TTS");
}

#[tokio::test]
async fn output_flag_writes_file_and_leaves_stdout_empty() {
    let server = MockServer::start().await;
    mount_kokoro(&server, speech_wav(), 1).await;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let out = temp_dir.path().join("out.wav");
    let url = model_url(&server);
    let output = run_blocking(owned(&[
        "Hello there",
        "af_bella",
        "--no-cache",
        "-o",
        out.to_str().unwrap(),
        "--api-url",
        &url,
    ]))
    .await;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("Audio saved to"));

    let audio = decode_wav(&std::fs::read(&out).unwrap()).unwrap();
    assert_eq!(audio.samples.len(), 4);
}

#[tokio::test]
async fn wav_output_is_backend_file_unchanged() {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in [0_i32, 1_000_000, -1_000_000, 8_388_607] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    let backend_wav = cursor.into_inner();

    let server = MockServer::start().await;
    mount_kokoro(&server, backend_wav.clone(), 1).await;

    let url = model_url(&server);
    let output = run_blocking(owned(&["Hi", "af_sky", "--no-cache", "--api-url", &url])).await;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(output.stdout, backend_wav);
}

#[tokio::test]
async fn second_run_is_served_from_cache_dir() {
    let server = MockServer::start().await;
    mount_kokoro(&server, speech_wav(), 1).await;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let cache_dir = temp_dir.path().join("audio");
    let url = model_url(&server);
    let args = owned(&[
        "Hello again",
        "af_bella",
        "--cache-dir",
        cache_dir.to_str().unwrap(),
        "--api-url",
        &url,
    ]);

    let first = run_blocking(args.clone()).await;
    assert_eq!(first.status.code(), Some(0), "stderr: {}", stderr(&first));
    assert!(!stderr(&first).contains("Audio found in cache"));

    let second = run_blocking(args).await;
    assert_eq!(second.status.code(), Some(0), "stderr: {}", stderr(&second));
    assert!(stderr(&second).contains("Audio found in cache"));
    assert_eq!(second.stdout, first.stdout);
}

#[tokio::test]
async fn unwritable_cache_dir_still_succeeds() {
    let server = MockServer::start().await;
    mount_kokoro(&server, speech_wav(), 1).await;

    // A regular file where the cache directory's parent should be
    let temp_dir = tempfile::TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let cache_dir = blocker.join("audio");

    let url = model_url(&server);
    let output = run_blocking(owned(&[
        "Hello",
        "af_bella",
        "--cache-dir",
        cache_dir.to_str().unwrap(),
        "--api-url",
        &url,
    ]))
    .await;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Could not write audio cache"));
    assert!(decode_wav(&output.stdout).is_ok());
}
