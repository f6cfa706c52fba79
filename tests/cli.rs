//! Runs the `gallo-card` binary against fixture files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

const IMAGES: &str = r#"[
  { "previews": [
      { "url": "a-640.jpg", "width": 640, "height": 400 },
      { "url": "a-1600.jpg", "width": 1600, "height": 1000 } ] },
  { "previews": [ { "url": "b.jpg", "width": 500, "height": 1000 } ] },
  { "previews": [ { "url": "c.jpg", "width": 1200, "height": 1000 } ] }
]"#;

fn gallo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gallo-card"))
        .args(args)
        .env_remove("NODE_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run gallo-card")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let images = write(tmp.path(), "images.json", IMAGES);
    (tmp, images)
}

#[test]
fn check_accepts_valid_inputs() {
    let (_tmp, images) = fixture();
    let out = stdout(&gallo(&["check", "--images", images.to_str().unwrap()]));
    assert!(out.starts_with("3 images\n"));
    assert!(out.contains("    load wait count: 3"));
    assert!(out.contains("==> Card is valid"));
}

#[test]
fn check_applies_config_overrides() {
    let (tmp, images) = fixture();
    let config = write(tmp.path(), "card.toml", "show_duration = 8000\n");
    let out = stdout(&gallo(&[
        "check",
        "--images",
        images.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]));
    assert!(out.contains("    show: 8000ms"));
    assert!(out.contains("    fade: 2000ms"));
}

#[test]
fn check_rejects_unknown_config_keys() {
    let (tmp, images) = fixture();
    let config = write(tmp.path(), "card.toml", "show_durration = 8000\n");
    let output = gallo(&[
        "check",
        "--images",
        images.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("show_durration"));
}

#[test]
fn check_rejects_image_without_previews() {
    let tmp = TempDir::new().unwrap();
    let images = write(tmp.path(), "images.json", r#"[{ "previews": [] }]"#);
    let output = gallo(&["check", "--images", images.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn plan_is_deterministic_for_a_seed() {
    let (_tmp, images) = fixture();
    let args = [
        "plan",
        "--images",
        images.to_str().unwrap(),
        "--viewport",
        "1000x800",
        "--seed",
        "42",
    ];
    let first = stdout(&gallo(&args));
    let second = stdout(&gallo(&args));
    assert_eq!(first, second);
    assert!(first.starts_with("Viewport 1000x800, width budget 22500px\n"));
    assert!(first.contains("Provisioned 3 images"));
    assert!(first.contains("portrait 400px (40vw)"));
}

#[test]
fn plan_rejects_bad_viewport() {
    let (_tmp, images) = fixture();
    let output = gallo(&["plan", "--images", images.to_str().unwrap(), "--viewport", "wide"]);
    assert!(!output.status.success());
}

#[test]
fn simulate_walks_the_state_machine() {
    let (_tmp, images) = fixture();
    let out = stdout(&gallo(&[
        "simulate",
        "--images",
        images.to_str().unwrap(),
        "--seed",
        "1",
        "--events",
        "cover-timeout,image-load,image-load,image-load,cover-timeout,cover-faded,images-faded",
    ]));
    assert!(out.starts_with("start\n    effect: cover timeout in 10000ms\n"));
    assert!(out.contains("none → coverTimedOut"));
    assert!(out.contains("coverTimedOut → fadingOutCover"));
    assert!(out.contains("rejected: invalid transition: coverTimeout from fadingOutCover"));
    assert!(out.contains("fadingOutCover → fadingInImages"));
    assert!(out.contains("fadingInImages → imagesShowing"));
}

#[test]
fn simulate_rejects_unknown_events() {
    let (_tmp, images) = fixture();
    let output = gallo(&[
        "simulate",
        "--images",
        images.to_str().unwrap(),
        "--events",
        "cover-timeout,explode",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("explode"));
}

#[test]
fn page_embeds_the_card() {
    let (tmp, images) = fixture();
    let target = tmp.path().join("index.html");
    stdout(&gallo(&[
        "page",
        "--images",
        images.to_str().unwrap(),
        "--title",
        "Lobby",
        "--reload-after-cycle",
        "--output",
        target.to_str().unwrap(),
    ]));
    let html = fs::read_to_string(target).unwrap();
    assert!(html.contains("<title>Lobby</title>"));
    assert!(html.contains(r#""auto_reload":15000"#));
    assert!(html.contains(r#"<div class="images transparent hidden">"#));
}

#[test]
fn auth_url_for_token_fragment() {
    let out = stdout(&gallo(&["auth-url", &format!("#token={TOKEN}")]));
    assert_eq!(out.trim(), format!("/auth?token={TOKEN}"));
}

#[test]
fn auth_url_without_token_fails() {
    let output = gallo(&["auth-url", "#section"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn css_config_per_environment() {
    let dev: serde_json::Value = serde_json::from_str(&stdout(&gallo(&["css-config"]))).unwrap();
    assert_eq!(dev["plugins"], serde_json::json!({ "autoprefixer": {} }));

    let output = Command::new(env!("CARGO_BIN_EXE_gallo-card"))
        .arg("css-config")
        .env("NODE_ENV", "production")
        .output()
        .unwrap();
    let prod: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(prod["plugins"].get("cssnano").is_some());
}

#[test]
fn gen_config_round_trips_through_check() {
    let (tmp, images) = fixture();
    let stock = stdout(&gallo(&["gen-config"]));
    let config = write(tmp.path(), "card.toml", &stock);
    stdout(&gallo(&[
        "check",
        "--images",
        images.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]));
}
