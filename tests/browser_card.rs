//! Browser tests: the wasm card running in headless Chrome.
//!
//! Needs `wasm-pack` on PATH. Run with: `cargo test --test browser_card -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};
use std::thread::sleep;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

const CARD_TOML: &str = "\
show_duration = 600
fade_duration = 150
cover_timeout = 300
";
const RELOAD_TOML: &str = "\
show_duration = 600
fade_duration = 150
cover_timeout = 300
auto_reload = 1500
";

/// (file, width, height); `missing.svg` is never written.
const IMAGES: &[(&str, u32, u32)] = &[
    ("a.svg", 1600, 1000),
    ("b.svg", 800, 1200),
    ("c.svg", 1200, 1000),
    ("d.svg", 1500, 1000),
    ("missing.svg", 1000, 1000),
];

/// Runs before the card: records warnings, picturefill calls, setup
/// errors, page loads and focus changes on the image elements.
const INSTRUMENT: &str = r#"<script>
window.__gallo = { warnings: [], picturefill: [], errors: [], focus: {} };
const warn = console.warn.bind(console);
console.warn = (...args) => { window.__gallo.warnings.push(args.join(" ")); warn(...args); };
window.picturefill = (o) => window.__gallo.picturefill.push({ reevaluate: o.reevaluate, elements: o.elements.length });
window.addEventListener("unhandledrejection", (e) => window.__gallo.errors.push(String(e.reason)));
sessionStorage.galloLoads = String(Number(sessionStorage.galloLoads || 0) + 1);
new MutationObserver((records) => {
  for (const r of records) {
    if (r.target.tagName !== "IMG") continue;
    const had = (r.oldValue || "").split(" ").includes("focus");
    const has = r.target.classList.contains("focus");
    if (had === has) continue;
    const i = Array.from(r.target.parentNode.children).indexOf(r.target);
    const f = window.__gallo.focus[i] || (window.__gallo.focus[i] = { on: 0, off: 0 });
    if (has) f.on += 1; else f.off += 1;
  }
}).observe(document.body, { subtree: true, attributes: true, attributeFilter: ["class"], attributeOldValue: true });
</script>"#;

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/browser/generated")
}

fn svg(width: u32, height: u32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect width="100%" height="100%" fill="#888"/></svg>"##
    )
}

fn images_json() -> String {
    let images: Vec<Value> = IMAGES
        .iter()
        .map(|(url, width, height)| {
            serde_json::json!({ "previews": [{ "url": url, "width": width, "height": height }] })
        })
        .collect();
    serde_json::to_string(&images).unwrap()
}

fn render_page(dir: &Path, config: &str, name: &str, edit: impl Fn(String) -> String) {
    let bin = env!("CARGO_BIN_EXE_gallo-card");
    let config_path = dir.join(format!("{name}.toml"));
    std::fs::write(&config_path, config).unwrap();
    let output = Command::new(bin)
        .args([
            "page",
            "--images",
            dir.join("images.json").to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
            "--script",
            "./pkg/gallo_card.js",
        ])
        .output()
        .expect("failed to run gallo-card");
    assert!(
        output.status.success(),
        "page generation failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains("<body>"), "page has no <body>");
    let html = edit(html).replacen("<body>", &format!("<body>{INSTRUMENT}"), 1);
    std::fs::write(dir.join(format!("{name}.html")), html).unwrap();
}

fn ensure_fixtures_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let dir = generated_dir();
        if dir.exists() {
            std::fs::remove_dir_all(&dir).expect("failed to clean output dir");
        }
        std::fs::create_dir_all(&dir).unwrap();

        let status = Command::new("wasm-pack")
            .current_dir(&root)
            .args(["build", "--dev", "--target", "web", "--out-dir"])
            .arg(dir.join("pkg"))
            .status()
            .expect("failed to run wasm-pack");
        assert!(status.success(), "wasm build failed");

        for (file, width, height) in IMAGES.iter().filter(|(f, ..)| *f != "missing.svg") {
            std::fs::write(dir.join(file), svg(*width, *height)).unwrap();
        }
        std::fs::write(dir.join("images.json"), images_json()).unwrap();

        render_page(&dir, CARD_TOML, "index", |html| html);
        render_page(&dir, CARD_TOML, "no-cover", |html| {
            html.replace(r#"<div class="cover"></div>"#, "")
        });
        render_page(&dir, RELOAD_TOML, "reload", |html| html);
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            // ES module and wasm fetches from file:// URLs
            args: vec![OsStr::new("--allow-file-access-from-files")],
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load(page: &str) -> Arc<Tab> {
    ensure_fixtures_built();
    let tab = browser().new_tab().unwrap();
    let file = generated_dir().join(page);
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

/// Evaluate `js` and decode its JSON-stringified result.
fn eval(tab: &Tab, js: &str) -> Value {
    let json = tab
        .evaluate(&format!("JSON.stringify({js})"), false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned");
    serde_json::from_str(json.as_str().expect("result is not a string")).unwrap()
}

fn wait_until(tab: &Tab, js: &str) {
    let deadline = Instant::now() + Duration::from_secs(20);
    while eval(tab, js) != Value::Bool(true) {
        assert!(Instant::now() < deadline, "timed out waiting for: {js}");
        sleep(Duration::from_millis(100));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn cover_fades_out_and_images_cycle() {
    let tab = load("index.html");
    wait_until(&tab, "document.querySelector('.cover').classList.contains('transparent')");
    wait_until(
        &tab,
        "(c => !c.contains('transparent') && !c.contains('hidden'))\
         (document.querySelector('.images').classList)",
    );
    wait_until(&tab, "document.querySelector('.images img.focus') !== null");

    let count = eval(&tab, "document.querySelectorAll('.images img').length");
    assert_eq!(count, IMAGES.len());
    let transform = eval(&tab, "document.querySelector('.images').style.cssText");
    assert!(
        transform.as_str().unwrap_or_default().contains("translate3d"),
        "strip never moved: {transform}"
    );
}

#[test]
#[ignore]
fn focus_is_released_on_every_lap() {
    let tab = load("index.html");
    // the first image comes round again on the second lap
    wait_until(&tab, "(window.__gallo.focus[0] || { on: 0 }).on >= 2");
    sleep(Duration::from_millis(800));

    let focus = eval(&tab, "window.__gallo.focus");
    let entries = focus.as_object().expect("focus log is not an object");
    assert!(!entries.is_empty());
    for (index, f) in entries {
        let on = f["on"].as_u64().unwrap();
        let off = f["off"].as_u64().unwrap();
        assert!(
            on == off || on == off + 1,
            "image {index} focused {on} times but released {off} times"
        );
    }
    assert!(entries["0"]["off"].as_u64().unwrap() >= 1);
}

#[test]
#[ignore]
fn picturefill_receives_every_image_once() {
    let tab = load("index.html");
    wait_until(&tab, "document.querySelectorAll('.images img').length > 0");
    let calls = eval(&tab, "window.__gallo.picturefill");
    assert_eq!(
        calls,
        serde_json::json!([{ "reevaluate": true, "elements": IMAGES.len() }])
    );
}

#[test]
#[ignore]
fn failed_image_is_reported() {
    let tab = load("index.html");
    wait_until(
        &tab,
        "window.__gallo.warnings.some(w => w.includes('failed to load') && w.includes('missing.svg'))",
    );
    // the other images still lift the cover
    wait_until(&tab, "document.querySelector('.cover').classList.contains('transparent')");
}

#[test]
#[ignore]
fn missing_cover_aborts_setup() {
    let tab = load("no-cover.html");
    wait_until(&tab, "window.__gallo.errors.length > 0");
    let errors = eval(&tab, "window.__gallo.errors");
    assert!(
        errors[0].as_str().unwrap_or_default().contains(".cover element not found"),
        "unexpected errors: {errors}"
    );
    assert_eq!(eval(&tab, "document.querySelectorAll('.images img').length"), 0);
}

#[test]
#[ignore]
fn page_reloads_after_auto_reload() {
    let tab = load("reload.html");
    wait_until(&tab, "Number(sessionStorage.galloLoads) >= 2");
}
