//! Host page rendering.
//!
//! The card expects a pre-rendered document: a `.cover` element, an empty
//! `.images` container that starts out transparent and hidden, the
//! `window.Gallo` page global, and a module script that loads the browser
//! build and calls `present()`. [`render`] produces that document.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.

use crate::config::{CardConfig, PageGlobal};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/card.css");

/// Knobs of the generated document that are not presentation options.
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    /// URL of the wasm-bindgen JS glue for the browser build.
    pub script: String,
    /// Optional cover image URL.
    pub cover: Option<String>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Gallo".to_string(),
            script: "./pkg/gallo_card.js".to_string(),
            cover: None,
        }
    }
}

/// CSS custom properties carrying the configured durations.
pub fn generate_timing_css(config: &CardConfig) -> String {
    format!(
        r#":root {{
    --fade-duration: {fade}ms;
    --show-duration: {show}ms;
}}"#,
        fade = config.presentation.fade_duration,
        show = config.presentation.show_duration,
    )
}

/// JSON for `window.Gallo`, safe to embed in an inline `<script>`.
pub fn page_global_json(config: &CardConfig) -> serde_json::Result<String> {
    let json = serde_json::to_string(&PageGlobal::for_card(config))?;
    Ok(json.replace("</", "<\\/"))
}

pub fn render(config: &CardConfig, options: &PageOptions) -> serde_json::Result<Markup> {
    let css = format!("{}\n\n{}", generate_timing_css(config), CSS_STATIC);
    let global = page_global_json(config)?;
    let bootstrap = format!(
        "import init, {{ present }} from {};\ninit().then(() => present());",
        serde_json::to_string(&options.script)?
    );
    let cover_style = options
        .cover
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?
        .map(|url| format!("background-image: url({url})"));

    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="apple-mobile-web-app-capable" content="yes";
                title { (options.title) }
                style { (PreEscaped(css)) }
            }
            body {
                div.cover style=[cover_style] {}
                div.images.transparent.hidden {}
                script { (PreEscaped(format!("window.Gallo = {global};"))) }
                script type="module" { (PreEscaped(bootstrap)) }
            }
        }
    })
}
