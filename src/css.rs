//! Stylesheet post-processing pipeline configuration.
//!
//! The card's stylesheet is run through PostCSS at asset build time.
//! Vendor prefixing (`autoprefixer`) is always on so the prefixed transition
//! and transform properties the card probes for exist in the CSS; minifying
//! (`cssnano`) is added for production builds only. The `css-config` command
//! prints the result as a `.postcssrc.json` document.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Build environment, as named by `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildEnv {
    #[default]
    Development,
    Production,
}

impl FromStr for BuildEnv {
    type Err = std::convert::Infallible;

    /// Anything other than `production` counts as development.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim() == "production" {
            BuildEnv::Production
        } else {
            BuildEnv::Development
        })
    }
}

impl fmt::Display for BuildEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildEnv::Development => "development",
            BuildEnv::Production => "production",
        })
    }
}

/// Options passed through from the invoking build tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    /// Source map setting, forwarded untouched.
    pub map: Option<Value>,
    /// Custom parser module name.
    pub parser: Option<String>,
}

/// A PostCSS configuration document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssPipeline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    /// Plugin name → plugin options, in application order.
    pub plugins: Map<String, Value>,
}

impl CssPipeline {
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Pipeline for `env`: prefixing always, minification in production.
pub fn pipeline(env: BuildEnv, options: PipelineOptions) -> CssPipeline {
    let mut plugins = Map::new();
    plugins.insert("autoprefixer".into(), Value::Object(Map::new()));
    if env == BuildEnv::Production {
        plugins.insert("cssnano".into(), Value::Object(Map::new()));
    }
    CssPipeline {
        map: options.map,
        parser: options.parser,
        plugins,
    }
}
