//! Home-screen ("standalone") mode.
//!
//! When the page runs as an installed web app, plain link navigation would
//! leave the full-screen shell and open the system browser. Links are
//! intercepted instead: targeted links open a new window, everything else
//! replaces the current location.

/// Class added to `<body>` while running standalone.
pub const STANDALONE_CLASS: &str = "standalone";

/// What an intercepted link click should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// `window.open(href, target)`
    Open { href: String, target: String },
    /// `location = href`
    Navigate { href: String },
}

/// Decide the action for a link with the given `href` and `target`
/// attributes. A missing `href` navigates to the empty URL, as assigning
/// `null` to `location` would.
pub fn link_action(href: Option<&str>, target: Option<&str>) -> LinkAction {
    let href = href.unwrap_or_default().to_string();
    match target {
        Some(target) => LinkAction::Open {
            href,
            target: target.to_string(),
        },
        None => LinkAction::Navigate { href },
    }
}
