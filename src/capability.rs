//! Vendor-prefix probing for CSS transitions and transforms.
//!
//! Older engines only expose prefixed style properties. The probes walk a
//! fixed preference table and return the first candidate the host style
//! object knows about; the host supplies the lookup.

/// Style property → transition-end event name, in preference order.
pub const TRANSITION_EVENTS: &[(&str, &str)] = &[
    ("transition", "transitionend"),
    ("OTransition", "oTransitionEnd"),
    ("MozTransition", "transitionend"),
    ("WebkitTransition", "webkitTransitionEnd"),
];

/// Style property → CSS property name used in `cssText`, in preference order.
pub const TRANSFORMS: &[(&str, &str)] = &[
    ("transform", "transform"),
    ("WebkitTransform", "-webkit-transform"),
    ("msTransform", "-ms-transform"),
    ("MozTransform", "-moz-transform"),
    ("OTransform", "-o-transform"),
];

fn first_supported(
    table: &'static [(&'static str, &'static str)],
    supports: impl Fn(&str) -> bool,
) -> Option<&'static str> {
    table
        .iter()
        .find(|(property, _)| supports(property))
        .map(|&(_, value)| value)
}

/// Name of the event fired when a CSS transition finishes.
///
/// Falls back to the unprefixed `transitionend` when nothing matches.
pub fn transition_end_event(supports: impl Fn(&str) -> bool) -> &'static str {
    first_supported(TRANSITION_EVENTS, supports).unwrap_or("transitionend")
}

/// CSS property name to write transforms under.
///
/// Falls back to the unprefixed `transform` when nothing matches.
pub fn transform_property(supports: impl Fn(&str) -> bool) -> &'static str {
    first_supported(TRANSFORMS, supports).unwrap_or("transform")
}
