//! Vendor-prefixing plugins.
//!
//! Each plugin adds one prefixed variant before the standard form and is
//! gated by the browser versions that made the prefix unnecessary. A variant
//! that already sits next to the standard form is not added again, so running
//! the catalog twice leaves the tree unchanged.

mod at_rule;
mod declaration;

use vendorize_core::{DisableMap, PluginModule};

pub use at_rule::prefix_at_rule;
pub use declaration::prefix_declaration;

/// `@keyframes` for WebKit/Blink and Gecko.
pub fn keyframes() -> PluginModule {
    vec![
        prefix_at_rule(
            "keyframes",
            "-webkit-",
            DisableMap::new()
                .since("chrome", 43.0)
                .since("safari", 9.0)
                .since("opera", 30.0)
                .since("android", 4.4),
        ),
        prefix_at_rule("keyframes", "-moz-", DisableMap::new().since("firefox", 16.0)),
    ]
}

/// `transition` for WebKit/Blink.
pub fn transition() -> PluginModule {
    vec![prefix_declaration(
        "transition",
        "-webkit-",
        DisableMap::new()
            .since("chrome", 26.0)
            .since("safari", 6.1)
            .since("android", 4.4),
    )]
}

/// Every plugin module in this crate.
pub fn default_plugins() -> Vec<PluginModule> {
    vec![keyframes(), transition()]
}
