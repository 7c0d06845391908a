//! Codec configuration.
//!
//! Every encode/decode entry point has a convenience form using
//! [`CodecConfig::default`] and a `_with` form taking an explicit config.
//! There is no process-wide mutable state: callers that need `$comment`
//! retention or different limits build a config and thread it through.

use crate::{MAX_BYTES, MAX_DEPTH};

/// Options threaded through every codec call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Retain `$comment` keys through encode, decode, and the JSON layer.
    /// When false (the default) they are stripped on every path.
    pub preserve_comments: bool,
    /// Container nesting allowed during encode and decode, counted per
    /// recursive container entry.
    pub max_depth: usize,
    /// Aggregate allocation allowed per top-level decode. Checked against
    /// the input length up front and as a running total while decoding.
    pub max_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            preserve_comments: false,
            max_depth: MAX_DEPTH,
            max_bytes: MAX_BYTES,
        }
    }
}

impl CodecConfig {
    /// The default configuration with `$comment` retention switched on.
    pub fn preserving_comments() -> Self {
        CodecConfig {
            preserve_comments: true,
            ..Self::default()
        }
    }
}
