//! Nickname decoration rules
//!
//! A decorated nickname is the undecorated one prefixed with a marker and a
//! space: `"Alex"` -> `"🔴 Alex"`. Stripping is purely textual and is only
//! used to recover decorations that have no history record behind them.

/// Default marker placed in front of a live member's nickname
pub const DEFAULT_LIVE_MARKER: &str = "🔴";

/// Discord's nickname length limit, in characters
pub const MAX_NICKNAME_CHARS: usize = 32;

/// Longest marker that still leaves room for the space and one name character
pub const MAX_MARKER_CHARS: usize = MAX_NICKNAME_CHARS - 2;

/// Applies and recognizes the live marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorator {
    marker: String,
}

impl Default for Decorator {
    fn default() -> Self {
        Self::new(DEFAULT_LIVE_MARKER)
    }
}

impl Decorator {
    /// Create a decorator for the given marker. Surrounding whitespace is ignored.
    pub fn new(marker: impl Into<String>) -> Self {
        let marker: String = marker.into();
        let marker = marker.trim();
        Self {
            marker: if marker.is_empty() {
                DEFAULT_LIVE_MARKER.to_string()
            } else {
                marker.to_string()
            },
        }
    }

    /// The marker text
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Build the decorated nickname, truncated to the platform limit
    pub fn decorate(&self, name: &str) -> String {
        let decorated = format!("{} {}", self.marker, name.trim());
        if decorated.chars().count() <= MAX_NICKNAME_CHARS {
            decorated
        } else {
            decorated.chars().take(MAX_NICKNAME_CHARS).collect()
        }
    }

    /// Whether a nickname carries the marker
    pub fn is_decorated(&self, nickname: &str) -> bool {
        nickname.trim_start().starts_with(&self.marker)
    }

    /// Remove every leading marker.
    ///
    /// Returns `None` when nothing but markers remain, meaning the nickname
    /// should be cleared.
    pub fn strip(&self, nickname: &str) -> Option<String> {
        let mut rest = nickname.trim_start();
        while let Some(stripped) = rest.strip_prefix(self.marker.as_str()) {
            rest = stripped.trim_start();
        }
        let rest = rest.trim_end();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}
