//! Repeat count semantics.

use std::fmt;

/// How many times a module plays past its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatCount {
    /// Loop forever; the session never reports the end.
    Infinite,
    /// Play `n` extra times after the first pass.
    Times(u32),
}

impl RepeatCount {
    /// No repeats.
    pub const ONCE: RepeatCount = RepeatCount::Times(0);

    /// Decode the host convention: `-1` (or any negative) infinite, `n >= 0`
    /// extra plays.
    pub fn from_raw(raw: i32) -> Self {
        u32::try_from(raw).map_or(RepeatCount::Infinite, RepeatCount::Times)
    }

    /// Encode back to the host convention.
    pub fn to_raw(self) -> i32 {
        match self {
            RepeatCount::Infinite => -1,
            RepeatCount::Times(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    /// Whether playback never ends.
    pub fn is_infinite(self) -> bool {
        self == RepeatCount::Infinite
    }
}

impl Default for RepeatCount {
    fn default() -> Self {
        RepeatCount::ONCE
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatCount::Infinite => f.write_str("infinite"),
            RepeatCount::Times(n) => write!(f, "{n} extra"),
        }
    }
}
