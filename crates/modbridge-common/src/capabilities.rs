//! Feature flags advertised by a session.

use bitflags::bitflags;

bitflags! {
    /// What a session's backend supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Rendering is driven by a tick clock (position in milliseconds).
        const TICK_CLOCK = 1 << 0;
        /// Rendering pulls frames straight from the backend (position in seconds).
        const FRAME_PULL = 1 << 1;
        /// Position can be retargeted.
        const SEEK = 1 << 2;
        /// Files may contain more than one subsong.
        const SUBSONGS = 1 << 3;
        /// Players honour a loop flag.
        const LOOP_FLAG = 1 << 4;
        /// Repeat count is configurable.
        const REPEAT_COUNT = 1 << 5;
        /// Companion files can be registered before loading.
        const AUX_FILES = 1 << 6;
    }
}
