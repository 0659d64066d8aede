//! Integer status codes used across the call boundary.

/// Operation succeeded.
pub const STATUS_OK: i32 = 0;

/// Operation failed; see the log for the reason.
pub const STATUS_ERROR: i32 = -1;

/// Result of one `compute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The block was rendered and the song continues.
    Playing,
    /// The song ended (or nothing is loaded); the block may be partial.
    Ended,
}

impl RenderStatus {
    /// `0` while playing, `1` once ended.
    pub fn code(self) -> i32 {
        match self {
            RenderStatus::Playing => 0,
            RenderStatus::Ended => 1,
        }
    }

    /// Whether the song has ended.
    pub fn is_ended(self) -> bool {
        self == RenderStatus::Ended
    }
}

/// Collapse a result into [`STATUS_OK`] / [`STATUS_ERROR`].
pub fn status_code<T, E>(result: &Result<T, E>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(_) => STATUS_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(RenderStatus::Playing.code(), 0);
        assert_eq!(RenderStatus::Ended.code(), 1);
        assert!(RenderStatus::Ended.is_ended());
        assert_eq!(status_code::<(), ()>(&Ok(())), STATUS_OK);
        assert_eq!(status_code::<(), ()>(&Err(())), STATUS_ERROR);
    }
}
