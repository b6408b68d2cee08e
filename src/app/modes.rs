//! UI mode state type.
//!
//! [`UiMode`] is the state of the coordinator's state machine and the value the
//! rendering actor watches to decide what to draw.
//!
//! # State Machine
//!
//! ```text
//! Initializing ─▶ LoadingDirectories ─▶ Index ─▶ Confirm ─▶ Loading ─┐
//!                        ▲                │  ▲       │                │
//!                        └── page flip ───┘  └── no ─┘◀───────────────┘
//! ```

/// Current UI mode.
///
/// Stored in [`SharedState`](crate::app::SharedState) as its `u32` code so it can
/// live in an atomic cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiMode {
    /// Browsing pages and picking a directory.
    Index,

    /// Yes/no prompt for the selected directory.
    Confirm,

    /// The indexer is running on the coordinator thread.
    Loading,

    /// A page flip is in progress; doubles as a debounce window.
    LoadingDirectories,

    /// Startup, before the first page has been computed.
    Initializing,
}

impl UiMode {
    /// Stable numeric code used for atomic storage.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Index => 0,
            Self::Confirm => 1,
            Self::Loading => 2,
            Self::LoadingDirectories => 3,
            Self::Initializing => 0xff,
        }
    }

    /// Decodes a value written by [`UiMode::code`].
    ///
    /// Unknown codes decode to `Initializing`, which draws nothing.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Index,
            1 => Self::Confirm,
            2 => Self::Loading,
            3 => Self::LoadingDirectories,
            _ => Self::Initializing,
        }
    }

    /// Whether touches are interpreted in this mode.
    #[must_use]
    pub const fn accepts_touch(self) -> bool {
        matches!(self, Self::Index | Self::Confirm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for mode in [
            UiMode::Index,
            UiMode::Confirm,
            UiMode::Loading,
            UiMode::LoadingDirectories,
            UiMode::Initializing,
        ] {
            assert_eq!(UiMode::from_code(mode.code()), mode);
        }
        assert_eq!(UiMode::from_code(42), UiMode::Initializing);
    }
}
