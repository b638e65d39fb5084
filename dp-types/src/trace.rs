use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// The predecessor direction(s) that produced a score.
    ///
    /// When several directions tie, all of them are set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TraceDirections: u8 {
        /// From the diagonal predecessor.
        const DIAGONAL = 1 << 0;
        /// From the vertical gap state (`current`), or an extended vertical gap (`up`).
        const UP = 1 << 1;
        /// A vertical gap opened from the cell's own `current`.
        const UP_OPEN = 1 << 2;
        /// From the horizontal gap state (`current`), or an extended horizontal gap (`left`).
        const LEFT = 1 << 3;
        /// A horizontal gap opened from the cell's own `current`.
        const LEFT_OPEN = 1 << 4;
        /// A vertical gap carried for free along a free leading column.
        const CARRY_UP_OPEN = 1 << 5;
        /// A horizontal gap carried for free along a free leading row.
        const CARRY_LEFT_OPEN = 1 << 6;
    }
}

impl TraceDirections {
    pub const NONE: Self = Self::empty();
}

/// The trace of a single DP cell: where `current`, `up` and `left` came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TraceCell {
    pub current: TraceDirections,
    pub up: TraceDirections,
    pub left: TraceDirections,
}

impl TraceCell {
    pub const NONE: Self = Self {
        current: TraceDirections::NONE,
        up: TraceDirections::NONE,
        left: TraceDirections::NONE,
    };
}

/// Shows the direction(s) of `current` as arrows, e.g. `↖↑`.
impl fmt::Display for TraceDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "N");
        }
        if self.contains(Self::DIAGONAL) {
            write!(f, "↖")?;
        }
        if self.intersects(Self::UP | Self::UP_OPEN | Self::CARRY_UP_OPEN) {
            write!(f, "↑")?;
        }
        if self.intersects(Self::LEFT | Self::LEFT_OPEN | Self::CARRY_LEFT_OPEN) {
            write!(f, "←")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_arrows() {
        assert_eq!(TraceDirections::NONE.to_string(), "N");
        assert_eq!(
            (TraceDirections::DIAGONAL | TraceDirections::LEFT).to_string(),
            "↖←"
        );
        assert_eq!(TraceDirections::UP_OPEN.to_string(), "↑");
    }
}
