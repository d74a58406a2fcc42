use serde::{Deserialize, Serialize};

/// Axis of a split container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The opposite axis. Successive inserts alternate through this.
    pub fn flipped(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Focus-movement direction. Navigation is linear over the pre-order leaf
/// sequence: Left/Up step backwards, Right/Down step forwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_involutive() {
        assert_eq!(Orientation::Horizontal.flipped(), Orientation::Vertical);
        assert_eq!(Orientation::Horizontal.flipped().flipped(), Orientation::Horizontal);
    }

    #[test]
    fn direction_polarity() {
        assert!(Direction::Right.is_forward());
        assert!(Direction::Down.is_forward());
        assert!(!Direction::Left.is_forward());
        assert!(!Direction::Up.is_forward());
    }
}
