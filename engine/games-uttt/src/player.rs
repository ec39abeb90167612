//! Players and game outcomes.

use std::fmt;

/// One of the two sides. Player One moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    /// Index into per-player arrays (0 or 1).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Player {
        if index & 1 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "X"),
            Player::Two => write!(f, "O"),
        }
    }
}

/// Game outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Winner {
    #[default]
    Ongoing,
    PlayerOne,
    PlayerTwo,
    Draw,
}

impl Winner {
    /// The win outcome for `player`.
    #[inline]
    pub const fn of(player: Player) -> Winner {
        match player {
            Player::One => Winner::PlayerOne,
            Player::Two => Winner::PlayerTwo,
        }
    }

    #[inline]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Winner::Ongoing)
    }

    /// The winning player, if the game was won outright.
    pub const fn player(self) -> Option<Player> {
        match self {
            Winner::PlayerOne => Some(Player::One),
            Winner::PlayerTwo => Some(Player::Two),
            Winner::Ongoing | Winner::Draw => None,
        }
    }

    /// Score of a decided game for `player`: 1.0 win, 0.0 loss, 0.5 draw.
    /// `None` while the game is still running.
    pub fn score_for(self, player: Player) -> Option<f32> {
        match self {
            Winner::Ongoing => None,
            Winner::Draw => Some(0.5),
            _ if self == Winner::of(player) => Some(1.0),
            _ => Some(0.0),
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Ongoing => write!(f, "ongoing"),
            Winner::PlayerOne => write!(f, "X wins"),
            Winner::PlayerTwo => write!(f, "O wins"),
            Winner::Draw => write!(f, "draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.other(), Player::One);
        assert_eq!(Player::from_index(Player::Two.index()), Player::Two);
    }

    #[test]
    fn test_score_for() {
        assert_eq!(Winner::Ongoing.score_for(Player::One), None);
        assert_eq!(Winner::Draw.score_for(Player::Two), Some(0.5));
        assert_eq!(Winner::PlayerOne.score_for(Player::One), Some(1.0));
        assert_eq!(Winner::PlayerOne.score_for(Player::Two), Some(0.0));
        assert_eq!(Winner::of(Player::Two).player(), Some(Player::Two));
        assert!(!Winner::Ongoing.is_decided());
    }
}
