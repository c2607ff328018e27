//! The game aggregate: status and turn order.

use serde::{Deserialize, Serialize};

use crate::ids::{GameId, PlayerId};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Setup,
    InitialBuild,
    Active,
    Completed,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Game {
    pub id: GameId,
    pub status: GameStatus,
    pub current_seat_index: usize,
    pub seat_count: usize,
    pub winner: Option<PlayerId>,
}

impl Game {
    pub fn new(id: GameId, seat_count: usize) -> Self {
        Self {
            id,
            status: GameStatus::Setup,
            current_seat_index: 0,
            seat_count,
            winner: None,
        }
    }

    pub fn advance_seat(&mut self) {
        self.current_seat_index = (self.current_seat_index + 1) % self.seat_count.max(1);
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, GameStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_seat_wraps_around() {
        let mut g = Game::new(GameId::new(), 3);
        g.current_seat_index = 2;
        g.advance_seat();
        assert_eq!(g.current_seat_index, 0);
    }
}
