//! Error types for the data model and persistence seams.
//!
//! Grounded on the teacher's `common::game::error::GameError`: the
//! authoritative style for new code is a `thiserror`-derived enum rather
//! than the `failure`-based form the teacher's legacy files still carry.

use thiserror::Error;

use crate::ids::{GameId, PlayerId};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no game with id {0}")]
    NoSuchGame(GameId),

    #[error("no player {1} in game {0}")]
    BotNotFound(GameId, PlayerId),

    #[error("location {0:?} is not on the map")]
    NoSuchLocation(crate::geometry::Location),

    #[error("no city named {0:?}")]
    NoSuchCity(String),

    #[error("segment endpoints {a:?}/{b:?} are not hex-adjacent")]
    SegmentNotAdjacent {
        a: crate::geometry::Location,
        b: crate::geometry::Location,
    },

    #[error("segment destination {0:?} is water")]
    SegmentIntoWater(crate::geometry::Location),

    #[error("segment endpoints {a:?}/{b:?} both belong to major city {city}")]
    SegmentWithinMajorCity {
        a: crate::geometry::Location,
        b: crate::geometry::Location,
        city: String,
    },

    #[error("a transient store error occurred: {0}")]
    Store(String),

    #[error("a fatal configuration error occurred: {0}")]
    Config(String),
}

pub type GameResult<T> = Result<T, GameError>;
