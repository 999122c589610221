mod analyzer;
pub mod defs;
mod die;
mod game;
pub mod print;
mod value;

use num::BigUint;
use rand::distributions::WeightedError;
use thiserror::Error;

pub use analyzer::{Analyzer, FaceDomain, FrequencyTable, Jackpots, OutcomeTable, Options};
pub use die::{Die, Sampler};
pub use game::{Form, Game, History, NarrowRow, NarrowTable, TrialTable, View};
pub use value::{Face, Float, Value, Weight};

pub type Result<T> = ::core::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("face {0} is not on the die")]
    InvalidFace(String),
    #[error("invalid weight {0}: must be a finite non-negative number")]
    InvalidWeight(f64),
    #[error("invalid display form {0:?}: expected wide (1) or narrow (2)")]
    InvalidForm(String),
    #[error("a die needs at least one face")]
    NoFaces,
    #[error("die {die} has {faces} face(s)")]
    EmptyDie { die: usize, faces: usize },
    #[error("die {die} does not share the faces of die 1")]
    MismatchedFaces { die: usize },
    #[error("expected {expected} dice per trial, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("a game needs at least one die")]
    NoDice,
    #[error("number of trials must be positive")]
    NoTrials,
    #[error("the game has not been played")]
    NotPlayed,
    #[error("{size} outcomes exceed the enumeration limit of {limit}")]
    TooManyOutcomes { size: BigUint, limit: usize },
    #[error("cannot sample die: {0}")]
    Weights(#[from] WeightedError),
}

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const MAX_OUTCOMES: usize = 10_000_000;
