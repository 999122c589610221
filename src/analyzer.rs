use std::collections::{btree_map, BTreeMap};
use std::slice;

use bon::Builder;
use itertools::Itertools;
use log::{debug, warn};
use num::integer::binomial;
use num::{BigUint, ToPrimitive};

use crate::die::Die;
use crate::game::{Game, TrialTable};
use crate::value::Face;
use crate::{Error, Result, MAX_OUTCOMES};

#[derive(Clone, Copy, Debug, Builder)]
pub struct Options {
    #[builder(default = MAX_OUTCOMES)]
    max_outcomes: usize,
}

/// The faces shared by every die of a game, in ascending order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceDomain<T>
where
    T: Face,
{
    faces: Vec<T>,
}

/// Statistics over the current trial table of a [`Game`].
///
/// The analyzer borrows the game, so the game cannot be re-run while it is alive.
#[derive(Clone, Debug)]
pub struct Analyzer<'a, T>
where
    T: Face,
{
    table: &'a TrialTable<T>,
    domain: FaceDomain<T>,
    options: Options,
}

/// How often each face came up in each trial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable<T>
where
    T: Face,
{
    faces: Vec<T>,
    trials: Vec<usize>,
    counts: Vec<usize>,
}

/// Trials in which every die landed on the same face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jackpots<T>
where
    T: Face,
{
    table: FrequencyTable<T>,
    faces: Vec<T>,
}

/// Every enumerable outcome tuple with the number of trials that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeTable<T>
where
    T: Face,
{
    dice: usize,
    counts: BTreeMap<Vec<T>, usize>,
}

impl Options {
    #[must_use]
    pub fn max_outcomes(&self) -> usize {
        self.max_outcomes
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<T> FaceDomain<T>
where
    T: Face,
{
    /// Every die needs at least two faces, and all of them the faces of the first die.
    pub fn from_dice(dice: &[Die<T>]) -> Result<Self> {
        let first = dice.first().ok_or(Error::NoDice)?;
        for (i, die) in dice.iter().enumerate() {
            if die.len() < 2 {
                return Err(Error::EmptyDie {
                    die: i + 1,
                    faces: die.len(),
                });
            }
            if die.faces() != first.faces() {
                return Err(Error::MismatchedFaces { die: i + 1 });
            }
        }
        Ok(Self {
            faces: first.faces().to_vec(),
        })
    }

    #[must_use]
    pub fn faces(&self) -> &[T] {
        &self.faces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, face: &T) -> Option<usize> {
        self.faces.binary_search(face).ok()
    }

    #[must_use]
    pub fn contains(&self, face: &T) -> bool {
        self.index_of(face).is_some()
    }

    fn count(&self, row: &[T]) -> Vec<usize> {
        let mut counts = vec![0; self.faces.len()];
        for face in row {
            if let Some(i) = self.index_of(face) {
                counts[i] += 1;
            }
        }
        counts
    }
}

impl<'a, T> Analyzer<'a, T>
where
    T: Face,
{
    pub fn new(game: &'a Game<T>) -> Result<Self> {
        Self::with_options(game, Options::default())
    }

    pub fn with_options(game: &'a Game<T>, options: Options) -> Result<Self> {
        let table = game.table().ok_or(Error::NotPlayed)?;
        Self::for_table(game.dice(), table, options)
    }

    /// Analyzes a table that was not necessarily produced by a [`Game`].
    ///
    /// The table must have one column per die and only faces of the dice.
    pub fn for_table(dice: &[Die<T>], table: &'a TrialTable<T>, options: Options) -> Result<Self> {
        let domain = FaceDomain::from_dice(dice)?;
        if table.dice() != dice.len() {
            return Err(Error::ShapeMismatch {
                expected: dice.len(),
                found: table.dice(),
            });
        }
        if let Some(face) = table.rows().flatten().find(|f| !domain.contains(f)) {
            return Err(Error::InvalidFace(face.to_string()));
        }
        Ok(Self {
            table,
            domain,
            options,
        })
    }

    #[must_use]
    pub fn domain(&self) -> &FaceDomain<T> {
        &self.domain
    }

    #[must_use]
    pub fn table(&self) -> &'a TrialTable<T> {
        self.table
    }

    #[must_use]
    pub fn dice(&self) -> usize {
        self.table.dice()
    }

    pub fn face_count(&self) -> FrequencyTable<T> {
        let mut table = FrequencyTable::empty(self.domain.faces.clone());
        for (trial, row) in self.table.iter() {
            table.push(trial, self.domain.count(row));
        }
        debug!("counted faces over {} trials", table.len());
        table
    }

    pub fn jackpot(&self) -> Jackpots<T> {
        let dice = self.dice();
        let mut table = FrequencyTable::empty(self.domain.faces.clone());
        let mut faces = Vec::new();

        for (trial, row) in self.table.iter() {
            let counts = self.domain.count(row);
            if let Some(i) = counts.iter().position(|&c| c == dice) {
                faces.push(self.domain.faces[i].clone());
                table.push(trial, counts);
            }
        }
        debug!("{} jackpots in {} trials", faces.len(), self.table.len());

        Jackpots { table, faces }
    }

    /// Number of unordered outcomes: faces chosen dice-count times with repetition.
    #[must_use]
    pub fn combo_space(&self) -> BigUint {
        let n = self.domain.len() + self.dice() - 1;
        binomial(BigUint::from(n), BigUint::from(self.dice()))
    }

    #[must_use]
    pub fn permutation_space(&self) -> BigUint {
        num::pow(BigUint::from(self.domain.len()), self.dice())
    }

    /// Tallies trials by the multiset of faces they show, ignoring which die showed what.
    pub fn combo(&self) -> Result<OutcomeTable<T>> {
        let size = self.limit(self.combo_space())?;
        let counts = self
            .domain
            .faces
            .iter()
            .cloned()
            .combinations_with_replacement(self.dice())
            .map(|c| (c, 0))
            .collect();
        let mut outcomes = OutcomeTable::new(self.dice(), counts);
        debug_assert_eq!(outcomes.len(), size);

        for row in self.table.rows() {
            outcomes.tally(row.iter().cloned().sorted().collect_vec());
        }
        debug!("{} of {size} combinations rolled", outcomes.observed());
        Ok(outcomes)
    }

    /// Tallies trials by the exact sequence of faces.
    pub fn permutation(&self) -> Result<OutcomeTable<T>> {
        let size = self.limit(self.permutation_space())?;
        let counts = (0..self.dice())
            .map(|_| self.domain.faces.iter().cloned())
            .multi_cartesian_product()
            .map(|p| (p, 0))
            .collect();
        let mut outcomes = OutcomeTable::new(self.dice(), counts);
        debug_assert_eq!(outcomes.len(), size);

        for row in self.table.rows() {
            outcomes.tally(row.to_vec());
        }
        debug!("{} of {size} permutations rolled", outcomes.observed());
        Ok(outcomes)
    }

    fn limit(&self, size: BigUint) -> Result<usize> {
        let limit = self.options.max_outcomes;
        match size.to_usize() {
            Some(n) if n <= limit => Ok(n),
            _ => {
                warn!("refusing to enumerate {size} outcomes (limit {limit})");
                Err(Error::TooManyOutcomes { size, limit })
            }
        }
    }
}

impl<T> FrequencyTable<T>
where
    T: Face,
{
    fn empty(faces: Vec<T>) -> Self {
        Self {
            faces,
            trials: Vec::new(),
            counts: Vec::new(),
        }
    }

    fn push(&mut self, trial: usize, counts: Vec<usize>) {
        self.trials.push(trial);
        self.counts.extend(counts);
    }

    #[must_use]
    pub fn faces(&self) -> &[T] {
        &self.faces
    }

    /// 1-based trial numbers, ascending.
    #[must_use]
    pub fn trials(&self) -> &[usize] {
        &self.trials
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn rows(&self) -> slice::ChunksExact<'_, usize> {
        self.counts.chunks_exact(self.faces.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.trials.iter().copied().zip(self.rows())
    }

    #[must_use]
    pub fn row(&self, trial: usize) -> Option<&[usize]> {
        let i = self.trials.binary_search(&trial).ok()?;
        self.rows().nth(i)
    }

    #[must_use]
    pub fn get(&self, trial: usize, face: &T) -> Option<usize> {
        let j = self.faces.binary_search(face).ok()?;
        self.row(trial).map(|row| row[j])
    }

    /// Column sums: how often each face came up over all trials.
    #[must_use]
    pub fn totals(&self) -> Vec<usize> {
        let mut totals = vec![0; self.faces.len()];
        for row in self.rows() {
            for (t, c) in totals.iter_mut().zip(row) {
                *t += c;
            }
        }
        totals
    }
}

impl<T> Jackpots<T>
where
    T: Face,
{
    #[must_use]
    pub fn count(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn trials(&self) -> &[usize] {
        self.table.trials()
    }

    #[must_use]
    pub fn table(&self) -> &FrequencyTable<T> {
        &self.table
    }

    /// The face each jackpot landed on, parallel to [`Jackpots::trials`].
    #[must_use]
    pub fn faces(&self) -> &[T] {
        &self.faces
    }
}

impl<T> OutcomeTable<T>
where
    T: Face,
{
    fn new(dice: usize, counts: BTreeMap<Vec<T>, usize>) -> Self {
        Self { dice, counts }
    }

    fn tally(&mut self, outcome: Vec<T>) {
        if let Some(c) = self.counts.get_mut(&outcome) {
            *c += 1;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn dice(&self) -> usize {
        self.dice
    }

    /// Number of distinct outcomes that were rolled at least once.
    #[must_use]
    pub fn observed(&self) -> usize {
        self.counts.values().filter(|&&c| c > 0).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn get(&self, outcome: &[T]) -> Option<usize> {
        self.counts.get(outcome).copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Vec<T>, usize> {
        self.counts.iter()
    }

    pub fn rolled(&self) -> impl Iterator<Item = (&[T], usize)> {
        self.counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(k, c)| (k.as_slice(), *c))
    }

    #[must_use]
    pub fn most_common(&self) -> Option<(&[T], usize)> {
        self.rolled().max_by_key(|(_, c)| *c)
    }
}

impl<'a, T> IntoIterator for &'a OutcomeTable<T>
where
    T: Face,
{
    type Item = (&'a Vec<T>, &'a usize);
    type IntoIter = btree_map::Iter<'a, Vec<T>, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
