use std::iter::StepBy;
use std::slice;
use std::str::FromStr;

use log::{debug, trace};
use rand::{thread_rng, RngCore};

use crate::die::Die;
use crate::value::Face;
use crate::{Error, Result};

/// Outcomes of a played game: one row per trial, one column per die.
///
/// Trials are numbered from 1 in the order they were rolled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrialTable<T>
where
    T: Face,
{
    dice: usize,
    faces: Vec<T>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Form {
    #[default]
    Wide,
    Narrow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View<'a, T>
where
    T: Face,
{
    Wide(&'a TrialTable<T>),
    Narrow(NarrowTable<T>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NarrowRow<T> {
    pub trial: usize,
    pub die: usize,
    pub face: T,
}

/// Melted trial table, one row per (die, trial), grouped by die.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrowTable<T>
where
    T: Face,
{
    rows: Vec<NarrowRow<T>>,
}

/// A fixed set of dice rolled together, trial after trial.
///
/// Only the most recent run is kept; see [`History`] to keep older tables around.
#[derive(Clone, Debug)]
pub struct Game<T>
where
    T: Face,
{
    dice: Vec<Die<T>>,
    table: Option<TrialTable<T>>,
}

/// Opt-in record of trial tables.
#[derive(Clone, Debug)]
pub struct History<T>
where
    T: Face,
{
    tables: Vec<TrialTable<T>>,
}

impl<T> TrialTable<T>
where
    T: Face,
{
    /// Builds a table from rows of equal, non-zero width.
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
    {
        let mut dice = None;
        let mut faces = Vec::new();
        for row in rows {
            let before = faces.len();
            faces.extend(row);
            let found = faces.len() - before;
            match dice {
                None if found == 0 => return Err(Error::NoDice),
                None => dice = Some(found),
                Some(expected) if expected != found => {
                    return Err(Error::ShapeMismatch { expected, found })
                }
                Some(_) => {}
            }
        }
        let dice = dice.ok_or(Error::NoTrials)?;
        Ok(Self { dice, faces })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len() / self.dice
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[must_use]
    pub fn dice(&self) -> usize {
        self.dice
    }

    /// `(trials, dice)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.dice)
    }

    pub fn rows(&self) -> slice::ChunksExact<'_, T> {
        self.faces.chunks_exact(self.dice)
    }

    /// Rows paired with their 1-based trial number.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[T])> {
        self.rows().enumerate().map(|(i, row)| (i + 1, row))
    }

    #[must_use]
    pub fn trial(&self, trial: usize) -> Option<&[T]> {
        trial.checked_sub(1).and_then(|i| self.rows().nth(i))
    }

    /// Outcomes of the die at `index` (0-based), in trial order.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<StepBy<slice::Iter<'_, T>>> {
        (index < self.dice).then(|| self.faces[index..].iter().step_by(self.dice))
    }

    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        (1..=self.dice).map(|i| format!("Die {i}")).collect()
    }

    #[must_use]
    pub fn narrow(&self) -> NarrowTable<T> {
        let mut rows = Vec::with_capacity(self.faces.len());
        for die in 0..self.dice {
            for (trial, row) in self.iter() {
                rows.push(NarrowRow {
                    trial,
                    die: die + 1,
                    face: row[die].clone(),
                });
            }
        }
        NarrowTable { rows }
    }

    #[must_use]
    pub fn present(&self, form: Form) -> View<'_, T> {
        match form {
            Form::Wide => View::Wide(self),
            Form::Narrow => View::Narrow(self.narrow()),
        }
    }
}

impl<'a, T> IntoIterator for &'a TrialTable<T>
where
    T: Face,
{
    type Item = &'a [T];
    type IntoIter = slice::ChunksExact<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

impl TryFrom<u8> for Form {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Form::Wide),
            2 => Ok(Form::Narrow),
            x => Err(Error::InvalidForm(x.to_string())),
        }
    }
}

impl FromStr for Form {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wide" | "1" => Ok(Form::Wide),
            "narrow" | "2" => Ok(Form::Narrow),
            _ => Err(Error::InvalidForm(s.to_string())),
        }
    }
}

impl<T> View<'_, T>
where
    T: Face,
{
    #[must_use]
    pub fn form(&self) -> Form {
        match self {
            View::Wide(_) => Form::Wide,
            View::Narrow(_) => Form::Narrow,
        }
    }

    #[must_use]
    pub fn wide(&self) -> Option<&TrialTable<T>> {
        match self {
            View::Wide(table) => Some(*table),
            View::Narrow(_) => None,
        }
    }

    #[must_use]
    pub fn narrow(&self) -> Option<&NarrowTable<T>> {
        match self {
            View::Wide(_) => None,
            View::Narrow(table) => Some(table),
        }
    }
}

impl<T> NarrowTable<T>
where
    T: Face,
{
    #[must_use]
    pub fn rows(&self) -> &[NarrowRow<T>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, NarrowRow<T>> {
        self.rows.iter()
    }
}

impl<T> Game<T>
where
    T: Face,
{
    /// Dice with different faces are accepted; [`crate::Analyzer`] rejects them later.
    pub fn new<I>(dice: I) -> Result<Self>
    where
        I: IntoIterator<Item = Die<T>>,
    {
        let dice: Vec<_> = dice.into_iter().collect();
        if dice.is_empty() {
            return Err(Error::NoDice);
        }
        Ok(Self { dice, table: None })
    }

    #[must_use]
    pub fn dice(&self) -> &[Die<T>] {
        &self.dice
    }

    #[must_use]
    pub fn table(&self) -> Option<&TrialTable<T>> {
        self.table.as_ref()
    }

    #[must_use]
    pub fn trials(&self) -> usize {
        self.table.as_ref().map_or(0, TrialTable::len)
    }

    /// Rolls every die once per trial and replaces the previous table.
    ///
    /// On error the previous table is left as it was.
    pub fn run_rng<G>(&mut self, n: usize, rng: &mut G) -> Result<&TrialTable<T>>
    where
        G: RngCore,
    {
        if n == 0 {
            return Err(Error::NoTrials);
        }
        let samplers = self
            .dice
            .iter()
            .map(Die::sampler)
            .collect::<Result<Vec<_>>>()?;

        let mut faces = Vec::with_capacity(n * samplers.len());
        for trial in 1..=n {
            let start = faces.len();
            for sampler in &samplers {
                faces.push(sampler.sample(rng).clone());
            }
            trace!("trial {trial}: {:?}", &faces[start..]);
        }
        debug!("played {n} trials with {} dice", self.dice.len());

        let table = TrialTable {
            dice: self.dice.len(),
            faces,
        };
        Ok(&*self.table.insert(table))
    }

    pub fn run(&mut self, n: usize) -> Result<&TrialTable<T>> {
        let mut rng = thread_rng();
        self.run_rng(n, &mut rng)
    }

    pub fn present(&self, form: Form) -> Result<View<'_, T>> {
        self.table
            .as_ref()
            .map(|table| table.present(form))
            .ok_or(Error::NotPlayed)
    }
}

impl<T> History<T>
where
    T: Face,
{
    #[must_use]
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Stores a copy of `table`. Recording the same table twice keeps both copies.
    pub fn record(&mut self, table: &TrialTable<T>) {
        self.tables.push(table.clone());
    }

    #[must_use]
    pub fn tables(&self) -> &[TrialTable<T>] {
        &self.tables
    }

    #[must_use]
    pub fn latest(&self) -> Option<&TrialTable<T>> {
        self.tables.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

impl<T> Default for History<T>
where
    T: Face,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;

    fn coin_game(n: usize) -> Game<&'static str> {
        let coin = Die::new(["H", "T"]).unwrap();
        Game::new(vec![coin; n]).unwrap()
    }

    #[test]
    fn run_fills_a_rectangular_table() {
        let mut rng = Pcg64::seed_from_u64(1);
        let mut game = coin_game(3);
        let table = game.run_rng(20, &mut rng).unwrap();
        assert_eq!(table.shape(), (20, 3));
        assert_eq!(table.columns(), vec!["Die 1", "Die 2", "Die 3"]);
        assert!(table.rows().flatten().all(|f| *f == "H" || *f == "T"));
        assert_eq!(game.trials(), 20);
    }

    #[test]
    fn run_overwrites_the_previous_table() {
        let mut rng = Pcg64::seed_from_u64(2);
        let mut game = coin_game(2);
        game.run_rng(10, &mut rng).unwrap();
        game.run_rng(4, &mut rng).unwrap();
        assert_eq!(game.table().map(TrialTable::shape), Some((4, 2)));
    }

    #[test]
    fn run_needs_trials_and_dice() {
        let mut game = coin_game(2);
        assert_eq!(game.run(0).unwrap_err(), Error::NoTrials);
        assert!(game.table().is_none());
        assert_eq!(Game::<i32>::new(Vec::new()).unwrap_err(), Error::NoDice);
    }

    #[test]
    fn failed_run_keeps_previous_table() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut blank = Die::new([1, 2]).unwrap();
        let live = blank.clone();
        blank.set_weight(&1, 0).unwrap();
        blank.set_weight(&2, 0).unwrap();

        let mut game = Game::new([live]).unwrap();
        let before = game.run_rng(5, &mut rng).unwrap().clone();
        game.dice = vec![blank];
        assert!(matches!(game.run_rng(5, &mut rng), Err(Error::Weights(_))));
        assert_eq!(game.table(), Some(&before));
    }

    #[test]
    fn zero_weight_face_never_shows_up_in_trials() {
        let mut rng = Pcg64::seed_from_u64(4);
        let mut die = Die::new(1..=6).unwrap();
        die.set_weight(&6, 0).unwrap();
        let mut game = Game::new([die.clone(), die]).unwrap();
        let table = game.run_rng(1000, &mut rng).unwrap();
        assert!(table.rows().flatten().all(|&f| f != 6));
    }

    #[test]
    fn huge_weights_still_run() {
        let mut die = Die::new(1..=3).unwrap();
        die.set_weight(&1, f64::MAX).unwrap();
        assert!(die.set_weight(&2, f64::MAX).is_err());
        let mut game = Game::new([die.clone(), die]).unwrap();
        assert_eq!(game.run(3).unwrap().shape(), (3, 2));
    }

    #[test]
    fn trial_and_column_access() {
        let table = TrialTable::from_rows([[3, 3], [1, 2], [5, 5]]).unwrap();
        assert_eq!(table.trial(1), Some(&[3, 3][..]));
        assert_eq!(table.trial(2), Some(&[1, 2][..]));
        assert_eq!(table.trial(0), None);
        assert_eq!(table.trial(4), None);
        assert_eq!(
            table.column(1).unwrap().copied().collect::<Vec<_>>(),
            vec![3, 2, 5]
        );
        assert!(table.column(2).is_none());
    }

    #[test]
    fn from_rows_checks_shape() {
        assert_eq!(
            TrialTable::from_rows([vec![1, 2], vec![3]]).unwrap_err(),
            Error::ShapeMismatch {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            TrialTable::<i32>::from_rows(Vec::<Vec<i32>>::new()).unwrap_err(),
            Error::NoTrials
        );
        assert_eq!(
            TrialTable::<i32>::from_rows([Vec::new()]).unwrap_err(),
            Error::NoDice
        );
    }

    #[test]
    fn wide_presentation_is_the_table() {
        let mut game = coin_game(2);
        game.run(8).unwrap();
        let view = game.present(Form::Wide).unwrap();
        assert_eq!(view.form(), Form::Wide);
        assert_eq!(view.wide(), game.table());
    }

    #[test]
    fn narrow_presentation_melts_by_die() {
        let table = TrialTable::from_rows([["a", "b"], ["c", "d"]]).unwrap();
        let view = table.present(Form::Narrow);
        let rows = view.narrow().unwrap().rows().to_vec();
        assert_eq!(
            rows,
            vec![
                NarrowRow { trial: 1, die: 1, face: "a" },
                NarrowRow { trial: 2, die: 1, face: "c" },
                NarrowRow { trial: 1, die: 2, face: "b" },
                NarrowRow { trial: 2, die: 2, face: "d" },
            ]
        );
    }

    #[test]
    fn present_before_run() {
        let game = coin_game(1);
        assert_eq!(game.present(Form::Wide).unwrap_err(), Error::NotPlayed);
    }

    #[test]
    fn form_parsing() {
        assert_eq!(Form::try_from(1u8).unwrap(), Form::Wide);
        assert_eq!(Form::try_from(2u8).unwrap(), Form::Narrow);
        assert_eq!(
            Form::try_from(3u8).unwrap_err(),
            Error::InvalidForm("3".to_string())
        );
        assert_eq!("Narrow".parse::<Form>().unwrap(), Form::Narrow);
        assert_eq!(" wide ".parse::<Form>().unwrap(), Form::Wide);
        assert!(matches!("tall".parse::<Form>(), Err(Error::InvalidForm(_))));
    }

    #[test]
    fn history_is_explicit() {
        let mut game = coin_game(2);
        let mut history = History::new();
        assert!(history.is_empty());

        let table = game.run(3).unwrap();
        history.record(table);
        history.record(table);
        assert_eq!(history.len(), 2);
        assert_eq!(history.tables()[0], history.tables()[1]);

        game.run(5).unwrap();
        assert_eq!(history.latest().map(TrialTable::len), Some(3));
        history.clear();
        assert!(history.latest().is_none());
    }
}
