use std::borrow::Borrow;
use std::fmt::Display;
use std::iter::Zip;
use std::slice;

use itertools::Itertools;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{thread_rng, RngCore};

use crate::value::{Face, Weight};
use crate::{Error, Result, DEFAULT_WEIGHT};

pub type Iter<'a, T> = Zip<slice::Iter<'a, T>, slice::Iter<'a, f64>>;

/// A die with unique faces, each carrying a relative weight.
///
/// Faces are kept sorted and deduplicated; weights start at [`DEFAULT_WEIGHT`].
#[derive(Clone, Debug, PartialEq)]
pub struct Die<T>
where
    T: Face,
{
    faces: Vec<T>,
    weights: Vec<f64>,
}

/// Weighted draws from a die, built once and reused for many single rolls.
#[derive(Clone, Debug)]
pub struct Sampler<'a, T>
where
    T: Face,
{
    faces: &'a [T],
    index: WeightedIndex<f64>,
}

impl<T> Die<T>
where
    T: Face,
{
    pub fn new<I>(faces: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let die = Self::uniform(faces);
        if die.faces.is_empty() {
            return Err(Error::NoFaces);
        }
        Ok(die)
    }

    #[must_use]
    pub(crate) fn uniform<I>(faces: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let faces = faces.into_iter().sorted().dedup().collect_vec();
        let weights = vec![DEFAULT_WEIGHT; faces.len()];
        Self { faces, weights }
    }

    #[must_use]
    pub fn faces(&self) -> &[T] {
        &self.faces
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.faces.iter().zip(self.weights.iter())
    }

    #[must_use]
    pub fn contains<Q>(&self, face: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(face).is_some()
    }

    #[must_use]
    pub fn weight<Q>(&self, face: &Q) -> Option<f64>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(face).map(|i| self.weights[i])
    }

    /// Replaces the weight of a single face.
    ///
    /// Nothing changes when the face is missing, the weight is negative or not finite, or the
    /// weights of the die would no longer sum to a finite total.
    pub fn set_weight<Q, W>(&mut self, face: &Q, weight: W) -> Result<()>
    where
        T: Borrow<Q>,
        Q: Ord + Display + ?Sized,
        W: Weight,
    {
        let i = self
            .position(face)
            .ok_or_else(|| Error::InvalidFace(face.to_string()))?;
        let weight = weight.to_weight();
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight(weight));
        }
        let others: f64 = self
            .weights
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, w)| w)
            .sum();
        if !(others + weight).is_finite() {
            return Err(Error::InvalidWeight(weight));
        }
        self.weights[i] = weight;
        Ok(())
    }

    /// Current faces and weights. The returned pairs are a copy.
    #[must_use]
    pub fn state(&self) -> Vec<(T, f64)> {
        self.iter().map(|(f, w)| (f.clone(), *w)).collect()
    }

    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        let total: f64 = self.weights.iter().sum();
        if total == 0.0 {
            return vec![0.0; self.weights.len()];
        }
        self.weights.iter().map(|w| w / total).collect()
    }

    /// Fails when every weight is zero.
    pub fn sampler(&self) -> Result<Sampler<'_, T>> {
        let index = WeightedIndex::new(&self.weights)?;
        Ok(Sampler {
            faces: &self.faces,
            index,
        })
    }

    pub fn roll_rng<G>(&self, n: usize, rng: &mut G) -> Result<Vec<T>>
    where
        G: RngCore,
    {
        let sampler = self.sampler()?;
        Ok((0..n).map(|_| sampler.sample(rng).clone()).collect())
    }

    pub fn roll(&self, n: usize) -> Result<Vec<T>> {
        let mut rng = thread_rng();
        self.roll_rng(n, &mut rng)
    }

    fn position<Q>(&self, face: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.faces.binary_search_by(|f| f.borrow().cmp(face)).ok()
    }
}

impl<T> Sampler<'_, T>
where
    T: Face,
{
    #[must_use]
    pub fn sample<G>(&self, rng: &mut G) -> &T
    where
        G: RngCore,
    {
        &self.faces[self.index.sample(rng)]
    }
}

impl<'a, T> IntoIterator for &'a Die<T>
where
    T: Face,
{
    type Item = (&'a T, &'a f64);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
