use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

pub trait Value: Sized + Send + Sync + Debug + Clone + PartialEq + Eq + PartialOrd + Ord {}

pub trait Face: Value + Display {}

impl<T> Value for T where T: Sized + Send + Sync + Debug + Clone + PartialEq + Eq + PartialOrd + Ord {}

impl<T> Face for T where T: Value + Display {}

/// Relative weight of a face. Any primitive number, or `bool` as 0 or 1.
pub trait Weight {
    fn to_weight(self) -> f64;
}

macro_rules! impl_weight_as {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless, clippy::unnecessary_cast)]
                fn to_weight(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_weight_as!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Weight for bool {
    fn to_weight(self) -> f64 {
        f64::from(u8::from(self))
    }
}

/// Floating point face with a total order, so it can be deduplicated, sorted and used as a key.
#[derive(Clone, Copy, Debug, Default)]
pub struct Float(pub f64);

impl Float {
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Float {}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<f64> for Float {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<f32> for Float {
    fn from(value: f32) -> Self {
        Self(f64::from(value))
    }
}

impl From<Float> for f64 {
    fn from(value: Float) -> Self {
        value.0
    }
}
