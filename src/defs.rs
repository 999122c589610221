use once_cell::sync::Lazy;

use crate::die::Die;

pub static D6: Lazy<Die<u32>> = Lazy::new(|| Die::uniform(1..=6));
pub static COIN: Lazy<Die<&'static str>> = Lazy::new(|| Die::uniform(["Heads", "Tails"]));
pub static ALPHABET: Lazy<Die<char>> = Lazy::new(|| Die::uniform('A'..='Z'));

pub fn d6() -> Die<u32> {
    D6.clone()
}

pub fn coin() -> Die<&'static str> {
    COIN.clone()
}

pub fn alphabet() -> Die<char> {
    ALPHABET.clone()
}
