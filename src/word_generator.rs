use crate::language::{BudgetSelector, Difficulty, RandomSelector, WordBank, WordSelector};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How much text to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    /// Exactly this many words, drawn with replacement
    Words(usize),
    /// At least this many characters, from a shuffled cycle of the bank
    MinChars(usize),
}

/// Handles all word and prompt generation logic
pub struct WordGenerator<R: Rng = StdRng> {
    bank: &'static WordBank,
    rng: R,
}

impl WordGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::with_rng(WordBank::embedded(), StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(WordBank::embedded(), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WordGenerator<R> {
    pub fn with_rng(bank: &'static WordBank, rng: R) -> Self {
        Self { bank, rng }
    }

    pub fn bank(&self) -> &'static WordBank {
        self.bank
    }

    /// Generate space-joined words for `difficulty`
    pub fn generate(&mut self, difficulty: Difficulty, size: SizeSpec) -> String {
        let words = self.bank.words(difficulty);
        let picked = match size {
            SizeSpec::Words(count) => RandomSelector { count }.select_words(words, &mut self.rng),
            SizeSpec::MinChars(min_chars) => {
                BudgetSelector { min_chars }.select_words(words, &mut self.rng)
            }
        };
        picked.into_iter().join(" ")
    }

    /// Same as [`generate`](Self::generate) but keyed by a raw difficulty string
    pub fn generate_for_key(&mut self, key: &str, size: SizeSpec) -> String {
        self.generate(Difficulty::from_key(key), size)
    }
}
