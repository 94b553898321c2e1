use rand::seq::SliceRandom;
use rand::RngCore;

/// Trait for different word selection strategies
pub trait WordSelector {
    /// Select words from `words` using the injected random source
    fn select_words<'a>(&self, words: &'a [String], rng: &mut dyn RngCore) -> Vec<&'a str>;
}

/// Independent uniform draws with replacement
pub struct RandomSelector {
    pub count: usize,
}

impl WordSelector for RandomSelector {
    fn select_words<'a>(&self, words: &'a [String], rng: &mut dyn RngCore) -> Vec<&'a str> {
        if words.is_empty() {
            return Vec::new();
        }
        (0..self.count)
            .filter_map(|_| words.choose(&mut *rng))
            .map(String::as_str)
            .collect()
    }
}

/// Shuffled walk over the bank, cycling, until the joined text holds `min_chars`.
///
/// Always yields at least one word, so a zero budget produces a single word.
pub struct BudgetSelector {
    pub min_chars: usize,
}

impl WordSelector for BudgetSelector {
    fn select_words<'a>(&self, words: &'a [String], rng: &mut dyn RngCore) -> Vec<&'a str> {
        if words.is_empty() {
            return Vec::new();
        }

        let mut shuffled: Vec<&'a str> = words.iter().map(String::as_str).collect();
        shuffled.shuffle(rng);

        let mut picked = Vec::new();
        // each word counts its trailing separator; the last one is never emitted
        let mut running_total = 0usize;
        for word in shuffled.iter().cycle() {
            picked.push(*word);
            running_total += word.len() + 1;
            if running_total > self.min_chars {
                break;
            }
        }
        picked
    }
}
