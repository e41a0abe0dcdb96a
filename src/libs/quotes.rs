//! Quotes of the day.
//!
//! A [`QuoteBook`] starts with the built-in collection and can be extended at
//! startup with quotes pulled from Notion.

use rand::seq::IndexedRandom;

/// Upper bound on quotes returned by one random selection.
pub const MAX_QUOTES: usize = 1000;

const BUILTIN_QUOTES: &[&str] = &[
    "Greatness from small beginnings.",
    "Rome was not built in a day.",
    "The only bad workout is the workout that didn't happen.",
    "Take it one day at a time. Do the thing that needs to be done today, properly.",
    "It is always better to get the unpleasant things done quickly.",
    "If there is something you have to do, you cannot ignore it forever.",
    "A solution that fixes one percent of a problem beats doing nothing.",
    "Make good decisions. They compound.",
    "Ask questions. Why?",
    "If you play not to lose, you will lose. If you play to win, you might win.",
    "Leave things better for your future self by doing today what needs doing today.",
    "When you are stuck for too long, ask for help.",
    "If you are likely to forget something, write it down.",
    "If something failed twice, change the approach instead of trying a third time.",
    "Lessons are taught until they are learned.",
    "Never copy code without understanding it.",
    "Don't always assume you are right.",
    "A mistake you do not correct is the real mistake.",
    "The worst enemy you will meet is yourself.",
    "Force without wisdom falls of its own weight.",
    "A man who cannot command himself will always be a slave.",
    "Knowing a skill is not enough. Knowing how to use it is what matters.",
    "Once you start something, see it through to the end.",
    "Appreciate the strength you have now and fill your days with experiences.",
    "If you know something will cause a problem later, solve it now.",
    "Do what only you can do.",
    "Preserve your focus. Skip the activities that feel good but produce nothing.",
    "To control a restless mind, focus on your breath.",
    "Do something physical every day, even if you have to force yourself.",
    "Don't be scared. Do it slowly if you must, but do it.",
];

/// Ordered, duplicate-free collection of quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBook {
    quotes: Vec<String>,
}

impl QuoteBook {
    pub fn builtin() -> Self {
        QuoteBook::from_quotes(BUILTIN_QUOTES.iter().map(|q| q.to_string()))
    }

    pub fn from_quotes<I: IntoIterator<Item = String>>(quotes: I) -> Self {
        let mut book = QuoteBook { quotes: Vec::new() };
        book.extend(quotes);
        book
    }

    /// Appends quotes that are not already in the book, keeping their order.
    /// Returns how many were added.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, quotes: I) -> usize {
        let before = self.quotes.len();
        for quote in quotes {
            let quote = quote.trim().to_string();
            if !quote.is_empty() && !self.quotes.contains(&quote) {
                self.quotes.push(quote);
            }
        }
        self.quotes.len() - before
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn all(&self) -> &[String] {
        &self.quotes
    }

    /// `n` quotes sampled with replacement, so repeats are possible.
    pub fn random(&self, n: usize) -> Vec<String> {
        let mut rng = rand::rng();
        (0..n).filter_map(|_| self.quotes.choose(&mut rng).cloned()).collect()
    }

    /// Selection used by the quotes endpoint: the first `size` quotes (all of
    /// them for `0`), or `size` random ones (book size for `0`) when `random`.
    /// Random selections never exceed [`MAX_QUOTES`].
    pub fn select(&self, size: usize, random: bool) -> Vec<String> {
        if random {
            let count = if size == 0 { self.len() } else { size };
            return self.random(count.min(MAX_QUOTES));
        }

        if size == 0 {
            self.quotes.clone()
        } else {
            self.quotes.iter().take(size).cloned().collect()
        }
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::builtin()
    }
}
