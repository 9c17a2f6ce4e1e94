//! Iterators for certificates of a fixed length, and prefixes thereof.

/// Iterates depth-first over the prefixes of all length-`n` words over `0..radix`, in
/// lexicographic order: each call extends the current prefix by a `0` digit if it is not yet
/// complete, and otherwise increments the last digit that can be incremented (dropping the ones
/// after it).
///
/// The iterator yields the position of the digit just written, so `digits[..=p]` is the new prefix.
/// The caller may skip all extensions of the current prefix by calling `skip_current_subtree`.
pub struct PrefixIterator {
    /// The prefix under construction.
    pub digits: Vec<u8>,
    /// The word length.
    n: usize,
    radix: u8,
    /// Whether we've been asked to skip everything starting with the current prefix.
    skip_current: bool,
}

impl PrefixIterator {
    pub fn new(n: usize, radix: u8) -> Self {
        Self {
            digits: Vec::new(),
            n,
            radix,
            skip_current: false,
        }
    }

    pub fn skip_current_subtree(&mut self) {
        self.skip_current = true;
    }

    /// Whether the current prefix is a complete word.
    pub fn is_complete(&self) -> bool {
        self.digits.len() == self.n
    }
}

impl Iterator for PrefixIterator {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        // If the word isn't full yet, and we may extend it, the next prefix is its first extension.
        if self.digits.len() < self.n && !self.skip_current && self.radix > 0 {
            self.digits.push(0);
            return Some(self.digits.len() - 1);
        }
        self.skip_current = false;
        // Otherwise backtrack: increment the deepest digit that isn't maxed out.
        while let Some(d) = self.digits.pop() {
            if d + 1 < self.radix {
                self.digits.push(d + 1);
                return Some(self.digits.len() - 1);
            }
        }
        None
    }
}
