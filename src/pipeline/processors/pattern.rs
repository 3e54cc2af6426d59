use crate::error::{AppError, Result};
use regex::Regex;

/// Ordered, immutable list of compiled regular expressions.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile every pattern; the first invalid one aborts the whole set.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| AppError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// First pattern matching `text`, in configuration order.
    pub fn find(&self, text: &str) -> Option<&Regex> {
        self.patterns.iter().find(|re| re.is_match(text))
    }

    /// Every pattern matching `text`, in configuration order.
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Regex> + 'a {
        self.patterns.iter().filter(move |re| re.is_match(text))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
