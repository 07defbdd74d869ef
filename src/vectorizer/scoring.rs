use std::fmt::{self, Debug, Display};

use serde::Serialize;

/// One ranked result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitEntry<K> {
    pub key: K,
    pub score: f64,
}

/// Ranked results of a similarity or term-weight lookup
#[derive(Clone, PartialEq, Serialize)]
pub struct Hits<K> {
    pub list: Vec<HitEntry<K>>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<HitEntry<K>>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score. NaN scores are dropped.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list.retain(|e| !e.score.is_nan());
        // stable, so equal scores keep insertion order
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// Keep the first `n` entries
    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitEntry<K>> {
        self.list.iter()
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for entry in &self.list {
                writeln!(f, "    {:?}: {:.6}", entry.key, entry.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list()
                .entries(self.list.iter().map(|e| (&e.key, e.score)))
                .finish()
        }
    }
}

impl<K> Display for Hits<K>
where
    K: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, entry) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {:<40} {:.6}", rank + 1, entry.key, entry.score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(key: &str, score: f64) -> HitEntry<String> {
        HitEntry {
            key: key.to_string(),
            score,
        }
    }

    #[test]
    fn sorts_descending_and_drops_nan() {
        let mut hits = Hits::new(vec![hit("a", 0.2), hit("b", f64::NAN), hit("c", 0.9), hit("d", 0.2)]);
        hits.sort_by_score_desc();
        let keys: Vec<&str> = hits.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "d"]);
        hits.truncate(1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn display_is_ranked() {
        let hits = Hits::new(vec![hit("Rap God", 0.5)]);
        let text = hits.to_string();
        assert!(text.starts_with("  1. Rap God"));
        assert!(text.contains("0.500000"));
    }
}
