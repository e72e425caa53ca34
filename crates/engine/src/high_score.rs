//! In-memory high score table.

/// Default number of entries kept
pub const DEFAULT_HIGH_SCORE_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Best `capacity` results, highest first. Equal scores keep submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    capacity: usize,
    entries: Vec<HighScoreEntry>,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_CAPACITY)
    }
}

impl HighScores {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    /// Highest score on the table, 0 when empty
    pub fn best_score(&self) -> u32 {
        self.best().map(|e| e.score).unwrap_or(0)
    }

    /// Record a result. Returns its 1-based rank if it made the table.
    pub fn submit(&mut self, name: &str, score: u32) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());
        if pos >= self.capacity {
            return None;
        }

        let name = name.trim();
        let name = if name.is_empty() { "anonymous" } else { name };
        self.entries.insert(
            pos,
            HighScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(self.capacity);
        Some(pos + 1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_stay_sorted() {
        let mut table = HighScores::new(3);
        assert_eq!(table.submit("ana", 40), Some(1));
        assert_eq!(table.submit("bo", 90), Some(1));
        assert_eq!(table.submit("cy", 60), Some(2));

        let scores: Vec<u32> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![90, 60, 40]);
        assert_eq!(table.best().map(|e| e.name.as_str()), Some("bo"));
    }

    #[test]
    fn full_table_drops_the_lowest() {
        let mut table = HighScores::new(2);
        table.submit("a", 10);
        table.submit("b", 20);
        assert_eq!(table.submit("c", 5), None);
        assert_eq!(table.submit("d", 15), Some(2));
        assert_eq!(table.entries().len(), 2);
        assert_eq!(table.entries()[1].name, "d");
    }

    #[test]
    fn ties_rank_after_existing() {
        let mut table = HighScores::new(3);
        table.submit("first", 50);
        assert_eq!(table.submit("second", 50), Some(2));
        assert_eq!(table.entries()[0].name, "first");
    }

    #[test]
    fn blank_names_become_anonymous() {
        let mut table = HighScores::default();
        table.submit("   ", 1);
        assert_eq!(table.entries()[0].name, "anonymous");
        assert_eq!(table.best_score(), 1);
    }
}
