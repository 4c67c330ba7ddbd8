use crate::utils::constants::SKIP_REASONS_SHOWN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// What happened while turning CSV rows into records
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_records: usize,
    pub skipped_rows: Vec<SkippedRow>,
    pub invalid_centroids: usize,
    pub missing_centroids: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_loaded(&mut self) {
        self.total_rows += 1;
        self.loaded_records += 1;
    }

    pub fn record_skipped(&mut self, line: u64, reason: impl Into<String>) {
        self.total_rows += 1;
        self.skipped_rows.push(SkippedRow {
            line,
            reason: reason.into(),
        });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_rows.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.skipped_rows.is_empty() || self.invalid_centroids > 0
    }

    fn percentage(&self, count: usize) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total_rows as f64
        }
    }

    /// Human-readable summary printed at the end of a run
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Load Report ===\n");
        summary.push_str(&format!("Total Rows: {}\n", self.total_rows));
        summary.push_str(&format!(
            "Loaded Records: {} ({:.1}%)\n",
            self.loaded_records,
            self.percentage(self.loaded_records)
        ));
        summary.push_str(&format!(
            "Skipped Rows: {} ({:.1}%)\n",
            self.skipped_count(),
            self.percentage(self.skipped_count())
        ));
        summary.push_str(&format!(
            "Invalid Centroids (excluded from maps): {}\n",
            self.invalid_centroids
        ));
        summary.push_str(&format!("Missing Centroids: {}\n", self.missing_centroids));

        if !self.skipped_rows.is_empty() {
            summary.push_str(&format!(
                "\nFirst {} Skipped Rows:\n",
                self.skipped_rows.len().min(SKIP_REASONS_SHOWN)
            ));
            for (i, skipped) in self.skipped_rows.iter().take(SKIP_REASONS_SHOWN).enumerate() {
                summary.push_str(&format!(
                    "  {}. Line {}: {}\n",
                    i + 1,
                    skipped.line,
                    skipped.reason
                ));
            }
        }

        summary
    }
}
