//! Batch summary.
//!
//! Counts of outcomes and risk bands over a finished batch, for a quick read
//! of a run without opening the per-record output.

use chrono::{DateTime, Utc};
use safebalance::{BatchItem, Label, RiskCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of scored records in one risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Risk band
    pub category: RiskCategory,
    /// Scored records in the band
    pub count: usize,
}

/// Aggregate view of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// When the summary was produced
    pub generated_at: DateTime<Utc>,

    /// Records in the batch
    pub total: usize,

    /// Records that were scored
    pub scored: usize,

    /// Records that could not be scored
    pub errors: usize,

    /// Scored records labelled `Failed`
    pub failed: usize,

    /// Scored records labelled `Alive`
    pub alive: usize,

    /// Mean reported probability over scored records
    pub mean_probability: Option<f64>,

    /// Highest reported probability and the company it belongs to
    pub highest: Option<(String, f64)>,

    /// Scored records per risk band, lowest band first
    pub categories: Vec<CategoryCount>,
}

impl BatchSummary {
    /// Summarize batch items.
    ///
    /// # Examples
    ///
    /// ```
    /// use safebalance::{BatchItem, decide};
    /// use safebalance_output::BatchSummary;
    ///
    /// let items = vec![
    ///     BatchItem::scored("Acme", &decide(0.8)),
    ///     BatchItem::scored("Globex", &decide(0.1)),
    ///     BatchItem::failed("Initech", "Missing required field: X3"),
    /// ];
    /// let summary = BatchSummary::from_items(&items);
    ///
    /// assert_eq!(summary.total, 3);
    /// assert_eq!(summary.failed, 1);
    /// assert_eq!(summary.errors, 1);
    /// ```
    pub fn from_items(items: &[BatchItem]) -> Self {
        let mut categories: Vec<CategoryCount> = RiskCategory::all()
            .into_iter()
            .map(|category| CategoryCount { category, count: 0 })
            .collect();
        let mut failed = 0;
        let mut alive = 0;
        let mut sum = 0.0;
        let mut highest: Option<(String, f64)> = None;

        for item in items {
            let (Some(label), Some(p), Some(score)) =
                (item.label(), item.probability(), item.risk_score())
            else {
                continue;
            };
            match label {
                Label::Failed => failed += 1,
                Label::Alive => alive += 1,
            }
            sum += p;
            let band = RiskCategory::from_score(score);
            if let Some(slot) = categories.iter_mut().find(|c| c.category == band) {
                slot.count += 1;
            }
            if highest.as_ref().is_none_or(|(_, best)| p > *best) {
                highest = Some((item.company_name().to_string(), p));
            }
        }

        let scored = failed + alive;
        Self {
            generated_at: Utc::now(),
            total: items.len(),
            scored,
            errors: items.len() - scored,
            failed,
            alive,
            mean_probability: (scored > 0).then(|| sum / scored as f64),
            highest,
            categories,
        }
    }

    /// Share of scored records labelled `Failed`.
    pub fn failure_rate(&self) -> Option<f64> {
        (self.scored > 0).then(|| self.failed as f64 / self.scored as f64)
    }

    /// Format as a plain-text table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nBatch Summary ({})\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("  Records:          {}\n", self.total));
        output.push_str(&format!("  Scored:           {}\n", self.scored));
        output.push_str(&format!("  Errors:           {}\n", self.errors));
        output.push_str(&format!("  Failed:           {}", self.failed));
        if let Some(rate) = self.failure_rate() {
            output.push_str(&format!(" ({:.1}% of scored)", rate * 100.0));
        }
        output.push('\n');
        output.push_str(&format!("  Alive:            {}\n", self.alive));
        if let Some(mean) = self.mean_probability {
            output.push_str(&format!("  Mean probability: {mean:.4}\n"));
        }
        if let Some((name, p)) = &self.highest {
            output.push_str(&format!("  Highest:          {name} ({p:.4})\n"));
        }

        output.push_str("\nRisk Bands:\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<20} {:>10}\n", "Category", "Records"));
        for c in &self.categories {
            output.push_str(&format!("{:<20} {:>10}\n", c.category.to_string(), c.count));
        }
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} scored ({} failed, {} alive), {} errors",
            self.total, self.scored, self.failed, self.alive, self.errors
        )
    }
}
