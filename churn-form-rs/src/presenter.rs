//! Result presenter: turns a scoring result into the values shown on the result page

use scoring_sdk::ScoringResult;

/// Display names of the two probability classes, in probability order
pub const CLASS_LABELS: [&str; 2] = ["No Churn", "Churn"];

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    /// Lower-cased predicted label
    pub churn_risk: String,
    pub no_percent: f64,
    pub yes_percent: f64,
    /// One-shot notification shown above the result
    pub message: String,
    pub labels: [&'static str; 2],
    pub result: ScoringResult,
}

impl DisplayModel {
    /// `(label, percent)` pairs in class order
    pub fn percentages(&self) -> [(&'static str, f64); 2] {
        [
            (self.labels[0], self.no_percent),
            (self.labels[1], self.yes_percent),
        ]
    }
}

pub fn present(result: ScoringResult) -> DisplayModel {
    let [no, yes] = result.probability();
    let no_percent = no * 100.0;
    let yes_percent = yes * 100.0;

    DisplayModel {
        churn_risk: result.predicted_label().to_lowercase(),
        no_percent,
        yes_percent,
        message: format!("Percentage of this customer leaving is: {:.0}%", yes_percent),
        labels: CLASS_LABELS,
        result,
    }
}
