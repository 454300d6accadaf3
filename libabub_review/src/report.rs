use std::fmt::{Display, Formatter};

use super::error::ReportError;
use super::labels::EventCategory;
use super::stats_log::LabelRecord;

/// Aggregate statistics over the full stats log.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub n_reviewed: usize,
    pub n_success: usize,
    pub success_rate: f64,
    /// Per-100 occurrence rate for each tracked category, in
    /// `EventCategory::TRACKED` order.
    pub category_rates: Vec<(EventCategory, f64)>,
}

/// Compute the flat success rate and per-100 category rates.
///
/// Zero records is an explicit error rather than a division blow-up; the
/// caller reports it as "no data".
pub fn summarize(records: &[LabelRecord]) -> Result<Report, ReportError> {
    if records.is_empty() {
        return Err(ReportError::EmptyLog);
    }

    let n_reviewed = records.len();
    let n_success = records.iter().filter(|record| record.success).count();

    let category_rates = EventCategory::TRACKED
        .iter()
        .map(|&category| {
            let count = records
                .iter()
                .filter(|record| record.category == category)
                .count();
            (category, 100.0 * count as f64 / n_reviewed as f64)
        })
        .collect();

    Ok(Report {
        n_reviewed,
        n_success,
        success_rate: n_success as f64 / n_reviewed as f64,
        category_rates,
    })
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Reviewed candidates: {}", self.n_reviewed)?;
        writeln!(
            f,
            "Success rate: {:.2}% ({} of {})",
            self.success_rate * 100.0,
            self.n_success,
            self.n_reviewed
        )?;
        for (category, rate) in &self.category_rates {
            writeln!(f, "{category} per 100 events: {rate:.2}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(success: bool, category: EventCategory) -> LabelRecord {
        LabelRecord {
            run_id: String::from("20200921_2"),
            event_id: 0,
            camera_id: 0,
            success,
            category,
        }
    }

    fn rate_for(report: &Report, category: EventCategory) -> f64 {
        report
            .category_rates
            .iter()
            .find(|(c, _)| *c == category)
            .unwrap()
            .1
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record(true, EventCategory::NA),
            record(false, EventCategory::NA),
            record(true, EventCategory::Boiling),
        ];
        let report = summarize(&records).unwrap();
        assert_eq!(report.n_reviewed, 3);
        assert_eq!(report.n_success, 2);
        assert!((report.success_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((rate_for(&report, EventCategory::Boiling) - 100.0 / 3.0).abs() < 1e-12);
        assert_eq!(rate_for(&report, EventCategory::Giration), 0.0);
        assert_eq!(rate_for(&report, EventCategory::CantFind), 0.0);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(matches!(summarize(&[]), Err(ReportError::EmptyLog)));
    }

    #[test]
    fn test_report_display() {
        let report = summarize(&[record(true, EventCategory::NA)]).unwrap();
        let text = report.to_string();
        assert!(text.contains("Success rate: 100.00%"));
        assert!(text.contains("boiling per 100 events: 0.00"));
    }
}
