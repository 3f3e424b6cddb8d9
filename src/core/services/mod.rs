pub mod summary_service;

pub use summary_service::{ReportLine, ReportTotals, SpendingReport, SummaryService};
