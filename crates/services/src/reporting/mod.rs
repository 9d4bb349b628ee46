pub mod aggregate;
pub mod filter;
pub mod recipients;
pub mod reports;

pub use filter::{DateWindow, RawReportParams, ReportFilter};
pub use recipients::AudienceSpec;
