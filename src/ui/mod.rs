//! Console presentation: number formatting, the results report and notices.

pub mod format;
pub mod notice;
pub mod report;
