pub mod page;
pub mod summary;

pub use page::{AuthResult, PageExtract, Table};
pub use summary::{ClaimsSummary, ReadyClaim, SummaryResult};
