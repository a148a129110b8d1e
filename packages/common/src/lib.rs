pub mod config;
pub mod derivative;
pub mod filename;
pub mod filter;
pub mod ingest;
pub mod pagination;
pub mod painting;
pub mod painting_status;
pub mod snapshot;
pub mod storage;

pub use filter::{FilterCriteria, distinct_years, filter_paintings};
pub use pagination::{Page, PageInfo, PageLink, page_window, paginate};
pub use painting::{PaintingRecord, RecordError};
pub use painting_status::PaintingStatus;
