pub mod browser;
pub mod http;
pub mod page;
pub mod traits;
pub mod types;

pub use browser::ChromeFetcher;
pub use http::HttpFetcher;
pub use page::{PageSelectors, PricePattern};
pub use traits::PageFetcher;
pub use types::FetcherKind;
