pub mod fetcher;
pub mod parser;
pub mod search;
pub mod selectors;

#[cfg(test)]
mod test_server;

pub use fetcher::ReqwestFetcher;
pub use parser::ListingPageParser;
pub use search::MarketplaceSearchClient;
