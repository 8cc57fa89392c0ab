pub mod fetcher;
pub mod pdf;
pub mod tagger;

pub use fetcher::ReqwestFetcher;
pub use pdf::LopdfReader;
pub use tagger::RuleTagger;
