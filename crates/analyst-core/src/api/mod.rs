//! External API clients

pub mod gemini;
pub mod krx;
pub mod news;
pub mod yahoo;

pub use gemini::{GeminiClient, GeminiConfig};
pub use krx::KrxListingClient;
pub use news::{NewsArticle, NewsClient};
pub use yahoo::{Quote, YahooClient};
