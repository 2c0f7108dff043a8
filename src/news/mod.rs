//! Remote headline retrieval and the article model shared by every layer.

pub mod api_types;
pub mod category;
pub mod client;
pub mod demo;
pub mod types;

pub use category::{category_for, ArticleFilter, Category};
pub use client::{NewsClient, NewsSource};
pub use demo::demo_articles;
pub use types::{Article, ArticleSource};
