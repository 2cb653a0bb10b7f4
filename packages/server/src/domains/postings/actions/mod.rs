//! Posting domain actions

mod feed;

pub use feed::PostingFeed;
