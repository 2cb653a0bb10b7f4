// Business domains
pub mod clubs;
pub mod postings;
pub mod submissions;
