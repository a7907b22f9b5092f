//! mediaferry - scrape, queue and download a user's media.
//!
//! The pipeline renders a mirror site's media list in a headless browser,
//! extracts media records from the HTML, queues them in a SQLite work queue
//! and downloads them later with a separate worker that sorts the results
//! into `images/` and `videos/` folders.

pub mod cli;
pub mod config;
pub mod models;
pub mod repository;
pub mod scrapers;
pub mod services;
pub mod utils;
