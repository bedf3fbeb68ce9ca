//! Shared utilities for slug generation, URL handling, and error mapping.

pub mod base_url;
pub mod db_error;
pub mod slug_generator;
pub mod url_normalizer;
