//! HTTP request handlers.

mod health;
mod redirect;
mod short_urls;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use short_urls::{create_short_url_handler, get_short_url_handler};
