pub mod browser;
pub mod http_client;
