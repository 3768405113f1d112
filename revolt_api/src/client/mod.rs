mod client;

pub use client::{parse_json_if_ok, require_success, Credentials, RevoltClient};

pub(crate) use client::normalize_proxy;
