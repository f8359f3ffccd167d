// src/core/net.rs

// Blocking HTTP GET. One request at a time; the caller paces them.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::USER_AGENT;

pub fn client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// GET `url` and return the body. Non-2xx statuses are errors.
pub fn http_get(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send()?.error_for_status()?.text()
}
