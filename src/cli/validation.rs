//! Value parsers for command-line arguments clap cannot check on its own.

use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::validation::MAX_PAGE_SIZE;

pub fn validate_port(value: &str) -> Result<u16, String> {
    match value.parse::<u16>() {
        Ok(0) => Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "Port must be a number between 1 and 65535, got: '{value}'"
        )),
    }
}

/// The file must exist and be readable.
pub fn validate_config_file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);

    if !path.is_file() {
        return Err(if path.exists() {
            format!("Configuration path is not a file: '{value}'")
        } else {
            format!("Configuration file does not exist: '{value}'")
        });
    }

    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{value}': {e}"))
}

pub fn validate_rollback_steps(value: &str) -> Result<u32, String> {
    let steps: u32 = value
        .parse()
        .map_err(|_| format!("Rollback steps must be a positive number, got: '{value}'"))?;

    match steps {
        0 => Err("Rollback steps must be greater than 0".to_string()),
        1..=100 => Ok(steps),
        _ => Err("Rollback steps cannot exceed 100".to_string()),
    }
}

/// Accepts IP addresses and plausible host names.
pub fn validate_host_address(value: &str) -> Result<String, String> {
    let host = value.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // Dotted digits that did not parse as an IP
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address: '{value}'"));
    }
    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }
    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(format!("Invalid host name: '{value}'"));
    }

    Ok(host.to_string())
}

/// An absolute http(s) URL for the client commands.
pub fn validate_api_url(value: &str) -> Result<String, String> {
    let url = reqwest::Url::parse(value).map_err(|e| format!("Invalid URL '{value}': {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("API URL must start with http:// or https://, got: '{value}'"));
    }

    Ok(value.trim_end_matches('/').to_string())
}

pub fn validate_page(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(format!("Page must be a number of at least 1, got: '{value}'")),
    }
}

pub fn validate_limit(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => Ok(limit),
        _ => Err(format!(
            "Limit must be between 1 and {MAX_PAGE_SIZE}, got: '{value}'"
        )),
    }
}
