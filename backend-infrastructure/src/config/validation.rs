use anyhow::{anyhow, Result};

pub fn require_positive(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(anyhow!("{} must be greater than 0", name));
    }
    Ok(())
}

pub fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(anyhow!("{} must be an http(s) url", name));
    }
    if trimmed.len() <= "https://".len() {
        return Err(anyhow!("{} has no host", name));
    }
    Ok(())
}
