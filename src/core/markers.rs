use crate::utils::error::{ProbeError, Result};
use regex::Regex;

/// Condition holds once `marker` appears in the body.
pub fn contains(marker: impl Into<String>) -> impl Fn(&str) -> bool {
    let marker = marker.into();
    move |body: &str| body.contains(&marker)
}

/// Condition holds once `marker` is gone from the body. Exact negation of
/// [`contains`] over the same observed body.
pub fn absent(marker: impl Into<String>) -> impl Fn(&str) -> bool {
    let marker = marker.into();
    move |body: &str| !body.contains(&marker)
}

/// Condition holds once the webshop's embedded product JSON reports the
/// given stock count. A trailing digit disqualifies a match, so stock 1
/// does not fire on stock 12.
pub fn stock_level(level: u32) -> impl Fn(&str) -> bool {
    let fragment = format!("\"stock\":{}", level);
    move |body: &str| {
        body.match_indices(&fragment).any(|(idx, m)| {
            body[idx + m.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_ascii_digit())
        })
    }
}

/// Condition holds once the body matches `pattern`.
pub fn matches(pattern: &str) -> Result<impl Fn(&str) -> bool> {
    let re = Regex::new(pattern).map_err(|e| ProbeError::InvalidConfigValueError {
        field: "matches".to_string(),
        value: pattern.to_string(),
        reason: format!("Invalid regex: {}", e),
    })?;
    Ok(move |body: &str| re.is_match(body))
}
