//! PA-API credentials, read from the process environment.

use crate::error::{Error, Result};
use std::fmt;

pub const ACCESS_KEY_VAR: &str = "PAAPI_ACCESS_KEY";
pub const SECRET_KEY_VAR: &str = "PAAPI_SECRET_KEY";
pub const PARTNER_TAG_VAR: &str = "PAAPI_PARTNER_TAG";

/// Access key, secret key and Associates partner tag.
///
/// Held in memory for one run only. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
    partner_tag: String,
}

impl Credentials {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        partner_tag: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            partner_tag: partner_tag.into(),
        }
    }

    /// Reads all three variables from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads all three variables through `lookup`.
    ///
    /// Values are trimmed; a blank value counts as missing. The error lists every
    /// missing variable, not just the first.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let access_key = read(ACCESS_KEY_VAR);
        let secret_key = read(SECRET_KEY_VAR);
        let partner_tag = read(PARTNER_TAG_VAR);

        match (access_key, secret_key, partner_tag) {
            (Some(access_key), Some(secret_key), Some(partner_tag)) => {
                Ok(Self { access_key, secret_key, partner_tag })
            }
            (access_key, secret_key, partner_tag) => {
                let missing: Vec<&str> = [
                    (ACCESS_KEY_VAR, access_key.is_none()),
                    (SECRET_KEY_VAR, secret_key.is_none()),
                    (PARTNER_TAG_VAR, partner_tag.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();

                Err(Error::config(format!(
                    "missing required environment variable(s): {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn partner_tag(&self) -> &str {
        &self.partner_tag
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("partner_tag", &self.partner_tag)
            .finish()
    }
}

/// Partner tag alone, for runs that render without calling the API.
pub fn partner_tag_from_env() -> Option<String> {
    std::env::var(PARTNER_TAG_VAR).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_present() {
        let creds = Credentials::from_lookup(lookup(&[
            (ACCESS_KEY_VAR, "AKIA123"),
            (SECRET_KEY_VAR, " secret \n"),
            (PARTNER_TAG_VAR, "deals-20"),
        ]))
        .unwrap();

        assert_eq!(creds.access_key(), "AKIA123");
        assert_eq!(creds.secret_key(), "secret");
        assert_eq!(creds.partner_tag(), "deals-20");
    }

    #[test]
    fn test_each_missing_variable_fails() {
        let all = [(ACCESS_KEY_VAR, "a"), (SECRET_KEY_VAR, "s"), (PARTNER_TAG_VAR, "t")];

        for skip in 0..all.len() {
            let vars: Vec<(&str, &str)> =
                all.iter().enumerate().filter(|(i, _)| *i != skip).map(|(_, v)| *v).collect();

            let err = Credentials::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)));
            assert!(err.to_string().contains(all[skip].0));
        }
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let err = Credentials::from_lookup(lookup(&[
            (ACCESS_KEY_VAR, "a"),
            (SECRET_KEY_VAR, "   "),
            (PARTNER_TAG_VAR, ""),
        ]))
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains(SECRET_KEY_VAR));
        assert!(msg.contains(PARTNER_TAG_VAR));
        assert!(!msg.contains(ACCESS_KEY_VAR));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("AKIA123", "super-secret", "deals-20");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIA123"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret"));
    }
}
