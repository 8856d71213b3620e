use std::env;

#[cfg(not(test))]
pub const API_KEY_ENV: &str = "LEADGRID_API_KEY";
#[cfg(test)]
pub const API_KEY_ENV: &str = "TEST_LEADGRID_API_KEY";

/// API key for the listings backend. Never written to the config file.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.masked_key())
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            api_key: get_api_key(),
        }
    }

    /// Explicit key wins over the environment
    pub fn resolve(explicit: Option<String>) -> Self {
        match explicit.filter(|key| !key.is_empty()) {
            Some(key) => Self { api_key: Some(key) },
            None => Self::from_env(),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Key with everything but the last four characters hidden
    pub fn masked_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = chars.len().min(4);
            let tail: String = chars[chars.len() - visible..].iter().collect();
            format!("{}{}", "*".repeat(chars.len() - visible), tail)
        })
    }
}

pub fn get_api_key() -> Option<String> {
    env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty())
}
