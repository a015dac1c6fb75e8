use std::collections::HashMap;
use std::path::PathBuf;

const SEARCH_URL_ENV: &str = "SEARCHDECK_SEARCH_URL";
const RESOURCE_URL_ENV: &str = "SEARCHDECK_RESOURCE_URL";
const LLM_BASE_URL_ENV: &str = "SEARCHDECK_LLM_BASE_URL";
const LLM_KEY_ENV: &str = "SEARCHDECK_LLM_KEY";
const INDEX_ID_ENV: &str = "SEARCHDECK_INDEX_ID";
const SHARE_BASE_ENV: &str = "SEARCHDECK_SHARE_BASE";
const ASSETS_DIR_ENV: &str = "SEARCHDECK_ASSETS_DIR";

pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Environment-sourced defaults for a console invocation. Everything here is
/// optional; command-line flags override these, and whatever is still
/// missing at submit time is caught by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub search_url: Option<String>,
    pub resource_url: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_key: Option<String>,
    pub index_id: Option<String>,
    pub share_base: Option<String>,
    pub assets_dir: PathBuf,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env_map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let assets_dir = non_empty(&env_map, ASSETS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));

        Self {
            search_url: non_empty(&env_map, SEARCH_URL_ENV),
            resource_url: non_empty(&env_map, RESOURCE_URL_ENV),
            llm_base_url: non_empty(&env_map, LLM_BASE_URL_ENV),
            llm_key: non_empty(&env_map, LLM_KEY_ENV),
            index_id: non_empty(&env_map, INDEX_ID_ENV),
            share_base: non_empty(&env_map, SHARE_BASE_ENV),
            assets_dir,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_pairs(std::iter::empty::<(String, String)>())
    }
}

fn non_empty(env_map: &HashMap<String, String>, name: &str) -> Option<String> {
    env_map
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
