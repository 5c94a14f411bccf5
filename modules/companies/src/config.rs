use serde::{Deserialize, Serialize};
use shaping_core::PageLimits;

/// Configuration for the companies module (`modules.companies` in the config file)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompaniesConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Insert the demo companies when the database is empty.
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl Default for CompaniesConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            seed_demo_data: false,
        }
    }
}

impl CompaniesConfig {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

fn default_page_size() -> u32 {
    shaping_core::DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    shaping_core::MAX_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: CompaniesConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg, CompaniesConfig::default());
        assert_eq!(cfg.limits(), PageLimits::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res = serde_json::from_value::<CompaniesConfig>(serde_json::json!({"page": 3}));
        assert!(res.is_err());
    }
}
