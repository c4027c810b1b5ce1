use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;

// Identifiable defines common traits that can be shared by stored records
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Configuration abstracts circulation policy knobs for a library branch
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub loan_days: i64,
    pub renewal_days: i64,
    pub max_renewals: u32,
    pub max_unpaid_penalties: f64,
    pub max_late_returns: u32,
    pub due_soon_days: i64,
    pub membership_days: i64,
    pub sweep_interval_secs: u64,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            loan_days: 14,
            renewal_days: 14,
            max_renewals: 2,
            max_unpaid_penalties: 10.0,
            max_late_returns: 3,
            due_soon_days: 1,
            membership_days: 365,
            sweep_interval_secs: 3600,
        }
    }

    /// Loads the configuration from `LMS_*` environment variables layered over the defaults,
    /// e.g. `LMS_LOAN_DAYS=21` or `LMS_BRANCH_ID=north`.
    pub fn load() -> LibraryResult<Self> {
        Self::load_from(Environment::with_prefix("LMS").try_parsing(true))
    }

    pub(crate) fn load_from(env: Environment) -> LibraryResult<Self> {
        let defaults = Configuration::new("main");
        let config = Config::builder()
            .set_default("branch_id", defaults.branch_id)?
            .set_default("loan_days", defaults.loan_days)?
            .set_default("renewal_days", defaults.renewal_days)?
            .set_default("max_renewals", defaults.max_renewals)?
            .set_default("max_unpaid_penalties", defaults.max_unpaid_penalties)?
            .set_default("max_late_returns", defaults.max_late_returns)?
            .set_default("due_soon_days", defaults.due_soon_days)?
            .set_default("membership_days", defaults.membership_days)?
            .set_default("sweep_interval_secs", defaults.sweep_interval_secs)?
            .add_source(env)
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new("main")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use config::Environment;
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!("test", config.branch_id.as_str());
        assert_eq!(14, config.loan_days);
        assert_eq!(14, config.renewal_days);
        assert_eq!(2, config.max_renewals);
        assert_eq!(10.0, config.max_unpaid_penalties);
        assert_eq!(3, config.max_late_returns);
        assert_eq!(1, config.due_soon_days);
    }

    #[tokio::test]
    async fn test_should_load_defaults_without_overrides() {
        let env = Environment::with_prefix("LMS").try_parsing(true).source(Some(HashMap::new()));
        let config = Configuration::load_from(env).expect("should load config");
        assert_eq!(Configuration::new("main"), config);
    }

    #[tokio::test]
    async fn test_should_load_overrides_from_environment() {
        let vars = HashMap::from([
            ("LMS_LOAN_DAYS".to_string(), "21".to_string()),
            ("LMS_BRANCH_ID".to_string(), "north".to_string()),
        ]);
        let env = Environment::with_prefix("LMS").try_parsing(true).source(Some(vars));
        let config = Configuration::load_from(env).expect("should load config");
        assert_eq!(21, config.loan_days);
        assert_eq!("north", config.branch_id.as_str());
        assert_eq!(14, config.renewal_days);
    }
}
