//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::query::PageResetPolicy;
use crate::domain::types::{PageSize, SortOrder};

fn default_quiet_period_ms() -> u64 {
    500
}

fn default_page_size_options() -> Vec<usize> {
    vec![10, 20, 30, 40, 50]
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
/// Settings shared by every list view built on the query controller.
pub struct TableConfig {
    /// Quiet period after the last keystroke before a search commits.
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,
    #[serde(default)]
    pub default_limit: PageSize,
    /// Choices offered by the rows-per-page selector.
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
    #[serde(default)]
    pub default_sort_order: SortOrder,
    #[serde(default)]
    pub page_reset: PageResetPolicy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: default_quiet_period_ms(),
            default_limit: PageSize::DEFAULT,
            page_size_options: default_page_size_options(),
            default_sort_order: SortOrder::Desc,
            page_reset: PageResetPolicy::ResetToFirst,
        }
    }
}

impl TableConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

#[cfg(feature = "runtime")]
mod loader {
    use std::path::Path;

    use config::{Config, ConfigError, Environment, File};

    use super::TableConfig;

    impl TableConfig {
        /// Loads `{dir}/default.yaml`, then the optional `{dir}/{app_env}.yaml`
        /// overrides, then `APP_`-prefixed environment variables.
        pub fn load(dir: &Path, app_env: &str) -> Result<Self, ConfigError> {
            let settings = Config::builder()
                .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
                .add_source(File::with_name(&dir.join(app_env).to_string_lossy()).required(false))
                .add_source(Environment::with_prefix("APP"))
                .build()?;

            let table_config = settings.try_deserialize::<TableConfig>()?;

            if !table_config.page_size_options.is_empty()
                && !table_config
                    .page_size_options
                    .contains(&table_config.default_limit.get())
            {
                return Err(ConfigError::Message(format!(
                    "default_limit {} is not one of page_size_options {:?}",
                    table_config.default_limit, table_config.page_size_options
                )));
            }

            Ok(table_config)
        }
    }
}
