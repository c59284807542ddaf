use anyhow::bail;
use anyhow::Result;
use taleweave_client::StoryClientFactory;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StoryClientBox;

pub struct StoryClientManager {}

impl StoryClientManager {
    pub fn get() -> Result<StoryClientBox> {
        let url = Config::get(ConfigKey::ServiceUrl);
        if url.trim().is_empty() {
            bail!("Story service URL is not defined");
        }

        let timeout = Config::timeout()?;
        tracing::debug!(url = url.as_str(), timeout = timeout.as_secs(), "story client");

        return Ok(StoryClientFactory::create_http_client(url, timeout));
    }
}
