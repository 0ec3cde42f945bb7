use super::response::related_dcids;
use crate::config::{ApiKey, LookupConfig};
use crate::error::{Result, SchemascopeError};
use async_trait::async_trait;
use reqwest::Client;
use schemascope_api::{LookupError, LookupResult, LookupService, Relation};
use tracing::debug;
use url::Url;

const ERROR_BODY_LIMIT: usize = 200;

/// HTTP client for the Data Commons v2 `node` endpoint.
pub struct DataCommonsClient {
    http: Client,
    endpoint: Url,
    api_key: ApiKey,
}

impl DataCommonsClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        let mut endpoint = Url::parse(&config.base_url)?;
        endpoint
            .path_segments_mut()
            .map_err(|_| {
                SchemascopeError::Config(format!("'{}' cannot be a base URL", config.base_url))
            })?
            .pop_if_empty()
            .extend(["v2", "node"]);

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_url(&self, node: &str, relation: &Relation) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            if !self.api_key.is_empty() {
                query.append_pair("key", self.api_key.expose());
            }
            query
                .append_pair("nodes", node)
                .append_pair("property", &relation.expression());
        }
        url
    }
}

fn transport(err: reqwest::Error) -> LookupError {
    // The request URL carries the API key
    LookupError::Transport(err.without_url().to_string())
}

#[async_trait]
impl LookupService for DataCommonsClient {
    async fn related(&self, node: &str, relation: &Relation) -> LookupResult<Vec<String>> {
        if node.is_empty() {
            return Err(LookupError::InvalidArgument("empty node identifier".into()));
        }

        debug!(node, relation = %relation, "Data Commons lookup");
        let response = self
            .http
            .get(self.request_url(node, relation))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))?;

        let related = related_dcids(&value, node, &relation.property);
        debug!(node, count = related.len(), "Data Commons lookup done");
        Ok(related)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str, key: &str) -> DataCommonsClient {
        DataCommonsClient::new(&LookupConfig {
            api_key: ApiKey::new(key),
            base_url: base.to_string(),
            ..LookupConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_url_encodes_property() {
        let c = client("https://api.datacommons.org", "k1");
        let url = c.request_url("Thing", &Relation::subclasses());
        assert_eq!(
            url.as_str(),
            "https://api.datacommons.org/v2/node?key=k1&nodes=Thing&property=%3C-subClassOf"
        );
    }

    #[test]
    fn test_base_with_path_and_trailing_slash() {
        let c = client("http://127.0.0.1:9000/proxy/", "");
        assert_eq!(c.endpoint().as_str(), "http://127.0.0.1:9000/proxy/v2/node");
        let url = c.request_url("dc/Person", &Relation::subclasses());
        assert_eq!(url.query(), Some("nodes=dc%2FPerson&property=%3C-subClassOf"));
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = DataCommonsClient::new(&LookupConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..LookupConfig::default()
        });
        assert!(matches!(result, Err(SchemascopeError::Config(_))));
    }
}
