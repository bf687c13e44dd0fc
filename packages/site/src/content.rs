//! Content store query client.
//!
//! Read-only, fixed-projection GROQ queries against a Sanity-compatible
//! query API. Like the chain backend, the client is an enum so tests can run
//! against a deterministic in-memory catalog.

use crate::config::Config;
use crate::error::Error;
use drop_types::Collection;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;
use url::Url;

/// Projection shared by both queries.
const PROJECTION: &str = "{ _id, title, address, description, nftCollectionName, \
                           mainImage{asset}, previewImage{asset}, slug{current}, \
                           creator->{_id, name, address, slug{current}} }";

/// Content store backend.
pub enum ContentClient {
    /// Live HTTP query API.
    Sanity(SanityClient),
    /// Fixed in-memory catalog for tests.
    Fixed(Vec<Collection>),
}

impl ContentClient {
    pub fn sanity(config: &Config) -> Result<Self, Error> {
        Ok(Self::Sanity(SanityClient::new(config)?))
    }

    pub fn fixed(collections: Vec<Collection>) -> Self {
        Self::Fixed(collections)
    }

    /// All collections, fixed projection. Query failures are surfaced, not
    /// swallowed: the listing renders a 502 instead of a blank page.
    pub async fn collections(&self) -> Result<Vec<Collection>, Error> {
        match self {
            Self::Sanity(client) => {
                let query = format!("*[_type == 'collection']{PROJECTION}");
                client.fetch(&query, &[]).await
            }
            Self::Fixed(collections) => Ok(collections.clone()),
        }
    }

    /// The single collection matching `slug`, or `None`.
    pub async fn collection_by_slug(&self, slug: &str) -> Result<Option<Collection>, Error> {
        match self {
            Self::Sanity(client) => {
                let query =
                    format!("*[_type == 'collection' && slug.current == $slug][0]{PROJECTION}");
                let param = serde_json::to_string(slug)
                    .map_err(|e| Error::Content(format!("unencodable slug: {e}")))?;
                client.fetch(&query, &[("$slug", param)]).await
            }
            Self::Fixed(collections) => Ok(collections
                .iter()
                .find(|c| c.slug.current == slug)
                .cloned()),
        }
    }

    /// Reachability probe for the health endpoint: the cheapest query the
    /// store will answer.
    pub async fn health_check(&self) -> Result<(), Error> {
        match self {
            Self::Sanity(client) => client
                .fetch::<u64>("count(*[_type == 'collection'])", &[])
                .await
                .map(|_| ()),
            Self::Fixed(_) => Ok(()),
        }
    }

    /// Where queries go, for the health endpoint.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Sanity(client) => client.endpoint.to_string(),
            Self::Fixed(collections) => format!("fixed ({} collections)", collections.len()),
        }
    }
}

/// HTTP client for the hosted query API.
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

#[derive(Deserialize)]
struct QueryEnvelope<T> {
    result: T,
}

impl SanityClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let endpoint = format!(
            "https://{}.apicdn.sanity.io/v{}/data/query/{}",
            config.content_project, config.content_api_version, config.content_dataset
        );
        let endpoint: Url = endpoint
            .parse()
            .map_err(|e| Error::Config(format!("invalid content endpoint {endpoint}: {e}")))?;
        info!(endpoint = %endpoint, "Content client initialized");
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            token: config.content_token.clone(),
        })
    }

    /// Single query entry point: GROQ string plus `$name` params.
    async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let mut request = self
            .http
            .get(self.endpoint.clone())
            .query(&[("query", query)])
            .query(params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Content(format!("query failed: {e}")))?;
        let envelope: QueryEnvelope<T> = response
            .json()
            .await
            .map_err(|e| Error::Content(format!("unexpected query response: {e}")))?;
        Ok(envelope.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drop_types::{AssetPointer, Creator, ImageRef, Slug};

    fn catalog() -> Vec<Collection> {
        vec![Collection {
            id: "c-1".into(),
            title: "Apes".into(),
            description: "A drop of apes".into(),
            address: "0x322d4646152ce06e45A2acab0E37CEF1ec25b7a3".into(),
            collection_name: "APES".into(),
            main_image: ImageRef {
                asset: AssetPointer {
                    reference: "image-aaa-200x200-png".into(),
                },
            },
            preview_image: ImageRef {
                asset: AssetPointer {
                    reference: "image-bbb-400x400-jpg".into(),
                },
            },
            slug: Slug {
                current: "apes".into(),
            },
            creator: Creator {
                id: "u-1".into(),
                name: "Alice".into(),
                address: "0x90F79bf6EB2c4f870365E785982E1f101E93b906".into(),
                slug: Slug {
                    current: "alice".into(),
                },
            },
        }]
    }

    #[tokio::test]
    async fn test_fixed_catalog_by_slug() {
        let client = ContentClient::fixed(catalog());
        let hit = client.collection_by_slug("apes").await.unwrap();
        assert_eq!(hit.unwrap().title, "Apes");
        let miss = client.collection_by_slug("nope").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_fixed_catalog_is_idempotent() {
        let client = ContentClient::fixed(catalog());
        let a = client.collections().await.unwrap();
        let b = client.collections().await.unwrap();
        assert_eq!(a, b);
    }
}
