use super::{Artifact, MediaFetcher, choose_new};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use tokio::task;

const RANDOM_ENDPOINT: &str = "https://api.tenor.com/v1/random";
const SOURCE_NAME: &str = "GIF";
const BATCH_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
struct RandomResponse {
    #[serde(default)]
    results: Vec<RandomResult>,
}

#[derive(Debug, Deserialize)]
struct RandomResult {
    #[serde(default)]
    media: Vec<MediaFormats>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MediaFormats {
    gif: Option<MediaFile>,
}

#[derive(Debug, Deserialize)]
struct MediaFile {
    url: String,
}

#[derive(Debug, Clone)]
pub struct TenorFetcher {
    api_key: String,
}

impl TenorFetcher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    fn request(api_key: &str, tag: Option<&str>) -> anyhow::Result<Vec<Artifact>> {
        let limit = BATCH_LIMIT.to_string();
        let mut request = ureq::get(RANDOM_ENDPOINT)
            .query("key", api_key)
            .query("limit", &limit)
            .query("contentfilter", "high")
            .query("media_filter", "minimal")
            .query("ar_range", "standard");
        if let Some(tag) = tag {
            request = request.query("q", tag);
        }
        let response: RandomResponse = request.call()?.into_json()?;
        Ok(parse_results(response))
    }
}

fn parse_results(response: RandomResponse) -> Vec<Artifact> {
    response
        .results
        .into_iter()
        .filter_map(|result| {
            let url = result.media.into_iter().next()?.gif?.url;
            Some(Artifact {
                identity: url,
                source: SOURCE_NAME.to_string(),
                tags: result.tags,
            })
        })
        .collect()
}

#[async_trait]
impl MediaFetcher for TenorFetcher {
    async fn fetch_candidate(
        &self,
        tag: Option<&str>,
        exclude: &HashSet<String>,
    ) -> Option<Artifact> {
        let api_key = self.api_key.clone();
        let query = tag.map(str::to_string);
        let candidates =
            match task::spawn_blocking(move || Self::request(&api_key, query.as_deref())).await {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(err)) => {
                    log::warn!("tenor request failed: {err}");
                    return None;
                }
                Err(err) => {
                    log::warn!("tenor request task failed: {err}");
                    return None;
                }
            };
        log::debug!("tenor returned {} candidates", candidates.len());
        choose_new(candidates, exclude, &mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gif_urls_and_tags() {
        let body = r#"{
            "results": [
                {"media": [{"gif": {"url": "https://media.tenor.com/a.gif"}}], "tags": ["cat", "funny"]},
                {"media": [], "tags": ["empty"]},
                {"media": [{"tinygif": {"url": "https://media.tenor.com/tiny.gif"}}]},
                {"media": [{"gif": {"url": "https://media.tenor.com/b.gif"}}]}
            ],
            "next": "0"
        }"#;
        let response: RandomResponse = serde_json::from_str(body).expect("valid body");
        let artifacts = parse_results(response);
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].identity, "https://media.tenor.com/a.gif");
        assert_eq!(artifacts[0].tags, vec!["cat", "funny"]);
        assert_eq!(artifacts[0].source, "GIF");
        assert!(artifacts[1].tags.is_empty());
    }

    #[test]
    fn missing_results_is_empty() {
        let response: RandomResponse = serde_json::from_str("{}").expect("valid body");
        assert!(parse_results(response).is_empty());
    }
}
