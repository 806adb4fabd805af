use reqwest::header::USER_AGENT;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::post::{Post, TimeWindow};

const AUTH_BASE: &str = "https://www.reddit.com";
const API_BASE: &str = "https://oauth.reddit.com";
const PAGE_LIMIT: usize = 100;

pub const MIN_TEXT_CHARS: usize = 100;
const REMOVED_MARKERS: [&str; 2] = ["[removed]", "[deleted]"];

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange failed with status {0}")]
    Auth(reqwest::StatusCode),
}

/// Anything that can list the top posts of the configured category.
pub trait PostSource {
    async fn top_posts(&self, window: TimeWindow, limit: usize) -> anyhow::Result<Vec<Post>>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct RedditListing {
    data: RedditListingData,
}

#[derive(Debug, Deserialize)]
struct RedditListingData {
    children: Vec<RedditChild>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RedditChild {
    data: RedditPost,
}

#[derive(Debug, Deserialize)]
struct RedditPost {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    permalink: String,
    created_utc: f64,
    #[serde(default)]
    num_comments: i64,
}

impl From<RedditPost> for Post {
    fn from(p: RedditPost) -> Self {
        Post {
            url: format!("https://reddit.com{}", p.permalink),
            id: p.id,
            title: p.title,
            text: p.selftext,
            score: p.score,
            created_utc: p.created_utc,
            num_comments: p.num_comments,
        }
    }
}

/// Application-only OAuth client for one subreddit.
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    user_agent: String,
    subreddit: String,
    api_base: String,
}

impl RedditClient {
    /// Exchange the configured client credentials for an access token.
    pub async fn connect(config: &Config) -> Result<Self, RedditError> {
        Self::connect_with_base_urls(config, AUTH_BASE, API_BASE).await
    }

    async fn connect_with_base_urls(
        config: &Config,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, RedditError> {
        let client = reqwest::Client::builder().gzip(true).build()?;

        let response = client
            .post(format!("{}/api/v1/access_token", auth_base.trim_end_matches('/')))
            .header(USER_AGENT, &config.user_agent)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RedditError::Auth(response.status()));
        }
        let token: TokenResponse = response.json().await?;
        info!("Authenticated with Reddit as {}", config.user_agent);

        Ok(Self {
            client,
            token: token.access_token,
            user_agent: config.user_agent.clone(),
            subreddit: config.subreddit.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_page(
        &self,
        window: TimeWindow,
        limit: usize,
        after: Option<&str>,
    ) -> Result<RedditListingData, RedditError> {
        let url = format!("{}/r/{}/top", self.api_base, self.subreddit);
        let mut query = vec![
            ("t", window.as_str().to_string()),
            ("limit", limit.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let listing: RedditListing = self
            .client
            .get(&url)
            .query(&query)
            .header(USER_AGENT, &self.user_agent)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(listing.data)
    }
}

impl PostSource for RedditClient {
    async fn top_posts(&self, window: TimeWindow, limit: usize) -> anyhow::Result<Vec<Post>> {
        info!(
            "Fetching top {} posts of the {} from r/{}",
            limit, window, self.subreddit
        );
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let want = (limit - posts.len()).min(PAGE_LIMIT);
            let page = self.fetch_page(window, want, after.as_deref()).await?;
            let received = page.children.len();
            posts.extend(page.children.into_iter().map(|c| Post::from(c.data)));
            debug!("Received {} posts (total {})", received, posts.len());

            match page.after {
                Some(next) if received > 0 => after = Some(next),
                _ => break,
            }
        }
        posts.truncate(limit);
        Ok(posts)
    }
}

/// Whether a post body is worth narrating.
pub fn is_narratable(text: &str) -> bool {
    text.chars().count() >= MIN_TEXT_CHARS && !REMOVED_MARKERS.contains(&text)
}

/// Fetch up to `limit` top posts and drop the ones too short or removed.
pub async fn fetch_candidates<S: PostSource>(
    source: &S,
    window: TimeWindow,
    limit: usize,
) -> anyhow::Result<Vec<Post>> {
    let posts = source.top_posts(window, limit).await?;
    let fetched = posts.len();
    let candidates: Vec<Post> = posts
        .into_iter()
        .filter(|post| {
            let keep = is_narratable(&post.text);
            if !keep {
                debug!("Skipping post (too short or removed): {}", post.title);
            }
            keep
        })
        .collect();
    if candidates.is_empty() && fetched > 0 {
        warn!("All {} fetched posts were filtered out", fetched);
    }
    info!("{} of {} fetched posts are candidates", candidates.len(), fetched);
    Ok(candidates)
}
