//! HTTP provider clients.
//!
//! Plain reqwest JSON against a TMDB-shaped credits API and an OMDb-shaped
//! ratings API. Both carry the configured request timeout; a timed-out call
//! maps to [`ProviderError::Timeout`] so the enrichment service can stamp
//! and move on.

use kinodex_model::{CastMember, ItemKind, RatingSummary};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::providers::{
    CreditsProvider, ProviderCredits, ProviderError, ProviderResult,
    ProviderTitle, RatingsProvider,
};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

fn map_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::Parse(err.to_string())
    } else {
        ProviderError::Network(err)
    }
}

/// TMDB v3 client for the credits port.
#[derive(Debug, Clone)]
pub struct TmdbCreditsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbCreditsClient {
    pub fn new(
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Network)?;
        Ok(Self {
            http,
            base_url: TMDB_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn kind_path(kind: ItemKind) -> &'static str {
        match kind {
            ItemKind::Movie => "movie",
            ItemKind::Series => "tv",
        }
    }

    /// GET a JSON document; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(map_transport)?;
        match response.status() {
            status if status.is_success() => {
                Ok(Some(response.json().await.map_err(map_transport)?))
            }
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED => Err(ProviderError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
            status => Err(ProviderError::ApiError(format!(
                "unexpected status {status} from {url}"
            ))),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct TitleDoc {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
}

impl TitleDoc {
    fn into_title(self) -> ProviderTitle {
        let year = self
            .release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|date| date.get(0..4))
            .and_then(|prefix| prefix.parse().ok());
        ProviderTitle {
            provider_id: self.id.to_string(),
            title: self.title.or(self.name).unwrap_or_default(),
            year,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct FindDoc {
    #[serde(default)]
    movie_results: Vec<TitleDoc>,
    #[serde(default)]
    tv_results: Vec<TitleDoc>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct SearchDoc {
    #[serde(default)]
    results: Vec<TitleDoc>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct CreditsDoc {
    #[serde(default)]
    cast: Vec<CastDoc>,
    #[serde(default)]
    crew: Vec<CrewDoc>,
}

#[derive(Debug, serde::Deserialize)]
struct CastDoc {
    name: String,
    #[serde(default)]
    character: Option<String>,
    #[serde(default)]
    order: Option<u32>,
}

#[derive(Debug, serde::Deserialize)]
struct CrewDoc {
    name: String,
    #[serde(default)]
    job: Option<String>,
}

#[async_trait::async_trait]
impl CreditsProvider for TmdbCreditsClient {
    async fn find_by_external_id(
        &self,
        external_id: &str,
        kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>> {
        let path = format!("/{}/{}", Self::kind_path(kind), external_id);
        let doc: Option<TitleDoc> = self.get_json(&path, &[]).await?;
        Ok(doc.map(TitleDoc::into_title))
    }

    async fn find_by_alternate_id(
        &self,
        alternate_id: &str,
        kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>> {
        let path = format!("/find/{alternate_id}");
        let doc: Option<FindDoc> = self
            .get_json(
                &path,
                &[("external_source", "imdb_id".to_string())],
            )
            .await?;
        let Some(doc) = doc else { return Ok(None) };
        let results = match kind {
            ItemKind::Movie => doc.movie_results,
            ItemKind::Series => doc.tv_results,
        };
        Ok(results.into_iter().next().map(TitleDoc::into_title))
    }

    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
        kind: ItemKind,
    ) -> ProviderResult<Vec<ProviderTitle>> {
        let path = format!("/search/{}", Self::kind_path(kind));
        let mut query = vec![("query", title.to_string())];
        if let Some(year) = year {
            let param = match kind {
                ItemKind::Movie => "year",
                ItemKind::Series => "first_air_date_year",
            };
            query.push((param, year.to_string()));
        }
        let doc: Option<SearchDoc> = self.get_json(&path, &query).await?;
        Ok(doc
            .unwrap_or_default()
            .results
            .into_iter()
            .map(TitleDoc::into_title)
            .collect())
    }

    async fn credits(
        &self,
        provider_id: &str,
        kind: ItemKind,
    ) -> ProviderResult<ProviderCredits> {
        let path =
            format!("/{}/{}/credits", Self::kind_path(kind), provider_id);
        let doc: Option<CreditsDoc> = self.get_json(&path, &[]).await?;
        let doc = doc.ok_or(ProviderError::NotFound)?;
        let cast = doc
            .cast
            .into_iter()
            .enumerate()
            .map(|(position, member)| CastMember {
                name: member.name,
                character: member.character,
                order: member.order.unwrap_or(position as u32),
            })
            .collect();
        let director = doc
            .crew
            .into_iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .map(|member| member.name);
        Ok(ProviderCredits { cast, director })
    }
}

/// OMDb client for the ratings port.
#[derive(Debug, Clone)]
pub struct OmdbRatingsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, serde::Deserialize)]
struct OmdbDoc {
    #[serde(rename = "Response")]
    response: String,
    #[serde(default, rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(default, rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(default, rename = "Metascore")]
    metascore: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

impl OmdbDoc {
    fn into_summary(self) -> Option<RatingSummary> {
        if !self.response.eq_ignore_ascii_case("true") {
            return None;
        }
        let summary = RatingSummary {
            imdb_rating: present(self.imdb_rating),
            imdb_votes: present(self.imdb_votes),
            metascore: present(self.metascore),
        };
        (!summary.is_empty()).then_some(summary)
    }
}

impl OmdbRatingsClient {
    pub fn new(
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Network)?;
        Ok(Self {
            http,
            base_url: OMDB_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(
        &self,
        query: &[(&str, String)],
    ) -> ProviderResult<Option<RatingSummary>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(map_transport)?;
        match response.status() {
            status if status.is_success() => {
                let doc: OmdbDoc =
                    response.json().await.map_err(map_transport)?;
                Ok(doc.into_summary())
            }
            StatusCode::UNAUTHORIZED => Err(ProviderError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
            status => Err(ProviderError::ApiError(format!(
                "unexpected status {status} from ratings provider"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl RatingsProvider for OmdbRatingsClient {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> ProviderResult<Option<RatingSummary>> {
        self.fetch(&[("i", external_id.to_string())]).await
    }

    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> ProviderResult<Option<RatingSummary>> {
        let mut query = vec![("t", title.to_string())];
        if let Some(year) = year {
            query.push(("y", year.to_string()));
        }
        self.fetch(&query).await
    }
}
