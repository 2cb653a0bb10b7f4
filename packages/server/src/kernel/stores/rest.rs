//! Board store backed by a managed backend's REST query API.
//!
//! Speaks the PostgREST dialect (`/rest/v1/<table>`, `select=` embedding,
//! `apikey` + bearer headers, `Prefer: return=representation`).
//!
//! The embedded club of a joined posting comes back as an object, a list or
//! null depending on how the relationship is resolved. `ClubEmbed` accepts all
//! of them and the rows are normalized to `Option<ClubSummary>` right here, so
//! nothing downstream ever sees the wire shape.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::common::utils::fold_case;
use crate::common::{ClubId, PostingId};
use crate::domains::clubs::models::{ClubSummary, NewClub};
use crate::domains::postings::models::{NewPosting, Posting, PostingWithClub};
use crate::error::{BoardError, Result};
use crate::kernel::traits::BaseBoardStore;

const POSTING_SELECT: &str = "id,title,category,description,deadline,apply_url,ig_post_url,club_id,created_at,\
clubs:club_id(id,name,category,logo_url,ig_handle,verified)";

const INSERTED_POSTING_SELECT: &str =
    "id,club_id,title,category,description,deadline,apply_url,ig_post_url,created_at";

// =============================================================================
// Wire types
// =============================================================================

/// The embedded club as it may arrive on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum ClubEmbed {
    One(ClubSummary),
    Many(Vec<ClubSummary>),
    #[default]
    Missing,
}

impl ClubEmbed {
    fn into_summary(self) -> Option<ClubSummary> {
        match self {
            ClubEmbed::One(club) => Some(club),
            ClubEmbed::Many(clubs) => clubs.into_iter().next(),
            ClubEmbed::Missing => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostingRecord {
    id: PostingId,
    #[serde(default)]
    club_id: Option<ClubId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    deadline: Option<NaiveDate>,
    #[serde(default)]
    apply_url: Option<String>,
    #[serde(default)]
    ig_post_url: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    clubs: ClubEmbed,
}

impl From<PostingRecord> for PostingWithClub {
    fn from(record: PostingRecord) -> Self {
        Self {
            id: record.id,
            club_id: record.club_id,
            title: record.title.unwrap_or_default(),
            category: record.category,
            description: record.description.unwrap_or_default(),
            deadline: record.deadline,
            apply_url: record.apply_url.unwrap_or_default(),
            ig_post_url: record.ig_post_url.unwrap_or_default(),
            created_at: record.created_at,
            club: record.clubs.into_summary(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdRecord<T> {
    id: T,
}

#[derive(Debug, Deserialize)]
struct InsertedPosting {
    id: PostingId,
    club_id: ClubId,
    title: String,
    category: String,
    description: String,
    deadline: NaiveDate,
    apply_url: String,
    ig_post_url: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InsertedPosting> for Posting {
    type Error = BoardError;

    fn try_from(row: InsertedPosting) -> Result<Self> {
        Ok(Self {
            id: row.id,
            club_id: row.club_id,
            title: row.title,
            category: row.category.parse().map_err(BoardError::remote)?,
            description: row.description,
            deadline: row.deadline,
            apply_url: row.apply_url,
            ig_post_url: row.ig_post_url,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
struct ClubPayload<'a> {
    id: ClubId,
    name: &'a str,
    category: &'a str,
    ig_handle: Option<&'a str>,
    logo_url: Option<&'a str>,
    verified: bool,
}

impl<'a> ClubPayload<'a> {
    fn new(club: &'a NewClub) -> Self {
        Self {
            id: ClubId::new(),
            name: &club.name,
            category: club.category.as_str(),
            ig_handle: club.ig_handle.as_deref(),
            logo_url: club.logo_url.as_deref(),
            verified: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct PostingPayload<'a> {
    id: PostingId,
    club_id: ClubId,
    title: &'a str,
    category: &'a str,
    description: &'a str,
    deadline: NaiveDate,
    apply_url: &'a str,
    ig_post_url: &'a str,
}

/// Error body returned by the query API.
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{}: {}", status, body.trim()),
    }
}

/// `eq` filter on the generated `name_key` column (`lower(btrim(name))`).
fn name_key_filter(name: &str) -> String {
    format!("eq.{}", fold_case(name.trim()))
}

// =============================================================================
// Store
// =============================================================================

/// Board store that talks to the backend's REST query API.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    rest_url: Url,
    api_key: String,
}

impl RestStore {
    /// `base_url` is the project URL (e.g. `https://abc.supabase.co`); tables
    /// are addressed under `/rest/v1/`.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BoardError::remote)?;
        Self::with_client(client, base_url, api_key)
    }

    pub fn with_client(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| BoardError::remote(format!("invalid backend URL '{}': {}", base_url, e)))?;
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| BoardError::remote(format!("invalid backend URL '{}': {}", base_url, e)))?;
        Ok(Self {
            client,
            rest_url,
            api_key: api_key.into(),
        })
    }

    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.rest_url.join(table).map_err(BoardError::remote)?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            warn!(%status, message, "backend rejected request");
            return Err(BoardError::Remote(message));
        }
        response.json::<T>().await.map_err(BoardError::from)
    }

    async fn get<T: DeserializeOwned>(&self, table: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.table_url(table, params)?;
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::read_json(response).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, &str)],
        prefer: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.table_url(table, params)?;
        let response = self
            .authorized(self.client.post(url))
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    fn first<T>(rows: Vec<T>, what: &str) -> Result<T> {
        rows.into_iter()
            .next()
            .ok_or_else(|| BoardError::remote(format!("{} returned no row", what)))
    }
}

#[async_trait]
impl BaseBoardStore for RestStore {
    #[instrument(skip(self))]
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>> {
        let records: Vec<PostingRecord> = self
            .get(
                "postings",
                &[("select", POSTING_SELECT), ("order", "created_at.desc")],
            )
            .await?;
        debug!(count = records.len(), "fetched postings");
        Ok(records.into_iter().map(PostingWithClub::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>> {
        let filter = format!("eq.{}", id);
        let records: Vec<PostingRecord> = self
            .get(
                "postings",
                &[("select", POSTING_SELECT), ("id", &filter), ("limit", "1")],
            )
            .await?;
        Ok(records.into_iter().next().map(PostingWithClub::from))
    }

    #[instrument(skip(self))]
    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>> {
        // `ilike` would read `*` as a wildcard; match the folded name_key exactly
        let rows: Vec<IdRecord<ClubId>> = self
            .get(
                "clubs",
                &[("select", "id"), ("name_key", &name_key_filter(name)), ("limit", "1")],
            )
            .await?;
        Ok(rows.into_iter().next().map(|r| r.id))
    }

    #[instrument(skip(self), fields(name = %club.name))]
    async fn insert_club(&self, club: &NewClub) -> Result<ClubId> {
        let rows: Vec<IdRecord<ClubId>> = self
            .insert(
                "clubs",
                &[("select", "id")],
                "return=representation",
                &ClubPayload::new(club),
            )
            .await?;
        Ok(Self::first(rows, "club insert")?.id)
    }

    #[instrument(skip(self), fields(name = %club.name))]
    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId> {
        // Ignored duplicates come back as an empty list; the unique name_key
        // guarantees the follow-up read sees exactly one row.
        let inserted: Vec<IdRecord<ClubId>> = self
            .insert(
                "clubs",
                &[("select", "id"), ("on_conflict", "name_key")],
                "return=representation,resolution=ignore-duplicates",
                &ClubPayload::new(club),
            )
            .await?;
        if let Some(row) = inserted.into_iter().next() {
            return Ok(row.id);
        }

        let existing: Vec<IdRecord<ClubId>> = self
            .get(
                "clubs",
                &[("select", "id"), ("name_key", &name_key_filter(&club.name)), ("limit", "1")],
            )
            .await?;
        Ok(Self::first(existing, "club upsert")?.id)
    }

    #[instrument(skip(self, posting), fields(club_id = %posting.club_id))]
    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting> {
        let payload = PostingPayload {
            id: PostingId::new(),
            club_id: posting.club_id,
            title: &posting.title,
            category: posting.category.as_str(),
            description: &posting.description,
            deadline: posting.deadline,
            apply_url: &posting.apply_url,
            ig_post_url: &posting.ig_post_url,
        };
        let rows: Vec<InsertedPosting> = self
            .insert(
                "postings",
                &[("select", INSERTED_POSTING_SELECT)],
                "return=representation",
                &payload,
            )
            .await?;
        Self::first(rows, "posting insert")?.try_into()
    }
}
