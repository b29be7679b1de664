//! Hosted store client speaking PostgREST over HTTP.
//!
//! Tables are reached at `{base_url}/rest/v1/{table}`. Every request carries
//! the project API key; portfolio requests additionally carry the user's
//! access token so the store's row-level policies see the right user.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::{CARDS_TABLE, PORTFOLIO_TABLE, PRICES_TABLE, REST_PAGE_SIZE};
use crate::error::{MarketError, Result};
use crate::models::{Card, Holding, PriceObservation, UserSession};
use crate::store::records::{validate_rows, CardRecord, HoldingRecord, PriceRecord};
use crate::store::{check_owner, PriceStore};

/// [`PriceStore`] backed by a hosted PostgREST endpoint.
pub struct RestStore {
    base_url: String,
    api_key: String,
    client: Client,
}

impl RestStore {
    /// Create a client for the project at `base_url` (e.g.
    /// `https://xyz.supabase.co`) authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return Err(MarketError::InvalidArgument(
                "store URL and API key are required".into(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach the API key and a bearer token (user token, else the key).
    fn authorize(&self, req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(token.unwrap_or(&self.api_key))
    }

    fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<Vec<T>> {
        let url = self.table_url(table);
        tracing::debug!(%url, ?query, "fetching rows");
        let req = self.client.get(&url).query(&[("select", "*")]).query(query);
        let resp = send(self.authorize(req, token), table)?;
        Ok(resp.json()?)
    }

    /// Like [`select`](Self::select), paging past the server's row cap.
    fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        max_rows: usize,
        token: Option<&str>,
    ) -> Result<Vec<T>> {
        collect_pages(REST_PAGE_SIZE, max_rows, |offset, limit| {
            let mut paged = query.to_vec();
            paged.push(("limit", limit.to_string()));
            paged.push(("offset", offset.to_string()));
            self.select(table, &paged, token)
        })
    }
}

impl PriceStore for RestStore {
    fn cards(&self) -> Result<Vec<Card>> {
        let rows: Vec<CardRecord> = self.select_all(
            CARDS_TABLE,
            &[("order", "name.asc,card_id.asc".into())],
            usize::MAX,
            None,
        )?;
        Ok(validate_rows(rows, CARDS_TABLE))
    }

    fn card_history(&self, card_id: &str) -> Result<Vec<PriceObservation>> {
        let rows: Vec<PriceRecord> = self.select_all(
            PRICES_TABLE,
            &[
                ("card_id", format!("eq.{}", card_id)),
                ("order", "recorded_at.asc".into()),
            ],
            usize::MAX,
            None,
        )?;
        let mut history: Vec<PriceObservation> = validate_rows(rows, PRICES_TABLE);
        history.sort_by_key(|o| o.recorded_at);
        Ok(history)
    }

    fn recent_prices(&self, limit: usize) -> Result<Vec<PriceObservation>> {
        let rows: Vec<PriceRecord> = self.select_all(
            PRICES_TABLE,
            &[("order", "recorded_at.desc".into())],
            limit,
            None,
        )?;
        Ok(validate_rows(rows, PRICES_TABLE))
    }

    fn holdings(&self, session: &UserSession) -> Result<Vec<Holding>> {
        let rows: Vec<HoldingRecord> = self.select_all(
            PORTFOLIO_TABLE,
            &[
                ("user_id", format!("eq.{}", session.user_id)),
                ("order", "card_id.asc".into()),
            ],
            usize::MAX,
            session.access_token.as_deref(),
        )?;
        Ok(validate_rows(rows, PORTFOLIO_TABLE))
    }

    fn upsert_holding(&self, session: &UserSession, holding: &Holding) -> Result<()> {
        check_owner(session, holding)?;
        let req = self
            .client
            .post(self.table_url(PORTFOLIO_TABLE))
            .query(&[("on_conflict", "user_id,card_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[HoldingRecord::from(holding)]);
        send(self.authorize(req, session.access_token.as_deref()), PORTFOLIO_TABLE)?;
        tracing::debug!(
            user_id = %session.user_id,
            card_id = %holding.card_id,
            quantity = holding.quantity,
            "upserted holding"
        );
        Ok(())
    }

    fn delete_holding(&self, session: &UserSession, card_id: &str) -> Result<()> {
        let req = self.client.delete(self.table_url(PORTFOLIO_TABLE)).query(&[
            ("user_id", format!("eq.{}", session.user_id)),
            ("card_id", format!("eq.{}", card_id)),
        ]);
        send(self.authorize(req, session.access_token.as_deref()), PORTFOLIO_TABLE)?;
        Ok(())
    }
}

/// Gather up to `max_rows` rows, `page_size` at a time.
///
/// `fetch(offset, limit)` returns one page. A page shorter than requested
/// ends the scan, so a server-side row cap below `page_size` also ends it
/// early; keep `page_size` at or under the server's `max-rows`.
pub fn collect_pages<T, F>(page_size: usize, max_rows: usize, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Result<Vec<T>>,
{
    if page_size == 0 {
        return Err(MarketError::InvalidArgument("page size must be positive".into()));
    }
    let mut rows = Vec::new();
    while rows.len() < max_rows {
        let want = page_size.min(max_rows - rows.len());
        let page = fetch(rows.len(), want)?;
        let got = page.len();
        rows.extend(page.into_iter().take(want));
        if got < want {
            break;
        }
    }
    Ok(rows)
}

/// Send a request, turning error statuses into upstream errors.
pub(crate) fn send(req: RequestBuilder, what: &str) -> Result<reqwest::blocking::Response> {
    let resp = req.send()?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(upstream_error(status, what, &body))
}

fn upstream_error(status: StatusCode, what: &str, body: &str) -> MarketError {
    let detail = body.trim();
    if detail.is_empty() {
        MarketError::UpstreamUnavailable(format!("{} returned {}", what, status))
    } else {
        MarketError::UpstreamUnavailable(format!("{} returned {}: {}", what, status, detail))
    }
}
