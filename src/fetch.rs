use futures::future::try_join_all;
use jiff::ToSpan;
use jiff::civil::Date;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::Error;

/// Calendar day to request rates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuery {
    pub date: Date,
}

impl RateQuery {
    /// The day `offset` days before `today`.
    pub fn days_before(today: Date, offset: i64) -> Self {
        Self {
            date: today - offset.days(),
        }
    }

    /// Date as the rate service expects it (`DD.MM.YYYY`).
    pub fn label(&self) -> String {
        self.date.strftime("%d.%m.%Y").to_string()
    }
}

/// Queries for offsets `0..days`, most recent first. Empty when `days <= 0`.
pub fn queries(today: Date, days: i64) -> Vec<RateQuery> {
    (0..days)
        .map(|offset| RateQuery::days_before(today, offset))
        .collect()
}

/// Holds the HTTP client shared by every request of a run.
///
/// The connection pool is released when the service is dropped.
pub struct RateService {
    client: Client,
    base_url: String,
}

impl RateService {
    pub fn open(base_url: &str) -> Result<Self, Error> {
        let client = Client::builder().build().map_err(Error::Client)?;
        debug!(base_url, "opened rate service");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn request_url(&self, query: &RateQuery) -> String {
        format!(
            "{}/p24api/exchange_rates?json&date={}",
            self.base_url,
            query.label()
        )
    }

    /// Fetch the raw rate listing for a single day.
    pub async fn fetch_one(&self, query: RateQuery) -> Result<Value, Error> {
        let url = self.request_url(&query);
        debug!(%url, "requesting rates");

        let resp = self.client.get(&url).send().await?;
        debug!(date = %query.date, status = %resp.status(), "received response");

        Ok(resp.error_for_status()?.json::<Value>().await?)
    }

    /// Fetch every day from `today` back `days - 1` days concurrently.
    ///
    /// Results follow the order of [`queries`], not completion order. The first failing request
    /// fails the whole batch and the requests still in flight are dropped.
    pub async fn fetch_all(&self, today: Date, days: i64) -> Result<Vec<Value>, Error> {
        let queries = queries(today, days);
        info!(count = queries.len(), "fetching exchange rates");

        let rates = try_join_all(queries.into_iter().map(|query| self.fetch_one(query))).await?;
        debug!(count = rates.len(), "all requests completed");
        Ok(rates)
    }
}

impl Drop for RateService {
    fn drop(&mut self) {
        debug!("closed rate service");
    }
}
