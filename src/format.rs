use jiff::civil::Date;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::Error;
use crate::fetch::RateQuery;

const EUR_INDEX: usize = 0;
const USD_INDEX: usize = 1;

/// Sale and purchase rate of one currency, as published by the rate service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePair {
    pub sale: Value,
    pub purchase: Value,
}

/// EUR and USD rates for a single day.
///
/// Serializes as `{"DD.MM.YYYY": {"EUR": {..}, "USD": {..}}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedRateEntry {
    pub date: String,
    pub eur: RatePair,
    pub usd: RatePair,
}

impl Serialize for FormattedRateEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Currencies<'a> {
            #[serde(rename = "EUR")]
            eur: &'a RatePair,
            #[serde(rename = "USD")]
            usd: &'a RatePair,
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.date,
            &Currencies {
                eur: &self.eur,
                usd: &self.usd,
            },
        )?;
        map.end()
    }
}

/// Reshape the listing fetched for `today - offset` days.
///
/// Currencies are taken by position: entry 0 is EUR and entry 1 is USD.
pub fn format_rate(today: Date, offset: i64, raw: &Value) -> Result<FormattedRateEntry, Error> {
    let rates = raw
        .get("exchangeRate")
        .and_then(Value::as_array)
        .ok_or(Error::MissingRateList)?;

    Ok(FormattedRateEntry {
        date: RateQuery::days_before(today, offset).label(),
        eur: rate_pair(rates, EUR_INDEX)?,
        usd: rate_pair(rates, USD_INDEX)?,
    })
}

/// Reshape every fetched listing, keeping their order.
pub fn format_rates(today: Date, raws: &[Value]) -> Result<Vec<FormattedRateEntry>, Error> {
    (0..)
        .zip(raws)
        .map(|(offset, raw)| format_rate(today, offset, raw))
        .collect()
}

fn rate_pair(rates: &[Value], index: usize) -> Result<RatePair, Error> {
    let entry = rates.get(index).ok_or(Error::MissingCurrency { index })?;
    let field = |field: &'static str| {
        entry
            .get(field)
            .cloned()
            .ok_or(Error::MissingField { index, field })
    };

    Ok(RatePair {
        sale: field("saleRateNB")?,
        purchase: field("purchaseRateNB")?,
    })
}
