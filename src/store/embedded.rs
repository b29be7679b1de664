//! Embedded DuckDB store with the card, price and portfolio tables.
//!
//! Used for local databases, for ingesting scraped prices and in tests. Reads
//! go through [`SqlBuilder`] and come back as JSON rows, which are then
//! validated into typed models.

use std::collections::HashMap;
use std::path::Path;

use duckdb::{params, types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;

use crate::analytics::trend::{market_series, trailing_trend, TrendWindow};
use crate::config::{CARDS_TABLE, PORTFOLIO_TABLE, PRICES_TABLE};
use crate::error::{MarketError, Result};
use crate::models::{normalize_market, Card, Holding, PriceObservation, UserSession};
use crate::sql_builder::SqlBuilder;
use crate::store::records::{validate_rows, CardRecord, HoldingRecord, PriceRecord};
use crate::store::{check_owner, PriceStore};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cards (
        card_id     VARCHAR PRIMARY KEY,
        name        VARCHAR NOT NULL,
        is_showcase BOOLEAN,
        set_code    VARCHAR,
        rarity      VARCHAR,
        domain      VARCHAR,
        cost        BIGINT,
        ability     VARCHAR,
        image_url   VARCHAR
    );
    CREATE TABLE IF NOT EXISTS card_prices (
        card_id     VARCHAR NOT NULL,
        language    VARCHAR NOT NULL,
        recorded_at VARCHAR NOT NULL,
        price_low   DOUBLE NOT NULL,
        price_trend DOUBLE
    );
    CREATE TABLE IF NOT EXISTS portfolio (
        user_id        VARCHAR NOT NULL,
        card_id        VARCHAR NOT NULL,
        quantity       BIGINT NOT NULL,
        purchase_price DOUBLE NOT NULL,
        PRIMARY KEY (user_id, card_id)
    );
";

/// A DuckDB database holding the market tables.
pub struct DuckDbStore {
    conn: DuckDbConnection,
    trend_window: TrendWindow,
}

impl DuckDbStore {
    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(DuckDbConnection::open_in_memory()?)
    }

    /// Open (or create) a database file, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        tracing::debug!(path = %path.display(), "opening market database");
        Self::init(DuckDbConnection::open(path)?)
    }

    fn init(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            trend_window: TrendWindow::default(),
        })
    }

    /// Window used by [`record_observation`](Self::record_observation) when
    /// the observation carries no trend.
    pub fn with_trend_window(mut self, window: TrendWindow) -> Result<Self> {
        window.validate()?;
        self.trend_window = window;
        Ok(self)
    }

    pub fn trend_window(&self) -> TrendWindow {
        self.trend_window
    }

    // -- Ingestion ---------------------------------------------------------

    /// Insert a card, replacing any previous row with the same id.
    pub fn insert_card(&self, card: &Card) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO cards \
             (card_id, name, is_showcase, set_code, rarity, domain, cost, ability, image_url) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                card.card_id,
                card.name,
                card.is_showcase,
                card.set_code,
                card.rarity,
                card.domain,
                card.cost,
                card.ability,
                card.image_url,
            ],
        )?;
        Ok(())
    }

    /// Append a price observation.
    ///
    /// When the observation has no trend, the trailing average over the
    /// card's earlier observations in the same market (plus this one) is
    /// computed and stored with it. Returns the row as stored.
    pub fn record_observation(&self, obs: &PriceObservation) -> Result<PriceObservation> {
        if !obs.price_low.is_finite() || obs.price_low < 0.0 {
            return Err(MarketError::InvalidArgument(format!(
                "price_low must be a non-negative amount, got {}",
                obs.price_low
            )));
        }

        let mut stored = obs.clone();
        stored.market = normalize_market(&obs.market);
        if stored.price_trend.is_none() {
            let mut series: Vec<PriceObservation> =
                market_series(&self.card_history(&stored.card_id)?, &stored.market)
                    .into_iter()
                    .filter(|o| o.recorded_at <= stored.recorded_at)
                    .collect();
            series.push(stored.clone());
            stored.price_trend = trailing_trend(&series, self.trend_window)?
                .last()
                .map(|p| p.trend);
        }

        let row = PriceRecord::from(&stored);
        self.conn.execute(
            "INSERT INTO card_prices (card_id, language, recorded_at, price_low, price_trend) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                row.card_id,
                row.language,
                row.recorded_at,
                row.price_low,
                row.price_trend,
            ],
        )?;
        tracing::debug!(
            card_id = %stored.card_id,
            market = %stored.market,
            price = stored.price_low,
            "recorded price observation"
        );
        Ok(stored)
    }

    // -- Raw queries -------------------------------------------------------

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let stmt_ref = rows_result
            .as_ref()
            .ok_or_else(|| MarketError::InvalidArgument("statement did not execute".into()))?;
        let column_names: Vec<String> = stmt_ref
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter().collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

impl PriceStore for DuckDbStore {
    fn cards(&self) -> Result<Vec<Card>> {
        let (sql, params) = SqlBuilder::new(CARDS_TABLE)
            .order_by(&["name ASC", "card_id ASC"])
            .build();
        let rows: Vec<CardRecord> = self.execute_into(&sql, &params)?;
        Ok(validate_rows(rows, CARDS_TABLE))
    }

    fn card_history(&self, card_id: &str) -> Result<Vec<PriceObservation>> {
        let (sql, params) = SqlBuilder::new(PRICES_TABLE)
            .where_eq("card_id", card_id)
            .order_by(&["recorded_at ASC"])
            .build();
        let rows: Vec<PriceRecord> = self.execute_into(&sql, &params)?;
        let mut history: Vec<PriceObservation> = validate_rows(rows, PRICES_TABLE);
        history.sort_by_key(|o| o.recorded_at);
        Ok(history)
    }

    fn recent_prices(&self, limit: usize) -> Result<Vec<PriceObservation>> {
        let (sql, params) = SqlBuilder::new(PRICES_TABLE)
            .order_by(&["recorded_at DESC"])
            .limit(limit)
            .build();
        let rows: Vec<PriceRecord> = self.execute_into(&sql, &params)?;
        Ok(validate_rows(rows, PRICES_TABLE))
    }

    fn holdings(&self, session: &UserSession) -> Result<Vec<Holding>> {
        let (sql, params) = SqlBuilder::new(PORTFOLIO_TABLE)
            .where_eq("user_id", &session.user_id)
            .order_by(&["card_id ASC"])
            .build();
        let rows: Vec<HoldingRecord> = self.execute_into(&sql, &params)?;
        Ok(validate_rows(rows, PORTFOLIO_TABLE))
    }

    fn upsert_holding(&self, session: &UserSession, holding: &Holding) -> Result<()> {
        check_owner(session, holding)?;
        let row = HoldingRecord::from(holding);
        self.conn.execute(
            "INSERT INTO portfolio (user_id, card_id, quantity, purchase_price) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, card_id) DO UPDATE SET \
             quantity = EXCLUDED.quantity, purchase_price = EXCLUDED.purchase_price",
            params![row.user_id, row.card_id, row.quantity, row.purchase_price],
        )?;
        Ok(())
    }

    fn delete_holding(&self, session: &UserSession, card_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM portfolio WHERE user_id = ? AND card_id = ?",
            params![session.user_id, card_id],
        )?;
        Ok(())
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // May not fit in i64
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        // The market tables store timestamps as text; other types are not read
        _ => serde_json::Value::Null,
    }
}
