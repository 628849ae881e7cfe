use std::sync::RwLock;
use std::time::Duration;

use chrono::DateTime;
use lazy_static::lazy_static;
use log::debug;
use reqwest::{header, Client};
use serde::Deserialize;
use yahoo_finance_api as yahoo;

use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{
    HistoricalBar, HistoryPeriod, NewsArticle, StockQuote,
};
use crate::market_data::market_data_provider::MarketDataProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

/// Price source backed by Yahoo Finance: chart bars through
/// `yahoo_finance_api`, company profile through the quoteSummary endpoint.
pub struct YahooProvider {
    provider: yahoo::YahooConnector,
    client: Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        let provider = yahoo::YahooConnector::new()?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .build()?;

        Ok(YahooProvider { provider, client })
    }

    /// Fetches and caches the session cookie + crumb the quoteSummary
    /// endpoint requires.
    async fn set_crumb(&self) -> Result<(), MarketDataError> {
        let response = self.client.get("https://fc.yahoo.com").send().await?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|header| header.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(value, _)| value))
            .ok_or_else(|| {
                MarketDataError::FetchFailed("could not parse session cookie".to_string())
            })?
            .to_string();

        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await?
            .text()
            .await?;

        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(CrumbData { cookie, crumb });

        Ok(())
    }

    async fn crumb_data(&self) -> Result<CrumbData, MarketDataError> {
        let cached = YAHOO_CRUMB.read().unwrap().clone();
        if let Some(crumb) = cached {
            return Ok(crumb);
        }

        self.set_crumb().await?;
        YAHOO_CRUMB
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| MarketDataError::FetchFailed("crumb not initialized".to_string()))
    }

    async fn fetch_quote_summary(&self, symbol: &str) -> Result<QuoteSummaryNode, MarketDataError> {
        let crumb_data = self.crumb_data().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price,summaryProfile,summaryDetail&crumb={}",
            symbol, crumb_data.crumb
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb_data.cookie)
            .send()
            .await?
            .text()
            .await?;

        let envelope: QuoteSummaryEnvelope = serde_json::from_str(&response)
            .map_err(|e| MarketDataError::FetchFailed(e.to_string()))?;

        envelope
            .quote_summary
            .result
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }

    /// Builds a quote from chart bars alone. Used when the quoteSummary
    /// endpoint is unavailable; profile fields stay empty.
    async fn get_quote_from_bars(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
        let response = self.provider.get_latest_quotes(symbol, "1d").await?;
        let bar = response
            .last_quote()
            .map_err(|_| MarketDataError::NoData(symbol.to_string()))?;

        Ok(StockQuote {
            symbol: symbol.to_string(),
            price: bar.close,
            open: Some(bar.open),
            currency: None,
            company_name: None,
            sector: None,
            industry: None,
            company_summary: None,
            week52_high: None,
            week52_low: None,
        })
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooProvider {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
        let summary = match self.fetch_quote_summary(symbol).await {
            Ok(summary) => summary,
            Err(err) => {
                debug!(
                    "quoteSummary for {} failed ({}), falling back to chart bars",
                    symbol, err
                );
                return self.get_quote_from_bars(symbol).await;
            }
        };

        let price_module = summary
            .price
            .as_ref()
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;

        let price = price_module
            .regular_market_price
            .as_ref()
            .and_then(|p| p.raw)
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;

        let open = price_module
            .regular_market_open
            .as_ref()
            .and_then(|p| p.raw)
            .or_else(|| {
                summary
                    .summary_detail
                    .as_ref()
                    .and_then(|d| d.open.as_ref())
                    .and_then(|p| p.raw)
            });

        Ok(StockQuote {
            symbol: symbol.to_string(),
            price,
            open,
            currency: price_module.currency.clone(),
            company_name: price_module
                .long_name
                .clone()
                .or_else(|| price_module.short_name.clone()),
            sector: summary
                .summary_profile
                .as_ref()
                .and_then(|p| p.sector.clone()),
            industry: summary
                .summary_profile
                .as_ref()
                .and_then(|p| p.industry.clone()),
            company_summary: summary
                .summary_profile
                .as_ref()
                .and_then(|p| p.long_business_summary.clone()),
            week52_high: summary
                .summary_detail
                .as_ref()
                .and_then(|d| d.fifty_two_week_high.as_ref())
                .and_then(|p| p.raw),
            week52_low: summary
                .summary_detail
                .as_ref()
                .and_then(|d| d.fifty_two_week_low.as_ref())
                .and_then(|p| p.raw),
        })
    }

    async fn get_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<HistoricalBar>, MarketDataError> {
        let response = self
            .provider
            .get_quote_range(symbol, "1d", period.as_range())
            .await?;

        let bars = response
            .quotes()
            .map_err(|_| MarketDataError::NoData(symbol.to_string()))?
            .into_iter()
            .filter_map(|q| {
                DateTime::from_timestamp(q.timestamp as i64, 0).map(|ts| HistoricalBar {
                    date: ts.date_naive(),
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                })
            })
            .collect();

        Ok(bars)
    }

    async fn get_news(&self, symbol: &str) -> Result<Vec<NewsArticle>, MarketDataError> {
        let result = self.provider.search_ticker(symbol).await?;

        let articles = result
            .news
            .into_iter()
            .map(|item| NewsArticle {
                headline: item.title,
                url: item.link,
            })
            .collect();

        Ok(articles)
    }
}

// quoteSummary response shape, limited to the fields we read.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryEnvelope {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    result: Vec<QuoteSummaryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryNode {
    price: Option<PriceModule>,
    summary_profile: Option<SummaryProfileModule>,
    summary_detail: Option<SummaryDetailModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    regular_market_price: Option<PriceDetail>,
    regular_market_open: Option<PriceDetail>,
    currency: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryProfileModule {
    sector: Option<String>,
    industry: Option<String>,
    long_business_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    open: Option<PriceDetail>,
    fifty_two_week_high: Option<PriceDetail>,
    fifty_two_week_low: Option<PriceDetail>,
}

#[derive(Debug, Deserialize)]
struct PriceDetail {
    raw: Option<f64>,
}
