//! Price normalization and comparison.
//!
//! Stored prices keep the currency they were submitted in. Every read converts through USD
//! using the `currency_rate` table, where a rate is the number of currency units per dollar.

use std::{cmp::Ordering, collections::HashMap};

use sea_orm::DatabaseConnection;

use crate::{
    model::price::{ComparisonRowDto, HighlightDto, LowestPriceDto},
    server::{
        data::{
            currency_rate::CurrencyRateRepository, price::PriceRepository,
            standard_model::StandardModelRepository,
        },
        error::{price::PriceError, Error},
        service::retry::RetryContext,
    },
};

/// Currency code to units per USD
pub type RateMap = HashMap<String, f64>;

pub const DEFAULT_HIGHLIGHT_LIMIT: u64 = 8;
pub const MAX_HIGHLIGHT_LIMIT: u64 = 50;

/// Converts `amount` from `source` to `target` currency.
///
/// Returns `None` when there is no amount or either currency has no usable rate.
pub fn convert(amount: Option<f64>, source: &str, target: &str, rates: &RateMap) -> Option<f64> {
    let amount = amount?;
    let source_rate = *rates.get(source)?;
    let target_rate = *rates.get(target)?;

    if source_rate == 0.0 {
        return None;
    }

    Some(amount / source_rate * target_rate)
}

/// Ascending order with unconvertible (`None`) prices last
fn cmp_converted(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub struct ComparisonService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ComparisonService<'a> {
    /// Creates a new instance of [`ComparisonService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every stored rate, `USD` is always present with a rate of 1
    pub async fn rate_map(&self) -> Result<RateMap, Error> {
        let mut ctx: RetryContext<()> = RetryContext::new();
        let db = self.db.clone();

        ctx.execute_with_retry("currency rate lookup", |_| {
            let db = db.clone();

            Box::pin(async move {
                let mut rates: RateMap = CurrencyRateRepository::new(&db)
                    .list()
                    .await?
                    .into_iter()
                    .map(|rate| (rate.code, rate.rate_to_usd))
                    .collect();
                rates.insert("USD".to_string(), 1.0);

                Ok(rates)
            })
        })
        .await
    }

    async fn rate_map_for(&self, target_currency: &str) -> Result<RateMap, Error> {
        let rates = self.rate_map().await?;

        if !rates.contains_key(target_currency) {
            return Err(PriceError::UnsupportedCurrency.into());
        }

        Ok(rates)
    }

    /// Visible prices of a standard model converted to `target_currency`, cheapest first
    pub async fn compare(
        &self,
        standard_model_id: i32,
        target_currency: &str,
    ) -> Result<Vec<ComparisonRowDto>, Error> {
        let rates = self.rate_map_for(target_currency).await?;

        let rows = PriceRepository::new(self.db)
            .list_visible_for_model(standard_model_id)
            .await?;

        let mut comparison: Vec<ComparisonRowDto> = rows
            .into_iter()
            .map(|(price, provider)| {
                let currency = price.currency.as_str();

                ComparisonRowDto {
                    price_id: price.id,
                    provider_id: provider.id,
                    provider_name: provider.name,
                    provider_model_name: price.provider_model_name,
                    provider_score: provider.avg_score,
                    uptime: provider.uptime_rate,
                    price_in: convert(Some(price.input_price), currency, target_currency, &rates),
                    price_out: convert(Some(price.output_price), currency, target_currency, &rates),
                    cache_hit_input_price: convert(
                        price.cache_hit_input_price,
                        currency,
                        target_currency,
                        &rates,
                    ),
                    cache_hit_output_price: convert(
                        price.cache_hit_output_price,
                        currency,
                        target_currency,
                        &rates,
                    ),
                    original_currency: price.currency,
                    verified_at: price.verified_at,
                    proof_type: price.proof_type,
                    proof_content: price.proof_content,
                    proof: price.proof_img_path,
                }
            })
            .collect();

        comparison.sort_by(|a, b| {
            cmp_converted(a.price_in, b.price_in)
                .then_with(|| a.provider_name.cmp(&b.provider_name))
                .then_with(|| a.price_id.cmp(&b.price_id))
        });

        Ok(comparison)
    }

    /// Headline models with official, average and lowest provider prices.
    ///
    /// `limit` must be within `1..=50` and defaults to 8.
    pub async fn highlights(
        &self,
        limit: Option<u64>,
        target_currency: &str,
    ) -> Result<Vec<HighlightDto>, Error> {
        let limit = limit.unwrap_or(DEFAULT_HIGHLIGHT_LIMIT);
        if !(1..=MAX_HIGHLIGHT_LIMIT).contains(&limit) {
            return Err(PriceError::InvalidField("limit".to_string()).into());
        }
        let rates = self.rate_map_for(target_currency).await?;

        let models = StandardModelRepository::new(self.db)
            .list_highlighted(limit)
            .await?;
        let price_repo = PriceRepository::new(self.db);

        let mut highlights = Vec::with_capacity(models.len());

        for model in models {
            let official_currency = model.official_currency.as_str();
            let official_price_in = convert(
                model.official_input_price,
                official_currency,
                target_currency,
                &rates,
            );
            let official_price_out = convert(
                model.official_output_price,
                official_currency,
                target_currency,
                &rates,
            );

            let mut total_in = 0.0;
            let mut total_out = 0.0;
            let mut counted = 0usize;
            let mut lowest: Option<LowestPriceDto> = None;

            for (price, provider) in price_repo.list_visible_for_model(model.id).await? {
                let currency = price.currency.as_str();
                let (Some(price_in), Some(price_out)) = (
                    convert(Some(price.input_price), currency, target_currency, &rates),
                    convert(Some(price.output_price), currency, target_currency, &rates),
                ) else {
                    continue;
                };

                total_in += price_in;
                total_out += price_out;
                counted += 1;

                // Strictly lower only, the first provider seen keeps a tie
                if lowest.as_ref().is_none_or(|l| price_in < l.price_in) {
                    lowest = Some(LowestPriceDto {
                        provider_id: provider.id,
                        provider_name: provider.name,
                        price_in,
                        price_out,
                        currency: target_currency.to_string(),
                    });
                }
            }

            let (platform_avg_in, platform_avg_out) = if counted > 0 {
                (
                    Some(total_in / counted as f64),
                    Some(total_out / counted as f64),
                )
            } else {
                (None, None)
            };

            highlights.push(HighlightDto {
                id: model.id,
                name: model.name,
                vendor: model.vendor,
                official_price_in,
                official_price_out,
                official_currency: model.official_currency,
                platform_avg_in,
                platform_avg_out,
                lowest,
            });
        }

        Ok(highlights)
    }
}
