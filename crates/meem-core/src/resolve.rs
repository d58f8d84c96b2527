//! # Effective Value Resolution
//!
//! Computes what a variant will actually use once inheritance from the
//! parent product is applied. The editor shows these as "inherits from
//! product" hints next to each variant row.
//!
//! ```text
//! price          variant net+cost both set ? variant : product
//! delivery type  variant type unless Inherit ? variant : product
//! delivery cost  effective meemhome and variant cost set ? variant : product
//! ```
//!
//! Resolution never fails and never decides validity; amounts that do not
//! parse simply resolve to `None`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{is_blank, DeliveryType, ProductDraft, VariantEntry};

/// Where an effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Own,
    Inherited,
}

/// A resolved net/cost pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePrice {
    pub net: Money,
    pub cost: Money,
}

/// Effective settings of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveVariant {
    pub variant_id: String,
    /// `None` when the chosen source has no parseable pair.
    pub price: Option<EffectivePrice>,
    pub price_source: ValueSource,
    pub delivery_type: Option<DeliveryType>,
    pub delivery_type_source: ValueSource,
    pub delivery_cost: Option<String>,
    pub delivery_cost_source: ValueSource,
}

impl EffectiveVariant {
    /// At least one value comes from the product.
    pub fn inherits_anything(&self) -> bool {
        [
            self.price_source,
            self.delivery_type_source,
            self.delivery_cost_source,
        ]
        .contains(&ValueSource::Inherited)
    }
}

fn parse_pair(net: &str, cost: &str, decimals: u8) -> Option<EffectivePrice> {
    Some(EffectivePrice {
        net: Money::parse(net, decimals).ok()?,
        cost: Money::parse(cost, decimals).ok()?,
    })
}

/// Resolves one variant against its product.
pub fn resolve_variant(product: &ProductDraft, variant: &VariantEntry, decimals: u8) -> EffectiveVariant {
    let own_prices = &variant.variant_prices;
    let (price, price_source) = if own_prices.has_own_pricing() {
        (
            parse_pair(&own_prices.net_price, &own_prices.cost, decimals),
            ValueSource::Own,
        )
    } else {
        (
            parse_pair(&product.net_price, &product.cost_price, decimals),
            ValueSource::Inherited,
        )
    };

    let (delivery_type, delivery_type_source) = match variant.delivery_type.override_type() {
        Some(own) => (Some(own), ValueSource::Own),
        None => (product.delivery_type, ValueSource::Inherited),
    };

    let own_cost = variant
        .delivery_cost
        .as_deref()
        .filter(|c| !is_blank(c));
    let (delivery_cost, delivery_cost_source) = match (delivery_type, own_cost) {
        (Some(DeliveryType::Meemhome), Some(cost)) => (Some(cost.trim().to_string()), ValueSource::Own),
        _ => (
            product
                .delivery_cost
                .as_deref()
                .filter(|c| !is_blank(c))
                .map(|c| c.trim().to_string()),
            ValueSource::Inherited,
        ),
    };

    EffectiveVariant {
        variant_id: variant.id.clone(),
        price,
        price_source,
        delivery_type,
        delivery_type_source,
        delivery_cost,
        delivery_cost_source,
    }
}

/// Resolves every variant, preserving order.
pub fn resolve_variants(
    product: &ProductDraft,
    variants: &[VariantEntry],
    decimals: u8,
) -> Vec<EffectiveVariant> {
    variants
        .iter()
        .map(|v| resolve_variant(product, v, decimals))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
