//! # Blocking Checks (Stage B)
//!
//! Cross-entity rules that only run once Stage A is clean. Each check
//! inspects the whole submission and yields at most one [`BlockingError`].
//!
//! ## Fixed Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. delivery_method   simple product needs a delivery type              │
//! │  2. variant_details   attribute values, stock, fallback prices          │
//! │  3. specifications    weight/height/width/length coverage               │
//! │  4. pricing           amounts ≥ 0, net ≥ cost: entries, then variants   │
//! │  5. variant_delivery  company forbids cost, meemhome requires one       │
//! │                                                                         │
//! │  First Err wins. Later checks assume earlier ones passed.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{BlockingError, CheckResult};
use crate::money::Money;
use crate::types::{DeliveryType, ProductSubmission, RequiredSpec, VariantEntry};
use crate::validation::ValidationOptions;

/// Input shared by every check.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub submission: &'a ProductSubmission,
    pub options: &'a ValidationOptions,
}

impl<'a> CheckContext<'a> {
    pub fn new(submission: &'a ProductSubmission, options: &'a ValidationOptions) -> Self {
        CheckContext {
            submission,
            options,
        }
    }

    /// Variants that take part in validation (empty when variants are off).
    #[inline]
    pub fn variants(&self) -> &'a [VariantEntry] {
        self.submission.active_variants()
    }
}

/// One Stage B rule.
pub trait BlockingCheck: Send + Sync {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult;
}

/// Owned, type-erased check as stored by the pipeline.
pub type BoxedCheck = Box<dyn BlockingCheck>;

/// The five checks in the order the pipeline must run them.
pub fn default_checks() -> Vec<BoxedCheck> {
    vec![
        Box::new(DeliveryMethodCheck),
        Box::new(VariantDetailsCheck),
        Box::new(SpecificationCheck),
        Box::new(PricingCheck),
        Box::new(VariantDeliveryCheck),
    ]
}

// =============================================================================
// 1. Delivery Method
// =============================================================================

/// A product without variants must choose a delivery type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryMethodCheck;

impl BlockingCheck for DeliveryMethodCheck {
    fn name(&self) -> &'static str {
        "delivery_method"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        let product = &ctx.submission.product;
        if !product.has_variants && product.delivery_type.is_none() {
            return Err(BlockingError::DeliveryMethodRequired);
        }
        Ok(())
    }
}

// =============================================================================
// 2. Variant Details
// =============================================================================

/// Per-variant structure, then the product-price fallback.
///
/// Variants are scanned top to bottom and the first structural problem
/// aborts the check, before any pricing is looked at.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantDetailsCheck;

impl BlockingCheck for VariantDetailsCheck {
    fn name(&self) -> &'static str {
        "variant_details"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        let product = &ctx.submission.product;
        if !product.has_variants {
            return Ok(());
        }

        let variants = ctx.variants();
        if variants.is_empty() {
            return Err(BlockingError::NoVariants);
        }

        for (i, variant) in variants.iter().enumerate() {
            let index = i + 1;
            if variant.variations.is_empty() {
                return Err(BlockingError::MissingAttributeValues { index });
            }
            if variant.stock <= 0 {
                return Err(BlockingError::StockNotPositive { index });
            }
        }

        let unpriced: Vec<usize> = variants
            .iter()
            .enumerate()
            .filter(|(_, v)| v.variant_prices.lacks_pricing())
            .map(|(i, _)| i + 1)
            .collect();

        if !unpriced.is_empty() && !product.has_prices() {
            return Err(BlockingError::MissingFallbackPrices { indices: unpriced });
        }
        Ok(())
    }
}

// =============================================================================
// 3. Specifications
// =============================================================================

/// Required physical specifications are covered somewhere.
///
/// ```text
/// no variants                    → product specs must cover all four
/// every variant covers all four  → product specs not needed
/// any variant misses one         → product specs must cover all four
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationCheck;

impl BlockingCheck for SpecificationCheck {
    fn name(&self) -> &'static str {
        "specifications"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        let product_specs = &ctx.submission.specs;
        let variants = ctx.variants();

        if variants.is_empty() {
            let missing = RequiredSpec::missing_from(product_specs);
            if !missing.is_empty() {
                return Err(BlockingError::MissingSpecifications { missing });
            }
            return Ok(());
        }

        let uncovered: Vec<usize> = variants
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.covers_required_specs())
            .map(|(i, _)| i + 1)
            .collect();

        if uncovered.is_empty() {
            return Ok(());
        }

        let missing = RequiredSpec::missing_from(product_specs);
        if !missing.is_empty() {
            return Err(BlockingError::MissingFallbackSpecifications {
                missing,
                variants: uncovered,
            });
        }
        Ok(())
    }
}

// =============================================================================
// 4. Pricing
// =============================================================================

/// Amounts are non-negative and net price never undercuts cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingCheck;

impl BlockingCheck for PricingCheck {
    fn name(&self) -> &'static str {
        "pricing"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        for (i, entry) in ctx.submission.prices.iter().enumerate() {
            let index = i + 1;
            if entry.net_price.is_negative() || entry.cost.is_negative() {
                return Err(BlockingError::NegativePriceEntry { index });
            }
            if !entry.is_consistent() {
                return Err(BlockingError::PriceEntryBelowCost { index });
            }
        }

        let decimals = ctx.options.currency_decimals;
        for (i, variant) in ctx.variants().iter().enumerate() {
            let index = i + 1;
            let prices = &variant.variant_prices;
            if !prices.has_own_pricing() {
                continue;
            }

            let net = Money::parse(&prices.net_price, decimals)
                .map_err(|_| BlockingError::InvalidVariantPrice { index })?;
            let cost = Money::parse(&prices.cost, decimals)
                .map_err(|_| BlockingError::InvalidVariantPrice { index })?;

            if net.is_negative() || cost.is_negative() {
                return Err(BlockingError::NegativeVariantPrice { index });
            }
            if net < cost {
                return Err(BlockingError::VariantPriceBelowCost { index });
            }
        }
        Ok(())
    }
}

// =============================================================================
// 5. Variant Delivery
// =============================================================================

/// Delivery cost rules against each variant's effective delivery type.
///
/// ```text
/// effective = variant type (unless Inherit) else product type
///
/// company   + variant cost set              → fail
/// meemhome  + variant cost not an amount ≥ 0 → fail
/// meemhome  + no variant cost, no product   → fail
/// unset                                      → nothing to check
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantDeliveryCheck;

impl BlockingCheck for VariantDeliveryCheck {
    fn name(&self) -> &'static str {
        "variant_delivery"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        let product = &ctx.submission.product;

        for (i, variant) in ctx.variants().iter().enumerate() {
            let index = i + 1;
            let effective = variant
                .delivery_type
                .override_type()
                .or(product.delivery_type);

            match effective {
                Some(DeliveryType::Company) if variant.has_own_delivery_cost() => {
                    return Err(BlockingError::CompanyDeliveryCostSet { index });
                }
                Some(DeliveryType::Meemhome) => match variant.delivery_cost.as_deref() {
                    Some(cost) if variant.has_own_delivery_cost() => {
                        let parsed = Money::parse(cost, ctx.options.currency_decimals);
                        if !parsed.is_ok_and(|m| !m.is_negative()) {
                            return Err(BlockingError::InvalidVariantDeliveryCost { index });
                        }
                    }
                    _ if !product.has_delivery_cost() => {
                        return Err(BlockingError::MeemhomeDeliveryCostMissing { index });
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
