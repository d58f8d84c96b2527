//! # Validation Pipeline
//!
//! Runs Stage A, then (only if Stage A is clean) the Stage B checks in
//! order, and finally resolves effective variant values.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductSubmission                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Stage A (exhaustive) ── errors? ──► Invalid(FieldErrors)   inline      │
//! │       │ clean                                                           │
//! │       ▼                                                                 │
//! │  Stage B check 1..5 ──── first Err ─► Blocked(BlockingError) toast      │
//! │       │ all Ok                                                          │
//! │       ▼                                                                 │
//! │  resolve_variants ─────────────────► Valid(Vec<EffectiveVariant>)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline holds no mutable state. Callers re-run it on every submit
//! instead of patching earlier results.

use std::fmt;

use tracing::debug;

use crate::checks::{default_checks, BoxedCheck, CheckContext};
use crate::error::{BlockingError, CheckReport, CoreError, CoreResult, FieldErrors};
use crate::resolve::{resolve_variants, EffectiveVariant};
use crate::types::ProductSubmission;
use crate::validation::{validate_stage_a, ValidationOptions};

// =============================================================================
// Reporter
// =============================================================================

/// Delivery channel for blocking errors (toast, banner, log).
///
/// Implemented outside the engine; the pipeline only calls it through
/// [`ValidationPipeline::validate_and_report`]. Reporters are shared across
/// threads, like the pipeline itself.
pub trait Reporter: Send + Sync {
    fn report(&self, error: &BlockingError);
}

// =============================================================================
// Outcome
// =============================================================================

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Stage A found field errors; Stage B did not run.
    Invalid(FieldErrors),
    /// A Stage B check failed.
    Blocked(BlockingError),
    /// Everything passed.
    Valid(Vec<EffectiveVariant>),
}

impl ValidationOutcome {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationOutcome::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn blocking_error(&self) -> Option<&BlockingError> {
        match self {
            ValidationOutcome::Blocked(error) => Some(error),
            _ => None,
        }
    }

    /// Converts into a `Result` so callers can use `?`.
    pub fn into_result(self) -> CoreResult<Vec<EffectiveVariant>> {
        match self {
            ValidationOutcome::Invalid(errors) => Err(CoreError::Fields(errors)),
            ValidationOutcome::Blocked(error) => Err(CoreError::Blocked(error)),
            ValidationOutcome::Valid(resolved) => Ok(resolved),
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// The two-stage validation pipeline.
///
/// ## Example
/// ```rust
/// use meem_core::pipeline::{ValidationOutcome, ValidationPipeline};
/// use meem_core::types::ProductSubmission;
///
/// let pipeline = ValidationPipeline::default();
/// let outcome = pipeline.validate(&ProductSubmission::default());
///
/// let errors = outcome.field_errors().unwrap();
/// assert_eq!(errors.get("sku").unwrap(), &["SKU is required".to_string()]);
/// ```
pub struct ValidationPipeline {
    options: ValidationOptions,
    checks: Vec<BoxedCheck>,
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        ValidationPipeline::new(ValidationOptions::default())
    }
}

impl fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.checks.iter().map(|c| c.name()).collect();
        f.debug_struct("ValidationPipeline")
            .field("options", &self.options)
            .field("checks", &names)
            .finish()
    }
}

impl ValidationPipeline {
    /// Pipeline with the standard five checks.
    pub fn new(options: ValidationOptions) -> Self {
        ValidationPipeline {
            options,
            checks: default_checks(),
        }
    }

    /// Replaces the Stage B checks; they run in the given order.
    pub fn with_checks(mut self, checks: Vec<BoxedCheck>) -> Self {
        self.checks = checks;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Stage A only.
    pub fn stage_a(&self, submission: &ProductSubmission) -> FieldErrors {
        validate_stage_a(submission, &self.options)
    }

    /// Stage B only; stops at the first failing check.
    pub fn stage_b(&self, submission: &ProductSubmission) -> Result<(), BlockingError> {
        let ctx = CheckContext::new(submission, &self.options);
        for check in &self.checks {
            if let Err(error) = check.run(&ctx) {
                debug!(check = check.name(), code = error.code(), "Stage B check failed");
                return Err(error);
            }
        }
        Ok(())
    }

    /// Runs every Stage B check without short-circuiting.
    ///
    /// Meant for diagnostics screens; submission decisions use
    /// [`ValidationPipeline::validate`].
    pub fn check_reports(&self, submission: &ProductSubmission) -> Vec<(&'static str, CheckReport)> {
        let ctx = CheckContext::new(submission, &self.options);
        self.checks
            .iter()
            .map(|check| (check.name(), CheckReport::from(&check.run(&ctx))))
            .collect()
    }

    /// Full run: Stage A, Stage B, resolution.
    pub fn validate(&self, submission: &ProductSubmission) -> ValidationOutcome {
        let field_errors = self.stage_a(submission);
        if !field_errors.is_empty() {
            return ValidationOutcome::Invalid(field_errors);
        }

        if let Err(error) = self.stage_b(submission) {
            return ValidationOutcome::Blocked(error);
        }

        let resolved = resolve_variants(
            &submission.product,
            submission.active_variants(),
            self.options.currency_decimals,
        );
        debug!(
            sku = %submission.product.sku,
            variants = resolved.len(),
            "Submission is valid"
        );
        ValidationOutcome::Valid(resolved)
    }

    /// Like [`ValidationPipeline::validate`], forwarding a blocking error to
    /// `reporter` before returning.
    pub fn validate_and_report(
        &self,
        submission: &ProductSubmission,
        reporter: &dyn Reporter,
    ) -> ValidationOutcome {
        let outcome = self.validate(submission);
        if let ValidationOutcome::Blocked(error) = &outcome {
            reporter.report(error);
        }
        outcome
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
