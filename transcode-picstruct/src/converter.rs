//! Rate converter: derives the picture structure cycle for a clip.
//!
//! The container runs at a fixed rate. A clip at a lower rate must have some
//! of its frames or fields shown more than once, and the ratio
//! `container / clip` says how many output periods each clip frame covers on
//! average. Spreading the integer repeats evenly over one cycle is an error
//! diffusion problem: each step rounds the target plus the carried residual,
//! and the residual is exact so the cycle closes without drift.

use crate::balance::balance_field_pattern;
use crate::error::{PicStructError, Result};
use crate::pattern::CyclicPattern;
use crate::picstruct::{FieldMode, PicStruct};
use tracing::{debug, trace, warn};
use transcode_core::Rational;

/// Configuration for a [`RateConverter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    /// Container frame rate.
    pub container_rate: Rational,
    /// Field mode of the container stream.
    pub field_mode: FieldMode,
    /// Rebalance 3-field structures ahead of progressive frames.
    pub ensure_even_field_count: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            container_rate: Rational::new(30000, 1001),
            field_mode: FieldMode::TopFieldFirst,
            ensure_even_field_count: false,
        }
    }
}

impl TimingConfig {
    /// Create a configuration for a container rate and field mode.
    pub fn new(container_rate: Rational, field_mode: FieldMode) -> Self {
        Self {
            container_rate,
            field_mode,
            ..Default::default()
        }
    }

    /// Enable or disable the field parity balancing pass.
    pub fn with_even_field_count(mut self, enabled: bool) -> Self {
        self.ensure_even_field_count = enabled;
        self
    }
}

/// Build a rate from a numerator and denominator, rejecting non-positive parts.
pub fn positive_rate(num: i64, den: i64) -> Result<Rational> {
    if num <= 0 || den <= 0 {
        return Err(PicStructError::InvalidRate { num, den });
    }
    Ok(Rational::new(num, den).reduce())
}

/// Computes picture structure cycles for clips shown in a fixed container.
///
/// The converter never changes after construction and can be shared freely.
#[derive(Debug, Clone)]
pub struct RateConverter {
    config: TimingConfig,
}

impl RateConverter {
    /// Create a converter, validating the container rate.
    pub fn new(config: TimingConfig) -> Result<Self> {
        let rate = config.container_rate;
        if !rate.is_positive() {
            return Err(PicStructError::InvalidRate {
                num: rate.num,
                den: rate.den,
            });
        }
        Ok(Self {
            config: TimingConfig {
                container_rate: rate.reduce(),
                ..config
            },
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Container frame rate.
    pub fn container_rate(&self) -> Rational {
        self.config.container_rate
    }

    /// Container field mode.
    pub fn field_mode(&self) -> FieldMode {
        self.config.field_mode
    }

    /// Validated `container / clip` ratio.
    ///
    /// Its reduced denominator is the cycle length in output frames.
    pub fn ratio(&self, clip_rate: Rational) -> Result<Rational> {
        if !clip_rate.is_positive() {
            return Err(PicStructError::InvalidRate {
                num: clip_rate.num,
                den: clip_rate.den,
            });
        }

        let container = self.config.container_rate;
        if clip_rate > container {
            return Err(PicStructError::SourceFasterThanContainer {
                container,
                clip: clip_rate.reduce(),
            });
        }

        // Extreme rates leave the exact ratio outside i64.
        let (num, den) = container.wide_quotient(&clip_rate);
        if den >= i128::from(container.round_half_even()) {
            return Err(PicStructError::NoPatternWithinOneSecond {
                cycle_length: i64::try_from(den).unwrap_or(i64::MAX),
                container,
            });
        }
        let num = i64::try_from(num).map_err(|_| PicStructError::UnmappedRepeatCount {
            count: i64::MAX,
            progressive: !self.config.field_mode.is_field_based(),
        })?;
        // den < round(container) <= i64::MAX
        Ok(Rational::new(num, den as i64))
    }

    /// Compute the picture structure cycle for a clip.
    ///
    /// `override_mode` is the clip's own field mode; `Progressive` asks for
    /// whole-frame repeats where the container allows it. With
    /// `prefer_progressive`, a progressive cycle is returned whenever one
    /// exists. A field-based attempt that needs an unmappable repeat count
    /// falls back to the progressive cycle when the clip asked for one.
    pub fn determine_pattern(
        &self,
        clip_rate: Rational,
        override_mode: FieldMode,
        prefer_progressive: bool,
    ) -> Result<CyclicPattern> {
        let ratio = self.ratio(clip_rate)?;
        let can_force_progressive =
            ratio.is_integer() && override_mode == FieldMode::Progressive;

        debug!(
            container = %self.config.container_rate,
            clip = %clip_rate,
            %ratio,
            cycle = ratio.den,
            mode = %override_mode,
            prefer_progressive,
            "determining picture structure pattern"
        );

        let codes = if self.config.field_mode.is_field_based() && !can_force_progressive {
            self.field_based_or_fallback(ratio, override_mode, prefer_progressive)?
        } else {
            if override_mode.is_field_based() {
                return Err(PicStructError::IncompatibleFieldMode {
                    configured: self.config.field_mode,
                    requested: override_mode,
                });
            }
            progressive_repetitions(ratio)?
        };

        Ok(CyclicPattern::new(codes))
    }

    /// Field-based attempt with an optional progressive candidate.
    fn field_based_or_fallback(
        &self,
        ratio: Rational,
        override_mode: FieldMode,
        prefer_progressive: bool,
    ) -> Result<Vec<PicStruct>> {
        let candidate = if override_mode == FieldMode::Progressive {
            match progressive_repetitions(ratio) {
                Ok(codes) => Some(codes),
                Err(err) if err.is_recoverable() => None,
                Err(err) => return Err(err),
            }
        } else {
            None
        };

        let candidate = match candidate {
            Some(codes) if prefer_progressive => {
                debug!("using preferred progressive pattern");
                return Ok(codes);
            }
            other => other,
        };

        let field_mode = if override_mode.is_field_based() {
            override_mode
        } else {
            self.config.field_mode
        };

        match self.field_repetitions(ratio, field_mode) {
            Ok(codes) => Ok(codes),
            Err(err) if err.is_recoverable() => match candidate {
                Some(codes) => {
                    warn!(%ratio, error = %err, "falling back to progressive pattern");
                    Ok(codes)
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Distribute `2 * ratio` fields per output frame over one cycle.
    fn field_repetitions(&self, ratio: Rational, field_mode: FieldMode) -> Result<Vec<PicStruct>> {
        let fields = ratio
            .checked_mul_int(2)
            .ok_or(PicStructError::UnmappedRepeatCount {
                count: i64::MAX,
                progressive: false,
            })?;
        let mut last_field = field_mode.seed_field();
        let mut codes = Vec::with_capacity(ratio.den as usize);

        for count in diffuse(fields, ratio.den) {
            let code = PicStruct::from_field_repeat(count, last_field)?;
            trace!(count, %code, "field step");
            last_field = code.last_field();
            codes.push(code);
        }

        if self.config.ensure_even_field_count {
            let moved = balance_field_pattern(&mut codes);
            debug!(moved, "balanced field pattern");
        }
        Ok(codes)
    }
}

/// Distribute `ratio` frame repeats per output frame over one cycle.
fn progressive_repetitions(ratio: Rational) -> Result<Vec<PicStruct>> {
    diffuse(ratio, ratio.den)
        .map(|count| {
            trace!(count, "frame step");
            PicStruct::from_frame_repeat(count)
        })
        .collect()
}

/// Error diffusion: `steps` integer repeat counts averaging exactly `target`.
///
/// Each count is `round(target + residual)`, ties to even, and the rounding
/// difference is carried into the next step.
fn diffuse(target: Rational, steps: i64) -> impl Iterator<Item = i64> {
    let mut residual = Rational::zero();
    (0..steps).map(move |_| {
        let count = (target + residual).round_half_even();
        residual = residual + target - Rational::from_int(count);
        count
    })
}
