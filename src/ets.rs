//! ETS (Error-Trend-Seasonal) state-space fitting.
//!
//! Single forward pass over a series computing one-step-ahead forecasts,
//! residuals, a likelihood-style fit statistic and an average mean squared
//! error profile over the forecast horizon. The recursion follows the
//! classic Hyndman exponential smoothing state equations with additive and
//! multiplicative variants for each component and trend damping via `phi`.

use crate::error::{EvalError, Result};

/// Sentinel signalling a degenerate forecast and an unusable fit statistic.
pub const NA: f64 = -99999.0;

/// Maximum number of horizon steps tracked by the AMSE profile.
pub const MAX_NMSE: usize = 30;

/// Maximum seasonal period supported when seasonality is enabled.
pub const MAX_SEASONAL_PERIOD: usize = 24;

const TOL: f64 = 1.0e-10;

/// Substituted for ratios whose denominator is within `TOL` of zero.
const HUGE_RATIO: f64 = 1.0e10;

/// Error component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorKind {
    /// Additive errors: residual is `y - f`.
    #[default]
    Additive,
    /// Multiplicative errors: residual is `(y - f) / f`.
    Multiplicative,
}

/// Trend or seasonal component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentKind {
    /// Component disabled.
    #[default]
    None,
    /// Additive component.
    Additive,
    /// Multiplicative component.
    Multiplicative,
}

/// ETS model specification: error, trend and seasonal kinds plus the
/// seasonal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtsSpec {
    pub error: ErrorKind,
    pub trend: ComponentKind,
    pub season: ComponentKind,
    /// Seasonal period; forced to 1 when seasonality is disabled.
    pub period: usize,
}

impl EtsSpec {
    /// Create a new ETS specification.
    pub fn new(error: ErrorKind, trend: ComponentKind, season: ComponentKind, period: usize) -> Self {
        Self {
            error,
            trend,
            season,
            period,
        }
    }

    /// ETS(A,N,N) - simple exponential smoothing with additive errors.
    pub fn ann() -> Self {
        Self::new(ErrorKind::Additive, ComponentKind::None, ComponentKind::None, 1)
    }

    /// ETS(A,A,N) - Holt's linear method with additive errors.
    pub fn aan() -> Self {
        Self::new(
            ErrorKind::Additive,
            ComponentKind::Additive,
            ComponentKind::None,
            1,
        )
    }

    /// ETS(A,A,A) - Holt-Winters additive.
    pub fn aaa(period: usize) -> Self {
        Self::new(
            ErrorKind::Additive,
            ComponentKind::Additive,
            ComponentKind::Additive,
            period,
        )
    }

    /// ETS(M,N,N) - simple exponential smoothing with multiplicative errors.
    pub fn mnn() -> Self {
        Self::new(
            ErrorKind::Multiplicative,
            ComponentKind::None,
            ComponentKind::None,
            1,
        )
    }

    /// ETS(M,A,M) - multiplicative Holt-Winters.
    pub fn mam(period: usize) -> Self {
        Self::new(
            ErrorKind::Multiplicative,
            ComponentKind::Additive,
            ComponentKind::Multiplicative,
            period,
        )
    }

    /// Get a short name for this specification.
    pub fn short_name(&self) -> String {
        let e = match self.error {
            ErrorKind::Additive => "A",
            ErrorKind::Multiplicative => "M",
        };
        let t = match self.trend {
            ComponentKind::None => "N",
            ComponentKind::Additive => "A",
            ComponentKind::Multiplicative => "M",
        };
        let s = match self.season {
            ComponentKind::None => "N",
            ComponentKind::Additive => "A",
            ComponentKind::Multiplicative => "M",
        };
        format!("ETS({},{},{})", e, t, s)
    }

    /// Check if this model has a trend component.
    pub fn has_trend(&self) -> bool {
        !matches!(self.trend, ComponentKind::None)
    }

    /// Check if this model has a seasonal component.
    pub fn has_season(&self) -> bool {
        !matches!(self.season, ComponentKind::None)
    }

    /// Effective seasonal period: the configured period (at least 1) when
    /// seasonality is enabled, 1 otherwise.
    pub fn effective_period(&self) -> usize {
        if self.has_season() {
            self.period.max(1)
        } else {
            1
        }
    }

    /// Number of state values per timestep.
    pub fn n_states(&self) -> usize {
        1 + usize::from(self.has_trend())
            + if self.has_season() {
                self.effective_period()
            } else {
                0
            }
    }

    fn validate(&self) -> Result<()> {
        if self.has_season() && self.period > MAX_SEASONAL_PERIOD {
            return Err(EvalError::InvalidParameter(format!(
                "seasonal period must be <= {} when seasonality is enabled, got {}",
                MAX_SEASONAL_PERIOD, self.period
            )));
        }
        Ok(())
    }
}

/// State of the model at a single timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct EtsState {
    /// Level component.
    pub level: f64,
    /// Trend component, present iff the model has a trend.
    pub trend: Option<f64>,
    /// Seasonal components, length equal to the seasonal period (empty when
    /// seasonality is disabled). Slot `period - 1` holds last period's
    /// same-phase value.
    pub seasonal: Vec<f64>,
}

impl EtsState {
    /// Create a level-only state.
    pub fn level(level: f64) -> Self {
        Self {
            level,
            trend: None,
            seasonal: Vec::new(),
        }
    }

    /// Add a trend component.
    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Add seasonal components.
    pub fn with_seasonal(mut self, seasonal: Vec<f64>) -> Self {
        self.seasonal = seasonal;
        self
    }

    fn validate_shape(&self, spec: &EtsSpec) -> Result<()> {
        if self.trend.is_some() != spec.has_trend() {
            return Err(EvalError::DimensionMismatch {
                expected: usize::from(spec.has_trend()),
                got: usize::from(self.trend.is_some()),
            });
        }
        let expected = if spec.has_season() {
            spec.effective_period()
        } else {
            0
        };
        if self.seasonal.len() != expected {
            return Err(EvalError::DimensionMismatch {
                expected,
                got: self.seasonal.len(),
            });
        }
        Ok(())
    }
}

/// Smoothing and damping coefficients.
///
/// Values are not range-checked here; keeping them in valid smoothing
/// ranges is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Level smoothing parameter.
    pub alpha: f64,
    /// Trend smoothing parameter.
    pub beta: f64,
    /// Seasonal smoothing parameter.
    pub gamma: f64,
    /// Damping parameter.
    pub phi: f64,
}

impl SmoothingParams {
    pub fn new(alpha: f64, beta: f64, gamma: f64, phi: f64) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            phi,
        }
    }

    /// Level-only smoothing with no damping.
    pub fn level_only(alpha: f64) -> Self {
        Self::new(alpha, 0.0, 0.0, 1.0)
    }
}

/// Output of a fit: filled states, residuals, fit statistic and AMSE profile.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// Per-timestep states; entry 0 is the caller-supplied initial state,
    /// entry `t + 1` the state after absorbing observation `t`.
    pub states: Vec<EtsState>,
    /// One-step-ahead residuals, one per absorbed observation.
    pub residuals: Vec<f64>,
    /// Likelihood-style fit statistic; equals [`NA`] after a degenerate
    /// forecast abort.
    pub lik: f64,
    /// Average mean squared error at each horizon step, running-mean
    /// accumulated over the series.
    pub amse: Vec<f64>,
}

impl FitOutcome {
    /// Whether the recursion aborted on a degenerate forecast.
    pub fn is_degenerate(&self) -> bool {
        (self.lik - NA).abs() < TOL
    }
}

/// Fit an ETS model to `y` starting from `init`.
///
/// Performs a single forward pass: at each timestep the previous state is
/// used to forecast `nmse` steps ahead, the one-step forecast error is
/// recorded as a residual, the AMSE profile is updated online, and the
/// state is advanced by the smoothing equations. `nmse` is clamped to
/// `1..=`[`MAX_NMSE`].
///
/// A multiplicative trend with a negative trend state makes the forecast
/// degenerate: the recursion stops and the partial outcome is returned with
/// `lik == `[`NA`]. Near-zero denominators in the update equations are
/// substituted with a large sentinel rather than raising.
pub fn fit_ets(
    y: &[f64],
    init: &EtsState,
    spec: &EtsSpec,
    params: &SmoothingParams,
    nmse: usize,
) -> Result<FitOutcome> {
    if y.is_empty() {
        return Err(EvalError::EmptyData);
    }
    spec.validate()?;
    init.validate_shape(spec)?;

    let n = y.len();
    let m = spec.effective_period();
    let nmse = nmse.clamp(1, MAX_NMSE);

    let mut f = [0.0_f64; MAX_NMSE];
    let mut denom = [0.0_f64; MAX_NMSE];
    let mut amse = vec![0.0_f64; nmse];
    let mut residuals = Vec::with_capacity(n);
    let mut states = Vec::with_capacity(n + 1);
    states.push(init.clone());

    let mut level = init.level;
    let mut trend = init.trend.unwrap_or(0.0);
    let mut season = [0.0_f64; MAX_SEASONAL_PERIOD];
    for (slot, &value) in season.iter_mut().zip(init.seasonal.iter()) {
        *slot = value;
    }

    let mut lik = 0.0;
    let mut lik2 = 0.0;

    for i in 0..n {
        let old_level = level;
        let old_trend = trend;
        let old_season = season;

        forecast_horizon(
            old_level,
            old_trend,
            &old_season,
            m,
            spec.trend,
            spec.season,
            params.phi,
            &mut f[..nmse],
        );
        if (f[0] - NA).abs() < TOL {
            return Ok(FitOutcome {
                states,
                residuals,
                lik: NA,
                amse,
            });
        }

        let e = match spec.error {
            ErrorKind::Additive => y[i] - f[0],
            ErrorKind::Multiplicative => (y[i] - f[0]) / f[0],
        };
        residuals.push(e);

        for j in 0..nmse {
            if i + j < n {
                denom[j] += 1.0;
                let diff = y[i + j] - f[j];
                amse[j] = (amse[j] * (denom[j] - 1.0) + diff * diff) / denom[j];
            }
        }

        let updated = update_state(
            old_level,
            old_trend,
            &old_season,
            &mut season,
            m,
            spec,
            params,
            y[i],
        );
        level = updated.0;
        trend = updated.1;

        states.push(EtsState {
            level,
            trend: spec.has_trend().then_some(trend),
            seasonal: if spec.has_season() {
                season[..m].to_vec()
            } else {
                Vec::new()
            },
        });

        lik += e * e;
        lik2 += f[0].abs().ln();
    }

    lik = n as f64 * lik.ln();
    if spec.error == ErrorKind::Multiplicative {
        lik += 2.0 * lik2;
    }

    Ok(FitOutcome {
        states,
        residuals,
        lik,
        amse,
    })
}

/// Flatten per-timestep states into the contiguous historical buffer layout:
/// `n_states` values per timestep, ordered level, trend, seasonal slots.
pub fn flatten_states(states: &[EtsState], spec: &EtsSpec) -> Vec<f64> {
    let mut flat = Vec::with_capacity(states.len() * spec.n_states());
    for state in states {
        flat.push(state.level);
        if let Some(b) = state.trend {
            flat.push(b);
        }
        flat.extend_from_slice(&state.seasonal);
    }
    flat
}

/// Forecast `f.len()` steps ahead from the given state.
///
/// `phistar` accumulates the damping exponent: `phi + phi^2 + ...` per step,
/// degrading to a linear count when `phi` is within tolerance of 1. The
/// seasonal slot applied at horizon step `i` is `(m - 1 - i) mod m`.
#[allow(clippy::too_many_arguments)]
fn forecast_horizon(
    level: f64,
    trend: f64,
    season: &[f64],
    m: usize,
    trend_kind: ComponentKind,
    season_kind: ComponentKind,
    phi: f64,
    f: &mut [f64],
) {
    let h = f.len();
    let mut phistar = phi;

    for i in 0..h {
        f[i] = match trend_kind {
            ComponentKind::None => level,
            ComponentKind::Additive => level + phistar * trend,
            ComponentKind::Multiplicative if trend < 0.0 => NA,
            ComponentKind::Multiplicative => level * trend.powf(phistar),
        };

        let j = (m as i64 - 1 - i as i64).rem_euclid(m as i64) as usize;
        match season_kind {
            ComponentKind::Additive => f[i] += season[j],
            ComponentKind::Multiplicative => f[i] *= season[j],
            ComponentKind::None => {}
        }

        if i + 1 < h {
            if (phi - 1.0).abs() < TOL {
                phistar += 1.0;
            } else {
                phistar += phi.powi(i as i32 + 1);
            }
        }
    }
}

/// Advance level, trend and seasonal state by one observation.
///
/// Returns the new `(level, trend)`; the seasonal slots are rotated in
/// place: slot 0 receives the smoothed deviation, slot `j` carries the old
/// slot `j - 1` so that slot `m - 1` always holds last period's same-phase
/// value.
#[allow(clippy::too_many_arguments)]
fn update_state(
    old_level: f64,
    old_trend: f64,
    old_season: &[f64],
    season: &mut [f64],
    m: usize,
    spec: &EtsSpec,
    params: &SmoothingParams,
    y: f64,
) -> (f64, f64) {
    let phi = params.phi;

    // New level.
    let (phib, q) = match spec.trend {
        ComponentKind::None => (0.0, old_level),
        ComponentKind::Additive => {
            let phib = phi * old_trend;
            (phib, old_level + phib)
        }
        ComponentKind::Multiplicative => {
            if (phi - 1.0).abs() < TOL {
                (old_trend, old_level * old_trend)
            } else {
                let phib = old_trend.powf(phi);
                (phib, old_level * phib)
            }
        }
    };

    let p = match spec.season {
        ComponentKind::None => y,
        ComponentKind::Additive => y - old_season[m - 1],
        ComponentKind::Multiplicative => {
            if old_season[m - 1].abs() < TOL {
                HUGE_RATIO
            } else {
                y / old_season[m - 1]
            }
        }
    };
    let level = q + params.alpha * (p - q);

    // New growth.
    let mut trend = old_trend;
    if spec.has_trend() {
        let r = match spec.trend {
            ComponentKind::Additive => level - old_level,
            _ => {
                if old_level.abs() < TOL {
                    HUGE_RATIO
                } else {
                    level / old_level
                }
            }
        };
        trend = phib + (params.beta / params.alpha) * (r - phib);
    }

    // New season.
    if spec.has_season() {
        let t = match spec.season {
            ComponentKind::Additive => y - q,
            _ => {
                if q.abs() < TOL {
                    HUGE_RATIO
                } else {
                    y / q
                }
            }
        };
        season[0] = old_season[m - 1] + params.gamma * (t - old_season[m - 1]);
        for j in 1..m {
            season[j] = old_season[j - 1];
        }
    }

    (level, trend)
}
