use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Mapping function applied between domain and range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log {
        base: f64,
    },
    Pow {
        exponent: f64,
    },
    Sqrt,
}

impl ScaleKind {
    fn forward(self, value: f64, reflect: bool) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log { base } => {
                if reflect {
                    -(-value).log(base)
                } else {
                    value.log(base)
                }
            }
            Self::Pow { exponent } => powish(value, exponent),
            Self::Sqrt => powish(value, 0.5),
        }
    }

    fn inverse(self, value: f64, reflect: bool) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log { base } => {
                if reflect {
                    -base.powf(-value)
                } else {
                    base.powf(value)
                }
            }
            Self::Pow { exponent } => powish(value, 1.0 / exponent),
            Self::Sqrt => powish(value, 2.0),
        }
    }
}

fn powish(value: f64, exponent: f64) -> f64 {
    value.signum() * value.abs().powf(exponent)
}

/// Continuous scale mapping a data domain onto a pixel (or normalized) range.
///
/// Ranges may be inverted (`range.0 > range.1`), which is how the y axis maps
/// larger values towards the top of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    kind: ScaleKind,
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    pub fn new(kind: ScaleKind, domain_start: f64, domain_end: f64) -> PlotResult<Self> {
        validate_domain(kind, domain_start, domain_end)?;
        Ok(Self {
            kind,
            domain: (domain_start, domain_end),
            range: (0.0, 1.0),
        })
    }

    pub fn linear(domain_start: f64, domain_end: f64) -> PlotResult<Self> {
        Self::new(ScaleKind::Linear, domain_start, domain_end)
    }

    #[must_use]
    pub fn kind(self) -> ScaleKind {
        self.kind
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    /// Absolute length of the range.
    #[must_use]
    pub fn range_extent(self) -> f64 {
        (self.range.1 - self.range.0).abs()
    }

    #[must_use]
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self
    }

    pub fn with_domain(self, start: f64, end: f64) -> PlotResult<Self> {
        validate_domain(self.kind, start, end)?;
        Ok(self.with_domain_unchecked(start, end))
    }

    /// Replaces the domain without validation; used when the new domain is
    /// derived from this scale's own inverse and therefore already valid.
    #[must_use]
    pub(crate) fn with_domain_unchecked(mut self, start: f64, end: f64) -> Self {
        self.domain = (start, end);
        self
    }

    fn reflect(self) -> bool {
        self.domain.0 < 0.0
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let reflect = self.reflect();
        let t0 = self.kind.forward(self.domain.0, reflect);
        let t1 = self.kind.forward(self.domain.1, reflect);
        let span = t1 - t0;
        if span == 0.0 {
            return (self.range.0 + self.range.1) * 0.5;
        }
        let t = (self.kind.forward(value, reflect) - t0) / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return self.domain.0;
        }
        let reflect = self.reflect();
        let t0 = self.kind.forward(self.domain.0, reflect);
        let t1 = self.kind.forward(self.domain.1, reflect);
        let t = (pixel - self.range.0) / span;
        self.kind.inverse(t0 + t * (t1 - t0), reflect)
    }
}

fn validate_domain(kind: ScaleKind, start: f64, end: f64) -> PlotResult<()> {
    let invalid = |reason| PlotError::InvalidScaleDomain { start, end, reason };
    if !start.is_finite() || !end.is_finite() {
        return Err(invalid("domain must be finite"));
    }
    if start == end {
        return Err(invalid("domain must not be empty"));
    }
    match kind {
        ScaleKind::Log { base } => {
            if !base.is_finite() || base <= 0.0 || base == 1.0 {
                return Err(invalid("log base must be finite, > 0 and != 1"));
            }
            if start == 0.0 || end == 0.0 || start.signum() != end.signum() {
                return Err(invalid("log domain must not include or cross zero"));
            }
        }
        ScaleKind::Pow { exponent } => {
            if !exponent.is_finite() || exponent == 0.0 {
                return Err(invalid("pow exponent must be finite and non-zero"));
            }
        }
        ScaleKind::Linear | ScaleKind::Sqrt => {}
    }
    Ok(())
}
