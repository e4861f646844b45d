//! "Nice" tick generation for continuous axes.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Default number of ticks requested per axis.
pub const DEFAULT_TICK_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TickSpec {
    first: i64,
    last: i64,
    /// Positive: multiply by the step. Negative: divide by `-increment`.
    increment: f64,
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<TickSpec> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut first, mut last, increment);
    if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        first = (start * inc).round();
        last = (stop * inc).round();
        if first / inc < start {
            first += 1.0;
        }
        if last / inc > stop {
            last -= 1.0;
        }
        increment = -inc;
    } else {
        let inc = 10f64.powf(power) * factor;
        first = (start / inc).round();
        last = (stop / inc).round();
        if first * inc < start {
            first += 1.0;
        }
        if last * inc > stop {
            last -= 1.0;
        }
        increment = inc;
    }

    if last < first && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(TickSpec {
        first: first as i64,
        last: last as i64,
        increment,
    })
}

/// Returns roughly `count` uniformly spaced, human friendly values in `[start, stop]`.
///
/// Reversed inputs return reversed ticks.
#[must_use]
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let Some(spec) = tick_spec(lo, hi, count as f64) else {
        return Vec::new();
    };
    if spec.last < spec.first {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (spec.first..=spec.last)
        .map(|i| {
            let i = i as f64;
            if spec.increment < 0.0 {
                i / -spec.increment
            } else {
                i * spec.increment
            }
        })
        .collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Step between consecutive ticks for the given span.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    match tick_spec(lo, hi, count as f64) {
        Some(spec) if spec.increment < 0.0 => 1.0 / -spec.increment,
        Some(spec) => spec.increment,
        None => 0.0,
    }
}

/// Number of fractional digits needed to tell ticks `step` apart.
#[must_use]
pub fn precision_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    // Nudge so exact powers of ten are not floored one decade down.
    let exponent = (step.abs().log10() + 1e-9).floor();
    if exponent >= 0.0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let digits = (-exponent) as usize;
        digits
    }
}
