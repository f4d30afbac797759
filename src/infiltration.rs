/**
Module for calculating the infiltration rate of a rainfall event with the Green-Ampt model.

Cumulative infiltration F(t) follows the closed-form approximation of the sharp wetting
front solution, expressed in the normalized time t* = 2 ks² t / S², where
S² = 2 eta ks sqrt(H psi_f) is the squared sorptivity term. The rate at each time step
is the forward difference of F between consecutive steps.

Invalid inputs (non-positive step, non-positive ks, zero sorptivity) are not rejected,
they show up as NaN or infinite values in the output.
*/
use nalgebra::DVector;
use serde::Deserialize;

// Green-Ampt soil parameters for an event
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct GreenAmptParams {
    pub eta: f64,             // Porosity related factor [-]
    pub ks: f64,              // Saturated hydraulic conductivity [length/time]
    pub sqr_hpsi_f_term: f64, // Precomputed sqrt(suction head * porosity deficit) term
}

impl GreenAmptParams {
    pub fn new(eta: f64, ks: f64, sqr_hpsi_f_term: f64) -> Self {
        GreenAmptParams {
            eta,
            ks,
            sqr_hpsi_f_term,
        }
    }

    // Combined sorptivity squared term S²
    pub fn sorptivity_sqr(&self) -> f64 {
        2.0 * self.eta * self.ks * self.sqr_hpsi_f_term
    }

    pub fn series(&self, event_length: u32, step: f64) -> InfiltrationSeries {
        infiltration_series(event_length, step, self.eta, self.ks, self.sqr_hpsi_f_term)
    }
}

// One row of an infiltration series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfiltrationSample {
    pub time: f64,       // Time since event start
    pub cumulative: f64, // Cumulative infiltration F(t)
    pub rate: f64,       // Infiltration rate, NaN for the last sample
}

// Time series of an infiltration event, one entry per time step
#[derive(Clone, Debug)]
pub struct InfiltrationSeries {
    time: DVector<f64>,
    cumulative: DVector<f64>,
    rate: DVector<f64>,
}

impl InfiltrationSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn times(&self) -> &DVector<f64> {
        &self.time
    }

    pub fn cumulative(&self) -> &DVector<f64> {
        &self.cumulative
    }

    // The last rate is always NaN: there is no following step to difference against.
    pub fn rates(&self) -> &DVector<f64> {
        &self.rate
    }

    pub fn into_rates(self) -> DVector<f64> {
        self.rate
    }

    pub fn samples(&self) -> impl Iterator<Item = InfiltrationSample> + '_ {
        (0..self.len()).map(|i| InfiltrationSample {
            time: self.time[i],
            cumulative: self.cumulative[i],
            rate: self.rate[i],
        })
    }
}

// Largest series built, three vectors of this length are about 240 MB
pub const MAX_STEP_COUNT: usize = 10_000_000;

/**
Number of whole time steps in an event.

The fractional remainder of `event_length / step` is dropped. A ratio that is not a
positive finite number (step of zero, negative step, NaN) gives zero steps, and so does
a ratio above `MAX_STEP_COUNT` (a warning is logged in that case).
*/
pub fn step_count(event_length: u32, step: f64) -> usize {
    let ratio = f64::from(event_length) / step;
    if !(ratio.is_finite() && ratio > 0.0) {
        return 0;
    }
    let ratio = ratio.floor();
    if ratio > MAX_STEP_COUNT as f64 {
        log::warn!("{ratio} time steps exceed the limit of {MAX_STEP_COUNT}, no series built");
        return 0;
    }
    ratio as usize
}

/**
Cumulative infiltration F(t) of the Green-Ampt approximation.

# Arguments
* `t` - Time since event start.
* `ks` - Saturated hydraulic conductivity.
* `s_sqr` - Sorptivity squared term, `2 * eta * ks * sqr_hpsi_f_term`.

# Returns
F(t) in the length unit of `ks`. The expression is 0/0 at t* = 0, where its limit
(zero) is returned instead.
*/
pub fn cumulative_infiltration(t: f64, ks: f64, s_sqr: f64) -> f64 {
    let t_star = 2.0 * ks.powi(2) * t / s_sqr;
    if t_star == 0.0 {
        return 0.0;
    }

    let root = (2.0 * t_star).sqrt();
    let y = 1.0 + t_star + root / (1.0 + root / 6.0);
    let upper_term = t_star + y.ln();
    let lower_term = 1.0 / y - 1.0;

    s_sqr / (2.0 * ks) * (-1.0 - upper_term / lower_term)
}

// Full time series (time, cumulative infiltration, rate) of an event
pub fn infiltration_series(
    event_length: u32,
    step: f64,
    eta: f64,
    ks: f64,
    sqr_hpsi_f_term: f64,
) -> InfiltrationSeries {
    let n = step_count(event_length, step);
    let s_sqr = 2.0 * eta * ks * sqr_hpsi_f_term;

    let time = DVector::from_fn(n, |i, _| i as f64 * step);
    let cumulative = time.map(|t| cumulative_infiltration(t, ks, s_sqr));

    let mut rate = DVector::from_element(n, f64::NAN);
    for i in 0..n.saturating_sub(1) {
        rate[i] = (cumulative[i + 1] - cumulative[i]) / step;
    }

    log::debug!("infiltration series: {n} steps, S² = {s_sqr}");

    InfiltrationSeries {
        time,
        cumulative,
        rate,
    }
}

/**
Infiltration rates of an event, one per time step.

# Arguments
* `event_length` - Total event duration, in the unit of `step`.
* `step` - Time increment, > 0.
* `eta` - Porosity related factor.
* `ks` - Saturated hydraulic conductivity, > 0.
* `sqr_hpsi_f_term` - sqrt(suction head * porosity deficit).

# Returns
A vector of length `floor(event_length / step)`. The last entry is NaN since the rate
is a forward difference.
*/
pub fn get_inf(
    event_length: u32,
    step: f64,
    eta: f64,
    ks: f64,
    sqr_hpsi_f_term: f64,
) -> DVector<f64> {
    infiltration_series(event_length, step, eta, ks, sqr_hpsi_f_term).into_rates()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_is_whole_step_count() {
        assert_eq!(get_inf(10, 1.0, 0.4, 0.5, 2.0).len(), 10);
        assert_eq!(get_inf(10, 0.5, 0.4, 0.5, 2.0).len(), 20);
        assert_eq!(get_inf(10, 3.0, 0.4, 0.5, 2.0).len(), 3);
        assert_eq!(get_inf(7, 2.0, 0.4, 0.5, 2.0).len(), 3);
    }

    #[test]
    fn rates_are_finite_except_last() {
        let inf = get_inf(10, 1.0, 0.4, 0.5, 2.0);
        assert_eq!(inf.len(), 10);
        for i in 0..9 {
            assert!(inf[i].is_finite(), "rate {i} is {}", inf[i]);
            assert!(inf[i] > 0.0);
        }
        assert!(inf[9].is_nan());
    }

    #[test]
    fn rate_decreases_towards_ks() {
        let ks = 0.5;
        let inf = get_inf(200, 1.0, 0.4, ks, 2.0);
        assert!(inf[0] > inf[1]);
        assert!(inf[1] > inf[10]);
        assert!(inf[10] > inf[100]);
        assert!(inf[100] > inf[197]);
        assert!(inf[197] > ks);
        assert!(inf[197] < 1.2 * ks);
    }

    #[test]
    fn cumulative_starts_at_zero() {
        let series = infiltration_series(5, 1.0, 0.4, 0.5, 2.0);
        assert_eq!(series.cumulative()[0], 0.0);
        assert_relative_eq!(series.times()[4], 4.0);

        // Small t* approaches the t = 0 limit continuously
        assert!(cumulative_infiltration(1e-9, 0.5, 0.8) < 1e-4);
    }

    #[test]
    fn rate_is_forward_difference() {
        let series = infiltration_series(6, 0.5, 0.3, 1.2, 1.5);
        let samples: Vec<_> = series.samples().collect();
        for w in samples.windows(2) {
            assert_relative_eq!(w[0].rate, (w[1].cumulative - w[0].cumulative) / 0.5);
        }
        assert!(samples.last().unwrap().rate.is_nan());
    }

    #[test]
    fn invalid_step_gives_empty_series() {
        assert!(get_inf(10, 0.0, 0.4, 0.5, 2.0).is_empty());
        assert!(get_inf(10, -1.0, 0.4, 0.5, 2.0).is_empty());
        assert!(get_inf(10, f64::NAN, 0.4, 0.5, 2.0).is_empty());
        assert!(get_inf(0, 1.0, 0.4, 0.5, 2.0).is_empty());
    }

    #[test]
    fn tiny_step_is_bounded() {
        assert_eq!(step_count(10, 1e-12), 0);
        assert!(get_inf(10, 1e-12, 0.4, 0.5, 2.0).is_empty());
        assert_eq!(step_count(10_000_000, 1.0), MAX_STEP_COUNT);
        assert_eq!(step_count(10_000_001, 1.0), 0);
    }

    #[test]
    fn zero_sorptivity_propagates_nan() {
        let inf = get_inf(4, 1.0, 0.0, 0.5, 2.0);
        assert_eq!(inf.len(), 4);
        assert!(inf.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn params_match_free_function() {
        let params = GreenAmptParams::new(0.4, 0.5, 2.0);
        assert_relative_eq!(params.sorptivity_sqr(), 0.8);
        let a = params.series(10, 1.0);
        let b = get_inf(10, 1.0, 0.4, 0.5, 2.0);
        for i in 0..9 {
            assert_eq!(a.rates()[i].to_bits(), b[i].to_bits());
        }
    }
}
