/**
Water retention (pF) curves built from a calibration table.

A soil table holds volumetric water content in column 0 and one pF curve per soil in
columns 1..N. Missing calibration points are NaN and may only trail a column. Each
lookup rebuilds a piecewise-linear curve from the table: the soil column is selected,
cleaned of its trailing NaNs and interpolated linearly between knots. Water contents
outside the calibrated range are extrapolated along the nearest edge segment.
*/
use crate::error::{Result, SoilError};
use nalgebra::{DMatrix, DVector};

// Calibration table: column 0 water content [-], columns 1..N pF [-] per soil
#[derive(Clone, Debug, PartialEq)]
pub struct SoilTable {
    data: DMatrix<f64>,
}

impl SoilTable {
    pub fn new(data: DMatrix<f64>) -> Self {
        SoilTable { data }
    }

    // Builds a table from row slices, all rows must have the same width
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let ncols = rows.first().map_or(0, |r| r.len());
        for (row, values) in rows.iter().enumerate() {
            if values.len() != ncols {
                return Err(SoilError::RaggedRow {
                    row,
                    expected: ncols,
                    found: values.len(),
                });
            }
        }
        let data = DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Ok(SoilTable { data })
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn column(&self, j: usize) -> DVector<f64> {
        self.data.column(j).into_owned()
    }

    pub fn water_content(&self) -> DVector<f64> {
        self.column(0)
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }
}

impl From<DMatrix<f64>> for SoilTable {
    fn from(data: DMatrix<f64>) -> Self {
        SoilTable::new(data)
    }
}

// Straight line through a knot: y = intercept + slope * (x - x0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub x0: f64,
    pub intercept: f64,
    pub slope: f64,
}

impl Segment {
    fn through(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Segment {
            x0,
            intercept: y0,
            slope: (y1 - y0) / (x1 - x0),
        }
    }

    pub fn value(&self, x: f64) -> f64 {
        self.intercept + self.slope * (x - self.x0)
    }
}

// Piecewise-linear pF curve of one soil
#[derive(Clone, Debug)]
pub struct RetentionCurve {
    soil: usize,
    knots: Vec<f64>,
    segments: Vec<Segment>,
}

impl RetentionCurve {
    /**
    Builds the curve through the points `(x[i], y[i])`.

    Points are sorted by water content first, so the table rows may come in any order.

    # Errors
    * `TooFewPoints` if fewer than two points are given.
    * `NonMonotonic` if a water content value repeats (or is NaN).
    */
    pub fn new(soil: usize, x: &[f64], y: &[f64]) -> Result<Self> {
        let mut points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        if points.len() < 2 {
            return Err(SoilError::TooFewPoints {
                soil,
                points: points.len(),
            });
        }
        // total_cmp puts NaN at either end depending on its sign bit
        if points.iter().any(|p| p.0.is_nan()) {
            return Err(SoilError::NonMonotonic { soil });
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(SoilError::NonMonotonic { soil });
        }

        let knots = points.iter().map(|p| p.0).collect();
        let segments = points
            .windows(2)
            .map(|w| Segment::through(w[0].0, w[0].1, w[1].0, w[1].1))
            .collect();

        Ok(RetentionCurve {
            soil,
            knots,
            segments,
        })
    }

    pub fn soil(&self) -> usize {
        self.soil
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn first_segment(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn last_segment(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    // (min, max) of the calibrated water contents
    pub fn x_range(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    // Evaluates the curve; outside the knots the edge segments are extended
    pub fn value(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let (min, max) = self.x_range();
        if x <= min {
            self.first_segment().value(x)
        } else if x >= max {
            self.last_segment().value(x)
        } else {
            // knots[i] <= x < knots[i + 1]
            let i = self.knots.partition_point(|&k| k <= x) - 1;
            self.segments[i].value(x)
        }
    }
}

/**
Drops the trailing missing points of a calibration column.

Both columns are cut at the first NaN in `y`. Without NaN the input is returned as is.
*/
pub fn clean_column(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    match y.iter().position(|v| v.is_nan()) {
        Some(k) => (x[..k.min(x.len())].to_vec(), y[..k].to_vec()),
        None => (x.to_vec(), y.to_vec()),
    }
}

/**
Builds the pF curve of `soil` from a calibration table.

A soil index beyond the table width falls back to the last column with a warning.

# Errors
* `EmptyTable` if the table has no columns.
* Any error of `RetentionCurve::new` for the cleaned column.
*/
pub fn build_interpolant(soil: usize, soil_data: &SoilTable) -> Result<RetentionCurve> {
    let ncols = soil_data.ncols();
    if ncols == 0 {
        return Err(SoilError::EmptyTable);
    }

    let soil = if soil >= ncols {
        log::warn!(
            "soil {soil} not available, switching to highest indexed soil {} in table",
            ncols - 1
        );
        ncols - 1
    } else {
        soil
    };

    let x = soil_data.column(0);
    let y = soil_data.column(soil);
    let (x, y) = clean_column(x.as_slice(), y.as_slice());
    RetentionCurve::new(soil, &x, &y)
}

// pF of a soil at a given water content
pub fn get_pf(soil: usize, water_content: f64, soil_data: &SoilTable) -> Result<f64> {
    Ok(build_interpolant(soil, soil_data)?.value(water_content))
}

/**
Matric potential psiM = -10^pF of a soil at a given water content.

Inside the calibrated range pF is interpolated between the bracketing knots. At or
below the driest point the first segment is extended, at or above the wettest point
the last one, so values outside the table are extrapolated rather than clamped.
*/
pub fn calc_psi_m(soil: usize, water_content: f64, soil_data: &SoilTable) -> Result<f64> {
    let pf = get_pf(soil, water_content, soil_data)?;
    Ok(-(10f64.powf(pf)))
}
