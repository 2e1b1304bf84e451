//! Exhaustive orientation grid search over tilt × azimuth.
//!
//! Brute force on purpose: annual energy as a function of orientation is
//! not guaranteed convex, and the grids in play stay under a few thousand
//! cells. Cells are independent pure functions of `(weather, tilt,
//! azimuth)` and evaluate across rayon's worker pool; the reduction to
//! best/worst uses an explicit combine keyed on `(total, grid index)` so
//! the result is independent of evaluation order. Ties on total energy
//! break to the first-encountered cell in grid order (ascending tilt,
//! then ascending azimuth).

use rayon::prelude::*;

use crate::config::{ArrayConfig, SweepConfig};
use crate::sim::aggregate::EnergySeries;
use crate::sim::pipeline::simulate;
use crate::weather::WeatherSeries;

/// One evaluated grid cell: orientation and its scalar annual energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Panel tilt (degrees).
    pub tilt_deg: f64,
    /// Panel azimuth (degrees).
    pub azimuth_deg: f64,
    /// Total energy over the full series (kWh).
    pub total_kwh: f64,
}

/// An extremal cell with its full energy series retained for downstream
/// comparison.
#[derive(Debug, Clone)]
pub struct SweepExtremum {
    /// Panel tilt (degrees).
    pub tilt_deg: f64,
    /// Panel azimuth (degrees).
    pub azimuth_deg: f64,
    /// Total energy over the full series (kWh).
    pub total_kwh: f64,
    /// Full bucketed energy series for this orientation.
    pub energy: EnergySeries,
}

/// Complete sweep output: every cell's total plus the extrema.
#[derive(Debug, Clone)]
pub struct SweepResult {
    /// All cells in grid order (ascending tilt, then ascending azimuth).
    pub cells: Vec<SweepPoint>,
    /// Highest-yield orientation.
    pub best: SweepExtremum,
    /// Lowest-yield orientation.
    pub worst: SweepExtremum,
}

/// Inclusive float range with a fixed step.
fn axis_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let count = ((max - min) / step + 1e-9).floor() as usize + 1;
    (0..count).map(|i| min + i as f64 * step).collect()
}

/// Enumerates grid cells in canonical order.
fn grid_cells(grid: &SweepConfig) -> Vec<(f64, f64)> {
    let tilts = axis_values(grid.tilt_min_deg, grid.tilt_max_deg, grid.tilt_step_deg);
    let azimuths = axis_values(
        grid.azimuth_min_deg,
        grid.azimuth_max_deg,
        grid.azimuth_step_deg,
    );
    let mut cells = Vec::with_capacity(tilts.len() * azimuths.len());
    for &tilt in &tilts {
        for &azimuth in &azimuths {
            cells.push((tilt, azimuth));
        }
    }
    cells
}

struct Candidate {
    index: usize,
    point: SweepPoint,
    energy: EnergySeries,
}

/// `b` replaces `a` when strictly better, or on an exact tie when it
/// came earlier in grid order.
fn better(a: Candidate, b: Candidate, prefer_max: bool) -> Candidate {
    let improves = if prefer_max {
        b.point.total_kwh > a.point.total_kwh
    } else {
        b.point.total_kwh < a.point.total_kwh
    };
    if improves || (b.point.total_kwh == a.point.total_kwh && b.index < a.index) {
        b
    } else {
        a
    }
}

struct Accumulator {
    cells: Vec<SweepPoint>,
    best: Option<Candidate>,
    worst: Option<Candidate>,
}

impl Accumulator {
    fn empty() -> Self {
        Self {
            cells: Vec::new(),
            best: None,
            worst: None,
        }
    }

    fn single(candidate: Candidate) -> Self {
        let best = Candidate {
            index: candidate.index,
            point: candidate.point,
            energy: candidate.energy.clone(),
        };
        Self {
            cells: vec![candidate.point],
            best: Some(best),
            worst: Some(candidate),
        }
    }

    fn merge(mut self, other: Self) -> Self {
        // rayon reduces in tree order with the left operand earlier in
        // the iteration, so concatenation preserves grid order.
        self.cells.extend(other.cells);
        self.best = match (self.best, other.best) {
            (Some(a), Some(b)) => Some(better(a, b, true)),
            (a, b) => a.or(b),
        };
        self.worst = match (self.worst, other.worst) {
            (Some(a), Some(b)) => Some(better(a, b, false)),
            (a, b) => a.or(b),
        };
        self
    }
}

/// Evaluates the full pipeline for every `(tilt, azimuth)` cell of the
/// grid and tracks the extremal orientations.
///
/// The base array configuration supplies every non-orientation
/// parameter; each cell overrides only tilt and azimuth.
///
/// # Panics
///
/// Panics if the grid is empty (validated configs always yield at least
/// one cell).
pub fn run_sweep(weather: &WeatherSeries, base: &ArrayConfig, grid: &SweepConfig) -> SweepResult {
    let cells = grid_cells(grid);
    assert!(!cells.is_empty(), "sweep grid must contain at least one cell");

    let reduced = cells
        .par_iter()
        .enumerate()
        .map(|(index, &(tilt_deg, azimuth_deg))| {
            let cell_config = ArrayConfig {
                tilt_deg,
                surface_azimuth_deg: azimuth_deg,
                ..base.clone()
            };
            let power = simulate(weather, &cell_config);
            let energy = EnergySeries::from_power(&power);
            let point = SweepPoint {
                tilt_deg,
                azimuth_deg,
                total_kwh: energy.total_kwh(),
            };
            Accumulator::single(Candidate {
                index,
                point,
                energy,
            })
        })
        .reduce(Accumulator::empty, Accumulator::merge);

    let best = reduced.best.map(|c| SweepExtremum {
        tilt_deg: c.point.tilt_deg,
        azimuth_deg: c.point.azimuth_deg,
        total_kwh: c.point.total_kwh,
        energy: c.energy,
    });
    let worst = reduced.worst.map(|c| SweepExtremum {
        tilt_deg: c.point.tilt_deg,
        azimuth_deg: c.point.azimuth_deg,
        total_kwh: c.point.total_kwh,
        energy: c.energy,
    });

    match (best, worst) {
        (Some(best), Some(worst)) => SweepResult {
            cells: reduced.cells,
            best,
            worst,
        },
        _ => unreachable!("non-empty grid always produces extrema"),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::{ArrayConfig, SweepConfig, SyntheticWeatherConfig};
    use crate::weather::synthetic_series;

    fn short_weather() -> WeatherSeries {
        let cfg = SyntheticWeatherConfig {
            days: 2,
            step_minutes: 30,
            ..SyntheticWeatherConfig::default()
        };
        synthetic_series(&cfg, 42).unwrap()
    }

    fn small_grid() -> SweepConfig {
        SweepConfig {
            tilt_min_deg: 0.0,
            tilt_max_deg: 90.0,
            tilt_step_deg: 15.0,
            azimuth_min_deg: 120.0,
            azimuth_max_deg: 240.0,
            azimuth_step_deg: 30.0,
        }
    }

    #[test]
    fn axis_values_are_inclusive_of_both_ends() {
        assert_eq!(axis_values(0.0, 90.0, 30.0), vec![0.0, 30.0, 60.0, 90.0]);
        assert_eq!(axis_values(10.0, 10.0, 5.0), vec![10.0]);
    }

    #[test]
    fn grid_order_is_tilt_major_ascending() {
        let grid = SweepConfig {
            tilt_min_deg: 0.0,
            tilt_max_deg: 10.0,
            tilt_step_deg: 10.0,
            azimuth_min_deg: 90.0,
            azimuth_max_deg: 110.0,
            azimuth_step_deg: 20.0,
        };
        assert_eq!(
            grid_cells(&grid),
            vec![(0.0, 90.0), (0.0, 110.0), (10.0, 90.0), (10.0, 110.0)]
        );
    }

    #[test]
    fn cells_come_back_in_grid_order() {
        let weather = short_weather();
        let result = run_sweep(&weather, &ArrayConfig::default(), &small_grid());

        let expected = grid_cells(&small_grid());
        assert_eq!(result.cells.len(), expected.len());
        for (cell, (tilt, azimuth)) in result.cells.iter().zip(expected) {
            assert_eq!(cell.tilt_deg, tilt);
            assert_eq!(cell.azimuth_deg, azimuth);
        }
    }

    #[test]
    fn extrema_bound_every_cell() {
        let weather = short_weather();
        let result = run_sweep(&weather, &ArrayConfig::default(), &small_grid());
        for cell in &result.cells {
            assert!(cell.total_kwh <= result.best.total_kwh);
            assert!(cell.total_kwh >= result.worst.total_kwh);
        }
        assert_relative_eq!(result.best.total_kwh, result.best.energy.total_kwh());
        assert_relative_eq!(result.worst.total_kwh, result.worst.energy.total_kwh());
    }

    #[test]
    fn sweep_is_deterministic_under_parallel_evaluation() {
        let weather = short_weather();
        let a = run_sweep(&weather, &ArrayConfig::default(), &small_grid());
        let b = run_sweep(&weather, &ArrayConfig::default(), &small_grid());
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.best.total_kwh, b.best.total_kwh);
        assert_eq!(a.best.tilt_deg, b.best.tilt_deg);
        assert_eq!(a.best.azimuth_deg, b.best.azimuth_deg);
        assert_eq!(a.worst.tilt_deg, b.worst.tilt_deg);
        assert_eq!(a.worst.azimuth_deg, b.worst.azimuth_deg);
    }

    #[test]
    fn ties_break_to_first_cell_in_grid_order() {
        // Flat panels ignore azimuth entirely, so every tilt=0 cell ties.
        // A one-row grid at tilt 0 must pick the lowest azimuth for both
        // extrema.
        let weather = short_weather();
        let grid = SweepConfig {
            tilt_min_deg: 0.0,
            tilt_max_deg: 0.0,
            tilt_step_deg: 5.0,
            azimuth_min_deg: 90.0,
            azimuth_max_deg: 270.0,
            azimuth_step_deg: 45.0,
        };
        let result = run_sweep(&weather, &ArrayConfig::default(), &grid);
        assert_eq!(result.best.azimuth_deg, 90.0);
        assert_eq!(result.worst.azimuth_deg, 90.0);
    }

    #[test]
    fn vertical_panel_yields_less_than_moderate_tilt() {
        // Directional sanity check against the synthetic symmetric
        // profile: a 90° wall must collect strictly less over the run
        // than a latitude-ish tilt.
        let weather = short_weather();
        let result = run_sweep(&weather, &ArrayConfig::default(), &small_grid());

        let total_at = |tilt: f64, azimuth: f64| {
            result
                .cells
                .iter()
                .find(|c| c.tilt_deg == tilt && c.azimuth_deg == azimuth)
                .map(|c| c.total_kwh)
                .unwrap()
        };
        assert!(total_at(90.0, 180.0) < total_at(30.0, 180.0));
        assert_ne!(result.best.tilt_deg, 90.0);
    }
}
