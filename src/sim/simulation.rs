//! Parallel Monte Carlo tracing driver.
//!
//! Rays are independent: each one only reads the immutable geometry and
//! emitter and deposits max-updates into the shared grid. Workers trace
//! into private partition grids that are reduced with an element-wise max,
//! so the final grid is identical for any execution order and no cell
//! update is ever lost.

use log::{debug, info};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::sim::config::SimulationConfig;
use crate::sim::scene::Scene;
use crate::sim::tracer::Tracer;

/// Progress snapshot passed to `run_with_progress` callbacks.
#[derive(Debug, Clone, Copy)]
pub struct TraceProgress {
    /// Rays traced so far (0..=num_rays).
    pub rays_done: usize,
    /// Target number of rays from the configuration.
    pub num_rays: usize,
    /// Total reflections across all completed rays.
    pub reflections: u64,
}

/// Result of a completed tracing run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationSummary {
    pub rays_traced: usize,
    pub reflections: u64,
}

trait ProgressReporter {
    fn every_batches(&self) -> usize;
    fn report(&mut self, progress: &TraceProgress);
}

struct NoProgress;
impl ProgressReporter for NoProgress {
    fn every_batches(&self) -> usize {
        0
    }
    fn report(&mut self, _progress: &TraceProgress) {}
}

struct FnProgress<F> {
    every_batches: usize,
    f: F,
}
impl<F> ProgressReporter for FnProgress<F>
where
    F: FnMut(&TraceProgress),
{
    fn every_batches(&self) -> usize {
        self.every_batches
    }
    fn report(&mut self, progress: &TraceProgress) {
        (self.f)(progress);
    }
}

/// Traces `config.num_rays` random rays into the scene grid.
///
/// The smoothing pass is not part of this call; run
/// `scene.apply_box_filter` afterwards, before any rendering.
pub fn run(scene: &mut Scene, config: &SimulationConfig) -> Result<SimulationSummary> {
    run_internal(scene, config, NoProgress)
}

/// Runs the simulation while periodically reporting progress.
///
/// - `every_batches=0` disables progress reporting.
/// - The reporter is called once at start (`rays_done=0`), then every
///   `every_batches` batches, plus once at the end.
pub fn run_with_progress<F>(
    scene: &mut Scene,
    config: &SimulationConfig,
    every_batches: usize,
    report: F,
) -> Result<SimulationSummary>
where
    F: FnMut(&TraceProgress),
{
    run_internal(
        scene,
        config,
        FnProgress {
            every_batches,
            f: report,
        },
    )
}

fn run_internal<R: ProgressReporter>(
    scene: &mut Scene,
    config: &SimulationConfig,
    mut reporter: R,
) -> Result<SimulationSummary> {
    if config.batch_size == 0 {
        return Err(Error::InvalidConfiguration(
            "batch size must be positive".to_string(),
        ));
    }

    let tracer = Tracer::new(&scene.geometry, &scene.emitter, config.max_reflections);
    let num_rays = config.num_rays;
    info!(
        "tracing {num_rays} rays (bounce budget: {:?})",
        config.max_reflections
    );

    let report_every = reporter.every_batches();
    if report_every > 0 {
        reporter.report(&TraceProgress {
            rays_done: 0,
            num_rays,
            reflections: 0,
        });
    }

    let mut rays_done = 0usize;
    let mut reflections = 0u64;
    let mut batches_done = 0usize;

    while rays_done < num_rays {
        let batch = config.batch_size.min(num_rays - rays_done);

        let (batch_grid, batch_reflections) = (0..batch)
            .into_par_iter()
            .try_fold(
                || (scene.grid.empty_like(), 0u64),
                |(mut grid, bounces), _| {
                    let n = tracer.trace_emitted_ray(&mut grid)?;
                    Ok::<_, Error>((grid, bounces + u64::from(n)))
                },
            )
            .try_reduce(
                || (scene.grid.empty_like(), 0u64),
                |(mut a, na), (b, nb)| {
                    a.merge_max(&b);
                    Ok((a, na + nb))
                },
            )?;

        scene.grid.merge_max(&batch_grid);
        rays_done += batch;
        reflections += batch_reflections;
        batches_done += 1;
        debug!("batch {batches_done} done ({rays_done}/{num_rays} rays)");

        if report_every > 0 && (batches_done % report_every == 0 || rays_done == num_rays) {
            reporter.report(&TraceProgress {
                rays_done,
                num_rays,
                reflections,
            });
        }
    }

    info!("traced {rays_done} rays, {reflections} reflections");
    Ok(SimulationSummary {
        rays_traced: rays_done,
        reflections,
    })
}
