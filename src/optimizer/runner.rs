use super::diversify::StagnationDiversifier;
use super::inertia::InertiaSchedule;
use super::topology::Topology;
use super::{evaluate_checked, MotionCoefficients, SwarmMatrix, SwarmState};
use crate::bounds::BoundsModel;
use crate::config::Config;
use crate::error::{SwarmError, SwarmResult};
use crate::objective::ObjectiveFunction;
use crate::sink::{IterationSink, NullSink};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOptions {
    pub bounds: BoundsModel,
    pub particles: usize,
    pub iterations: usize,
    pub topology: Topology,
    pub inertia_start: f64,
    pub inertia_end: f64,
    pub cognitive: f64,
    pub social: f64,
    pub stagnation_patience: usize,
    /// Progress is logged every this many iterations; 0 disables it.
    pub report_interval: usize,
}

impl OptimizationOptions {
    /// Defaults: 50 particles, 100 iterations, global topology, inertia 0.9 -> 0.4,
    /// c1 = c2 = 2.05, patience 15.
    pub fn new(bounds: BoundsModel) -> Self {
        Self {
            bounds,
            particles: 50,
            iterations: 100,
            topology: Topology::Global,
            inertia_start: 0.9,
            inertia_end: 0.4,
            cognitive: 2.05,
            social: 2.05,
            stagnation_patience: 15,
            report_interval: 10,
        }
    }

    pub fn with_particles(mut self, particles: usize) -> Self {
        self.particles = particles;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_inertia(mut self, start: f64, end: f64) -> Self {
        self.inertia_start = start;
        self.inertia_end = end;
        self
    }

    pub fn with_coefficients(mut self, cognitive: f64, social: f64) -> Self {
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.stagnation_patience = patience;
        self
    }

    pub fn with_report_interval(mut self, interval: usize) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn dimensions(&self) -> usize {
        self.bounds.dimensions()
    }

    pub fn inertia_schedule(&self) -> InertiaSchedule {
        InertiaSchedule::new(self.inertia_start, self.inertia_end, self.iterations)
    }

    pub fn validate(&self) -> SwarmResult<()> {
        if self.dimensions() == 0 {
            return Err(SwarmError::config("dimensionality must be > 0"));
        }
        if self.particles == 0 {
            return Err(SwarmError::config("particle count must be > 0"));
        }
        if self.iterations == 0 {
            return Err(SwarmError::config("iteration budget must be > 0"));
        }
        self.topology.validate(self.particles)?;
        if !self.inertia_start.is_finite() || !self.inertia_end.is_finite() {
            return Err(SwarmError::config("inertia range must be finite"));
        }
        for (name, c) in [("cognitive", self.cognitive), ("social", self.social)] {
            if !(c.is_finite() && c > 0.0) {
                return Err(SwarmError::config(format!(
                    "{} coefficient must be a positive number, got {}",
                    name, c
                )));
            }
        }
        if self.stagnation_patience == 0 {
            return Err(SwarmError::config("stagnation patience must be > 0"));
        }
        Ok(())
    }
}

impl TryFrom<&Config> for OptimizationOptions {
    type Error = SwarmError;

    fn try_from(cfg: &Config) -> SwarmResult<Self> {
        cfg.to_options()
    }
}

/// Per-iteration diagnostics of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    pub best_fitness: Vec<f64>,
    pub mean_best_fitness: Vec<f64>,
    pub diversity: Vec<f64>,
    pub diversification_count: usize,
}

impl RunLog {
    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }

    fn record(&mut self, state: &SwarmState) {
        self.best_fitness.push(state.global_best.fitness);
        self.mean_best_fitness.push(state.mean_best_fitness());
        self.diversity.push(state.diversity());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
    pub log: RunLog,
}

pub struct Optimizer<F> {
    objective: F,
    options: OptimizationOptions,
}

impl<F: ObjectiveFunction> Optimizer<F> {
    pub fn new(objective: F, options: OptimizationOptions) -> SwarmResult<Self> {
        options.validate()?;
        Ok(Self { objective, options })
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    pub fn objective(&self) -> &F {
        &self.objective
    }

    pub fn run(&self, seed: Option<u64>) -> SwarmResult<OptimizationResult> {
        self.run_with_sink(seed, &mut NullSink)
    }

    pub fn run_with_sink<S>(&self, seed: Option<u64>, sink: &mut S) -> SwarmResult<OptimizationResult>
    where
        S: IterationSink + ?Sized,
    {
        let mut rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };
        self.run_with_rng(&mut rng, sink)
    }

    /// Full run on a caller-supplied random stream.
    pub fn run_with_rng<S>(
        &self,
        rng: &mut fastrand::Rng,
        sink: &mut S,
    ) -> SwarmResult<OptimizationResult>
    where
        S: IterationSink + ?Sized,
    {
        let opts = &self.options;
        info!(
            "Starting PSO ({}) | {} particles x {} dims | {} iterations",
            opts.topology,
            opts.particles,
            opts.dimensions(),
            opts.iterations
        );

        let mut run = self.start(rng.clone())?;
        while !run.is_finished() {
            run.step(sink)?;
        }
        // hand the advanced stream back so callers can chain runs
        *rng = run.rng.clone();

        let result = run.finish();
        info!(
            "PSO finished | best fitness {:.6e} | {} diversification(s)",
            result.best_fitness, result.log.diversification_count
        );
        Ok(result)
    }

    /// Initializes the swarm (one batched evaluation) and returns a session
    /// that advances one iteration per `step`.
    pub fn start(&self, mut rng: fastrand::Rng) -> SwarmResult<SwarmRun<'_, F>> {
        let opts = &self.options;
        let state = SwarmState::initialize(opts.particles, &opts.bounds, &self.objective, &mut rng)?;
        let diversifier = StagnationDiversifier::new(opts.stagnation_patience, state.global_best.fitness);

        Ok(SwarmRun {
            optimizer: self,
            state,
            diversifier,
            inertia: opts.inertia_schedule(),
            log: RunLog::default(),
            iteration: 0,
            rng,
        })
    }
}

/// What happened during one `SwarmRun::step`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// 1-based iteration number, as passed to the sink.
    pub iteration: usize,
    pub improved_particles: usize,
    pub global_improved: bool,
    pub inertia: f64,
    pub diversified: Option<Vec<usize>>,
}

/// A run in progress. Owns the swarm exclusively; the host may stop between
/// steps but never inside one.
pub struct SwarmRun<'a, F> {
    optimizer: &'a Optimizer<F>,
    state: SwarmState,
    diversifier: StagnationDiversifier,
    inertia: InertiaSchedule,
    log: RunLog,
    iteration: usize,
    rng: fastrand::Rng,
}

impl<F: ObjectiveFunction> SwarmRun<'_, F> {
    pub fn state(&self) -> &SwarmState {
        &self.state
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    pub fn diversifier(&self) -> &StagnationDiversifier {
        &self.diversifier
    }

    /// Iterations completed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn is_finished(&self) -> bool {
        self.iteration >= self.optimizer.options.iterations
    }

    /// evaluate -> personal bests -> global best -> sink -> move -> diversify -> record
    pub fn step<S>(&mut self, sink: &mut S) -> SwarmResult<StepReport>
    where
        S: IterationSink + ?Sized,
    {
        if self.is_finished() {
            return Err(SwarmError::config(format!(
                "iteration budget of {} already spent",
                self.optimizer.options.iterations
            )));
        }

        let opts = &self.optimizer.options;
        let t = self.iteration;
        let n = self.state.len();
        let dims = self.state.dimensions();

        let fitness = evaluate_checked(&self.optimizer.objective, &self.state.positions)?;
        let improved_particles = self.state.update_personal_bests(&fitness);
        let global_improved = self.state.update_global_best();

        let best = &self.state.global_best;
        if let Err(e) = sink.notify(t + 1, &best.position, best.fitness) {
            warn!("Iteration sink failed at iteration {}: {}", t + 1, e);
        }

        let r1 = SwarmMatrix::random(n, dims, &mut self.rng);
        let r2 = SwarmMatrix::random(n, dims, &mut self.rng);
        let social = opts.topology.social_bests(&self.state);
        let inertia = self.inertia.weight(t);
        let coeffs = MotionCoefficients {
            inertia,
            cognitive: opts.cognitive,
            social: opts.social,
        };
        self.state.advance(&social, coeffs, &r1, &r2, &opts.bounds);

        let diversified = self.diversifier.check(&mut self.state, &opts.bounds, &mut self.rng);
        if let Some(reset) = &diversified {
            info!(
                "Stagnation detected at iteration {}. Re-seeded {} of {} particles",
                t + 1,
                reset.len(),
                n
            );
        }
        self.log.diversification_count = self.diversifier.resets();
        self.log.record(&self.state);

        self.iteration += 1;

        debug!(
            "Iter {} | w={:.4} | improved {} | best {:.6e}",
            t + 1,
            inertia,
            improved_particles,
            self.state.global_best.fitness
        );
        if opts.report_interval > 0 && self.iteration % opts.report_interval == 0 {
            info!(
                "Iter {:4}/{} | Best: {:.4} | Avg PBest: {:.4} | Diversity: {:.2}",
                self.iteration,
                opts.iterations,
                self.state.global_best.fitness,
                self.log.mean_best_fitness.last().copied().unwrap_or_default(),
                self.log.diversity.last().copied().unwrap_or_default()
            );
        }

        Ok(StepReport {
            iteration: t + 1,
            improved_particles,
            global_improved,
            inertia,
            diversified,
        })
    }

    pub fn finish(self) -> OptimizationResult {
        OptimizationResult {
            best_position: self.state.global_best.position,
            best_fitness: self.state.global_best.fitness,
            log: self.log,
        }
    }
}
