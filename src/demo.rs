//! Reference neural process for synthetic 1-D regression
//!
//! A deliberately small model that exercises the full training path:
//! [`TaskGenerator`] samples noisy linear functions, each split into context
//! and target points; [`GaussianNp`] summarises a context set by its mean
//! and predicts a Gaussian at each target input.

use crate::autograd::{ops, Tensor};
use crate::error::{Error, Result};
use crate::model::{Model, Task};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Context and target observations of one function
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPoints {
    /// Context inputs
    pub x_context: Vec<f32>,
    /// Context outputs
    pub y_context: Vec<f32>,
    /// Target inputs
    pub x_target: Vec<f32>,
    /// Target outputs
    pub y_target: Vec<f32>,
}

/// A regression task, or several merged into a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTask {
    members: Vec<TaskPoints>,
}

impl RegressionTask {
    /// Single task from context and target points.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTask`] if inputs and outputs differ in length or there
    /// are no target points.
    pub fn new(
        x_context: Vec<f32>,
        y_context: Vec<f32>,
        x_target: Vec<f32>,
        y_target: Vec<f32>,
    ) -> Result<Self> {
        if x_context.len() != y_context.len() {
            return Err(Error::InvalidTask(format!(
                "context has {} inputs but {} outputs",
                x_context.len(),
                y_context.len()
            )));
        }
        if x_target.len() != y_target.len() {
            return Err(Error::InvalidTask(format!(
                "target has {} inputs but {} outputs",
                x_target.len(),
                y_target.len()
            )));
        }
        if x_target.is_empty() {
            return Err(Error::InvalidTask("task has no target points".into()));
        }
        Ok(Self {
            members: vec![TaskPoints {
                x_context,
                y_context,
                x_target,
                y_target,
            }],
        })
    }

    /// Number of functions in the task
    pub fn batch_size(&self) -> usize {
        self.members.len()
    }

    /// Context points per function
    pub fn num_context(&self) -> usize {
        self.members[0].x_context.len()
    }

    /// Target points per function
    pub fn num_target(&self) -> usize {
        self.members[0].x_target.len()
    }

    /// The functions in the task
    pub fn members(&self) -> &[TaskPoints] {
        &self.members
    }
}

impl Task for RegressionTask {
    /// Requires every function to have the same number of context points and
    /// of target points.
    fn concat(tasks: &[Self]) -> Result<Self> {
        let Some(first) = tasks.first() else {
            return Err(Error::InvalidTask(
                "cannot merge an empty list of tasks".into(),
            ));
        };
        let expected = vec![first.num_context(), first.num_target()];

        let mut members = Vec::with_capacity(tasks.iter().map(RegressionTask::batch_size).sum());
        for task in tasks {
            for points in &task.members {
                let actual = vec![points.x_context.len(), points.x_target.len()];
                if actual != expected {
                    return Err(Error::ShapeMismatch { expected, actual });
                }
                members.push(points.clone());
            }
        }
        Ok(Self { members })
    }

    fn describe_shape(&self) -> String {
        format!(
            "{} x (context {}, target {})",
            self.batch_size(),
            self.num_context(),
            self.num_target()
        )
    }
}

/// Gaussian neural process with a mean-pooling encoder
///
/// r = mean(y_context)
/// μ(x) = w · [x, r, 1]
/// log σ(x) = v · [x, r, 1]
///
/// `Clone` shares the parameter tensors.
#[derive(Debug, Clone)]
pub struct GaussianNp {
    w: Tensor,
    v: Tensor,
}

impl GaussianNp {
    /// Small random mean weights, unit predictive scale
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let w: Vec<f32> = (0..3).map(|_| rng.random_range(-0.1..0.1)).collect();
        Self {
            w: Tensor::from_vec(w, true),
            v: Tensor::zeros(3, true),
        }
    }

    /// Model with the given weights
    pub fn from_weights(w: [f32; 3], v: [f32; 3]) -> Self {
        Self {
            w: Tensor::from_vec(w.to_vec(), true),
            v: Tensor::from_vec(v.to_vec(), true),
        }
    }

    /// Mean weights `[x, r, bias]`
    pub fn mean_weights(&self) -> Vec<f32> {
        self.w.to_vec()
    }

    /// Log-scale weights `[x, r, bias]`
    pub fn log_scale_weights(&self) -> Vec<f32> {
        self.v.to_vec()
    }

    /// Predictive mean and standard deviation at `x` given a context set
    pub fn predict(&self, y_context: &[f32], x: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let r = encode(y_context);
        let (mu, log_sigma) = self.decode(r, &Tensor::from_vec(x.to_vec(), false));
        let sigma = log_sigma.to_vec().into_iter().map(f32::exp).collect();
        (mu.to_vec(), sigma)
    }

    fn decode(&self, r: f32, x: &Tensor) -> (Tensor, Tensor) {
        (linear(&self.w, x, r), linear(&self.v, x, r))
    }

    /// Summed negative log-likelihood of one function's targets
    fn points_nll(&self, points: &TaskPoints, normalise: bool) -> Tensor {
        let x = Tensor::from_vec(points.x_target.clone(), false);
        let y = Tensor::from_vec(points.y_target.clone(), false);
        let (mu, log_sigma) = self.decode(encode(&points.y_context), &x);

        // 0.5 ln 2π + log σ + 0.5 (y - μ)² / σ²
        let sq_err = ops::square(&ops::sub(&y, &mu));
        let inv_var = ops::exp(&ops::scale(&log_sigma, -2.0));
        let quad = ops::scale(&ops::mul(&sq_err, &inv_var), 0.5);
        let nll = ops::shift(&ops::add(&log_sigma, &quad), 0.5 * (2.0 * PI).ln());

        let total = ops::sum(&nll);
        if normalise {
            ops::scale(&total, 1.0 / points.x_target.len() as f32)
        } else {
            total
        }
    }
}

impl Model for GaussianNp {
    type Task = RegressionTask;

    /// Mean over the task's functions of each function's NLL.
    fn loss_fn(&self, task: &RegressionTask, normalise: bool) -> Result<Tensor> {
        let losses: Vec<Tensor> = task
            .members
            .iter()
            .map(|points| self.points_nll(points, normalise))
            .collect();
        match losses.as_slice() {
            [] => Err(Error::InvalidTask("task has no functions".into())),
            [single] => Ok(single.clone()),
            _ => Ok(ops::mean(&ops::concat(&losses))),
        }
    }

    fn parameters(&self) -> Vec<Tensor> {
        vec![self.w.clone(), self.v.clone()]
    }
}

fn encode(y_context: &[f32]) -> f32 {
    if y_context.is_empty() {
        0.0
    } else {
        y_context.iter().sum::<f32>() / y_context.len() as f32
    }
}

/// weights · [x, r, 1] for every x
fn linear(weights: &Tensor, x: &Tensor, r: f32) -> Tensor {
    let n = x.len();
    let slope = ops::mul(&ops::broadcast(&ops::select(weights, 0), n), x);
    let context = ops::scale(&ops::broadcast(&ops::select(weights, 1), n), r);
    let bias = ops::broadcast(&ops::select(weights, 2), n);
    ops::add(&ops::add(&slope, &context), &bias)
}

/// Seeded sampler of noisy linear functions `y = a x + b + ε`
///
/// Slope and intercept are uniform on [-1, 1], inputs uniform on [-2, 2] and
/// ε is Gaussian with standard deviation `noise`.
#[derive(Debug, Clone)]
pub struct TaskGenerator {
    rng: StdRng,
    noise: f32,
}

impl TaskGenerator {
    /// Generator with noise 0.1
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            noise: 0.1,
        }
    }

    /// Set the observation noise
    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    /// One task with `num_context` context and `num_target` target points
    ///
    /// `num_target` must be positive.
    pub fn sample(&mut self, num_context: usize, num_target: usize) -> RegressionTask {
        let a: f32 = self.rng.random_range(-1.0..=1.0);
        let b: f32 = self.rng.random_range(-1.0..=1.0);

        let (x_context, y_context) = self.observe(a, b, num_context);
        let (x_target, y_target) = self.observe(a, b, num_target.max(1));
        RegressionTask {
            members: vec![TaskPoints {
                x_context,
                y_context,
                x_target,
                y_target,
            }],
        }
    }

    /// `num_tasks` independent tasks of the same shape
    pub fn generate(
        &mut self,
        num_tasks: usize,
        num_context: usize,
        num_target: usize,
    ) -> Vec<RegressionTask> {
        (0..num_tasks)
            .map(|_| self.sample(num_context, num_target))
            .collect()
    }

    fn observe(&mut self, a: f32, b: f32, n: usize) -> (Vec<f32>, Vec<f32>) {
        let x: Vec<f32> = (0..n)
            .map(|_| self.rng.random_range(-2.0..=2.0))
            .collect();
        let y = x
            .iter()
            .map(|&xi| a * xi + b + self.noise * self.standard_normal())
            .collect();
        (x, y)
    }

    /// Box-Muller
    fn standard_normal(&mut self) -> f32 {
        let u1: f32 = 1.0 - self.rng.random::<f32>();
        let u2: f32 = self.rng.random();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}
