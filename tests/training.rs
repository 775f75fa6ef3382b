//! End-to-end training tests on the reference model

use approx::assert_abs_diff_eq;
use convnp_trainer::autograd::{GradScaler, MixedPrecisionConfig, Precision, Tensor};
use convnp_trainer::backend::{Backend, BackendKind, TrainingBackend};
use convnp_trainer::config::RuntimeConfig;
use convnp_trainer::demo::{GaussianNp, RegressionTask, TaskGenerator};
use convnp_trainer::device::{set_gpu_default_device, DeviceContext, FixedDetector};
use convnp_trainer::optim::Optimizer;
use convnp_trainer::{train_epoch, EpochOptions, Error, Model, Result, Task, Trainer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

fn train_epochs(backend: &str, epochs: usize) -> Vec<f32> {
    let tasks = TaskGenerator::new(100).generate(16, 8, 8);
    let mut trainer = Trainer::new(&RuntimeConfig::new(backend), GaussianNp::new(1), 0.02).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    (0..epochs)
        .map(|_| {
            let opts = EpochOptions::new().with_batch_size(4).with_rng(&mut rng);
            mean(&trainer.train_epoch(&tasks, opts).unwrap())
        })
        .collect()
}

#[test]
fn loss_decreases_with_imperative_backend() {
    let means = train_epochs("torch", 40);
    assert!(means.iter().all(|m| m.is_finite()));
    let (first, last) = (means[0], means[39]);
    assert!(last < first, "loss did not decrease: {first} -> {last}");
}

#[test]
fn loss_decreases_with_tape_backend() {
    let means = train_epochs("tf", 40);
    let (first, last) = (means[0], means[39]);
    assert!(last < first, "loss did not decrease: {first} -> {last}");
}

#[test]
fn backends_compute_the_same_gradients() {
    // Only Adam's epsilon differs between the two defaults
    let torch = train_epochs("torch", 3);
    let tf = train_epochs("tf", 3);
    for (a, b) in torch.iter().zip(&tf) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-3);
    }
}

#[test]
fn mixed_precision_losses_are_finite() {
    for precision in [Precision::Fp16, Precision::Bf16] {
        let tasks = TaskGenerator::new(3).generate(8, 6, 6);
        let mut trainer =
            Trainer::new(&RuntimeConfig::new("torch"), GaussianNp::new(2), 0.01).unwrap();
        let config = MixedPrecisionConfig::for_precision(precision);
        let mut scaler = GradScaler::from_config(&config);

        for _ in 0..3 {
            let opts = EpochOptions::new()
                .with_batch_size(2)
                .with_scaler(&mut scaler);
            let losses = trainer.train_epoch(&tasks, opts).unwrap();
            assert_eq!(losses.len(), 4);
            assert!(losses.iter().all(|l| l.is_finite()));
        }
        assert_eq!(scaler.overflow_count(), 0);
        if scaler.is_dynamic() {
            assert_eq!(scaler.successful_steps(), 12);
        }
    }
}

#[test]
fn scenario_four_tasks() {
    let tasks = TaskGenerator::new(0).generate(4, 5, 5);
    let model = GaussianNp::new(0);
    let runtime = RuntimeConfig::new("torch");

    let opts = EpochOptions::new().with_batch_size(2);
    let batched = train_epoch(&runtime, &model, &tasks, opts).unwrap();
    assert_eq!(batched.len(), 2);

    let unbatched = train_epoch(&runtime, &model, &tasks, EpochOptions::new()).unwrap();
    assert_eq!(unbatched.len(), 4);
}

#[test]
fn unsupported_backend_fails_everywhere() {
    let runtime = RuntimeConfig::new("paddle");
    let tasks = TaskGenerator::new(0).generate(2, 3, 3);

    let model = GaussianNp::new(0);
    let err = train_epoch(&runtime, &model, &tasks, EpochOptions::new()).unwrap_err();
    assert!(matches!(err, Error::NotImplemented { .. }));

    let err = Trainer::new(&runtime, model, 0.01).err().unwrap();
    assert!(matches!(err, Error::NotImplemented { .. }));

    let mut ctx = DeviceContext::new();
    let err = set_gpu_default_device(&runtime, &FixedDetector(true), &mut ctx).unwrap_err();
    assert!(matches!(err, Error::NotImplemented { .. }));
}

#[test]
fn missing_accelerator_is_a_runtime_failure() {
    let mut ctx = DeviceContext::new();
    let runtime = RuntimeConfig::new("torch");
    let err = set_gpu_default_device(&runtime, &FixedDetector(false), &mut ctx).unwrap_err();
    assert!(matches!(err, Error::NoAccelerator { .. }));
    assert_eq!(ctx, DeviceContext::new());
}

#[test]
fn trainers_for_the_same_model_do_not_share_optimizer_state() {
    let tasks = TaskGenerator::new(8).generate(6, 4, 4);
    let model = GaussianNp::new(8);
    let runtime = RuntimeConfig::new("torch");

    let mut first = Trainer::new(&runtime, model.clone(), 0.01).unwrap();
    let mut second = Trainer::new(&runtime, model, 0.01).unwrap();

    first.train_epoch(&tasks, EpochOptions::new()).unwrap();
    assert_eq!(first.optimizer().step_count(), 6);
    assert_eq!(second.optimizer().step_count(), 0);

    let opts = EpochOptions::new().with_batch_size(3);
    second.train_epoch(&tasks, opts).unwrap();
    assert_eq!(first.optimizer().step_count(), 6);
    assert_eq!(second.optimizer().step_count(), 2);
}

/// Loss length depends on the task, so a batch of two tasks cannot be stacked
struct RaggedLoss;

#[derive(Clone)]
struct Width(usize);

impl Task for Width {
    fn concat(tasks: &[Self]) -> Result<Self> {
        Ok(tasks[0].clone())
    }
}

impl Model for RaggedLoss {
    type Task = Width;

    fn loss_fn(&self, task: &Width, _normalise: bool) -> Result<Tensor> {
        Ok(Tensor::zeros(task.0, false))
    }

    fn parameters(&self) -> Vec<Tensor> {
        Vec::new()
    }
}

#[test]
fn mismatched_loss_shapes_reraise_stack_error() {
    for kind in BackendKind::ALL {
        let backend = Backend::from_kind(kind);
        let mut optimizer: Box<dyn Optimizer> = backend.build_optimizer(&[], 0.01);

        let err = backend
            .step_batch(&RaggedLoss, &[Width(1), Width(2)], optimizer.as_mut(), None)
            .unwrap_err();

        match err {
            Error::Stack { shapes, .. } => assert_eq!(shapes, vec![vec![1], vec![2]]),
            other => panic!("{kind}: expected stack error, got {other:?}"),
        }
    }
}

#[test]
fn merging_tasks_of_different_sizes_aborts_the_epoch() {
    let mut generator = TaskGenerator::new(4);
    let tasks: Vec<RegressionTask> = vec![generator.sample(3, 3), generator.sample(3, 5)];
    let err = train_epoch(
        &RuntimeConfig::new("tf"),
        &GaussianNp::new(0),
        &tasks,
        EpochOptions::new().with_batch_size(2),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}
