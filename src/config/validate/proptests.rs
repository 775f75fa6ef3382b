//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_spec;
use crate::config::{DataParams, RuntimeConfig, TrainSpec, TrainingParams};
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = TrainSpec> {
    (
        prop_oneof![Just("torch"), Just("tf")],
        1e-6f32..1.0,                         // lr
        proptest::option::of(1usize..64),     // batch_size
        1usize..100,                          // epochs
        1usize..256,                          // num_tasks
        1usize..50,                           // num_target
    )
        .prop_map(|(backend, lr, batch_size, epochs, num_tasks, num_target)| TrainSpec {
            runtime: RuntimeConfig::new(backend),
            training: TrainingParams {
                lr,
                batch_size,
                epochs,
                ..Default::default()
            },
            data: DataParams {
                num_tasks,
                num_target,
                ..Default::default()
            },
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn prop_zero_batch_size_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.training.batch_size = Some(0);
        prop_assert_eq!(
            validate_spec(&spec),
            Err(ValidationError::InvalidBatchSize(0))
        );
    }

    #[test]
    fn prop_non_positive_lr_fails(spec in arb_valid_spec(), lr in -1.0f32..=0.0) {
        let mut spec = spec;
        spec.training.lr = lr;
        prop_assert!(matches!(
            validate_spec(&spec),
            Err(ValidationError::InvalidLearningRate(_))
        ));
    }

    #[test]
    fn prop_unknown_backend_fails(spec in arb_valid_spec(), name in "[a-z]{3,8}") {
        prop_assume!(name != "torch" && name != "tf");
        let mut spec = spec;
        spec.runtime.backend = name.clone();
        prop_assert_eq!(
            validate_spec(&spec),
            Err(ValidationError::UnknownBackend(name))
        );
    }
}
