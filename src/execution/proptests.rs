//! Property-based tests for normalization and device validation

use super::*;
use proptest::prelude::*;

fn arb_device() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("cpu".to_string()),
        Just("cuda".to_string()),
        (0usize..16).prop_map(|index| format!("cuda:{index}")),
        Just("cuda:-1".to_string()),
        "[a-z]{1,6}",
    ]
}

fn arb_raw_arguments() -> impl Strategy<Value = RawArguments> {
    (
        "/[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        proptest::option::of("/[a-z]{1,8}"),
        proptest::option::of("/[a-z]{1,8}"),
        proptest::option::of(proptest::collection::vec(arb_device(), 0..5)),
        any::<bool>(),
    )
        .prop_map(|(base, experiments, data, devices, with_device)| {
            let mut raw = RawArguments::new();
            raw.insert_text(BASE_PATH, base);
            raw.insert(EXPERIMENTS_PATH, experiments);
            raw.insert(DATA_PATH, data);
            raw.insert_text(EXPERIMENT_NAME, "baseline");
            if with_device {
                raw.insert(DEVICE, devices);
            }
            raw
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_normalize_is_idempotent(raw in arb_raw_arguments(), gpus in 0usize..4) {
        let accelerators = FixedAccelerators::new(gpus);
        let mut once = raw;
        normalize(&mut once, &accelerators).unwrap();
        let mut twice = once.clone();
        normalize(&mut twice, &accelerators).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_normalize_fills_paths(raw in arb_raw_arguments(), gpus in 0usize..4) {
        let base = raw.text(BASE_PATH).unwrap().to_string();
        let expected_experiments = raw
            .text(EXPERIMENTS_PATH)
            .map(str::to_string)
            .unwrap_or_else(|| std::path::Path::new(&base).join("experiments").display().to_string());
        let expected_data = raw
            .text(DATA_PATH)
            .map(str::to_string)
            .unwrap_or_else(|| std::path::Path::new(&base).join("data").display().to_string());

        let mut args = raw;
        normalize(&mut args, &FixedAccelerators::new(gpus)).unwrap();
        prop_assert_eq!(args.text(EXPERIMENTS_PATH), Some(expected_experiments.as_str()));
        prop_assert_eq!(args.text(DATA_PATH), Some(expected_data.as_str()));
    }

    #[test]
    fn prop_normalized_devices_are_sorted(raw in arb_raw_arguments(), gpus in 0usize..4) {
        let had_device = raw.contains_key(DEVICE);
        let mut args = raw;
        normalize(&mut args, &FixedAccelerators::new(gpus)).unwrap();
        prop_assert_eq!(args.contains_key(DEVICE), had_device);
        if let Some(devices) = args.list(DEVICE) {
            prop_assert!(devices.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn prop_validated_devices_match_pattern(
        devices in proptest::collection::vec(arb_device(), 1..5),
        gpus in 0usize..8,
    ) {
        let mut devices = devices;
        devices.sort();
        if let Ok(specs) = validate_devices(&devices, &FixedAccelerators::new(gpus)) {
            prop_assert_eq!(specs.len(), devices.len());
            for (spec, raw) in specs.iter().zip(&devices) {
                prop_assert_eq!(&spec.to_string(), raw);
            }
            let cpu_count = specs.iter().filter(|spec| spec.is_cpu()).count();
            prop_assert!(cpu_count == 0 || specs.len() == 1);
            prop_assert!(cpu_count == 1 || specs.len() <= gpus);
        }
    }
}
