use featuregraph::features::{Concat, Input, Magnitude, Scale, Select};
use featuregraph::{Feature, FeatureError, RawInput};

fn input(id: &str, values: Vec<f64>) -> Feature {
    let feature = Feature::with_id(id, Input::new(values.len()), vec![]).unwrap();
    feature.set_input(values).unwrap();
    feature
}

#[test]
fn test_input_starts_at_zero_and_holds_sample() {
    let raw = Feature::with_id("raw", Input::new(3), vec![]).unwrap();
    assert_eq!(raw.output().unwrap().as_slice(), &[0.0, 0.0, 0.0]);

    raw.set_input(vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(raw.output().unwrap().as_slice(), &[1.0, 2.0, 3.0]);
    assert_eq!(
        raw.kind().as_raw_input().unwrap().sample(),
        vec![1.0, 2.0, 3.0]
    );
    assert_eq!(raw.kind_as::<Input>().unwrap().dimension(), 3);
    assert_eq!(raw.description(), vec!["raw", "Input", "3"]);
}

#[test]
fn test_input_takes_no_inputs() {
    let raw = input("raw", vec![1.0]);
    let result = Feature::new(Input::new(1), vec![raw]);
    assert!(matches!(result, Err(FeatureError::Range(_))));
}

#[test]
fn test_scale_multiplies_each_column() {
    let raw = input("raw", vec![1.0, -2.0, 0.25]);
    let scaled = Feature::new(Scale::new(4.0), vec![raw]).unwrap();

    assert_eq!(scaled.num_columns(), 3);
    assert_eq!(scaled.output().unwrap().as_slice(), &[4.0, -8.0, 1.0]);
    assert_eq!(scaled.description()[1..], ["Scale", "raw", "4"]);
}

#[test]
fn test_scale_requires_exactly_one_input() {
    let a = input("a", vec![1.0]);
    let b = input("b", vec![1.0]);

    assert!(Feature::new(Scale::default(), vec![]).is_err());
    assert!(Feature::new(Scale::default(), vec![a, b]).is_err());
}

#[test]
fn test_magnitude_is_euclidean_norm() {
    let raw = input("raw", vec![3.0, 4.0, 12.0]);
    let norm = Feature::new(Magnitude, vec![raw]).unwrap();

    assert_eq!(norm.num_columns(), 1);
    assert_eq!(norm.output().unwrap().as_slice(), &[13.0]);
    assert_eq!(norm.column_descriptions(), vec!["magnitude"]);
}

#[test]
fn test_concat_joins_in_input_order() {
    let a = input("a", vec![1.0, 2.0]);
    let b = input("b", vec![3.0]);
    let joined = Feature::new(Concat, vec![b, a]).unwrap();

    assert_eq!(joined.num_columns(), 3);
    assert_eq!(joined.output().unwrap().as_slice(), &[3.0, 1.0, 2.0]);
    assert!(Feature::new(Concat, vec![]).is_err());
}

#[test]
fn test_select_extracts_sub_range() {
    let raw = input("raw", vec![10.0, 20.0, 30.0, 40.0]);
    let middle = Feature::new(Select::new(1, 2), vec![raw]).unwrap();

    assert_eq!(middle.output().unwrap().as_slice(), &[20.0, 30.0]);
    assert_eq!(middle.column_descriptions(), vec!["Select_1", "Select_2"]);
    assert_eq!(middle.description()[2..], ["raw", "1", "2"]);
}

#[test]
fn test_select_out_of_range_fails_at_construction() {
    let raw = input("raw", vec![1.0, 2.0]);

    for (start, len) in [(1, 2), (2, 1), (usize::MAX, 2)] {
        let result = Feature::new(Select::new(start, len), vec![raw.clone()]);
        assert!(matches!(result, Err(FeatureError::Range(_))), "{start}+{len}");
    }
    assert!(raw.dependents().is_empty());
}

#[test]
fn test_output_column_access() {
    let raw = input("raw", vec![5.0, 6.0]);
    let output = raw.output().unwrap();

    assert_eq!(output.column(1).unwrap(), 6.0);
    assert!(matches!(output.column(2), Err(FeatureError::Range(_))));
    assert!(matches!(output.range(1, 5), Err(FeatureError::Range(_))));
}
