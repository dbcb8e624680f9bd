use std::path::PathBuf;

use featuregraph::codec;
use featuregraph::config::RunConfig;
use featuregraph::{graph, Registry};

fn demo_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

#[test]
fn test_demo_run_config_end_to_end() {
    let config = RunConfig::load(demo_dir().join("run.json")).unwrap();
    let loaded = codec::load_graph(&config.graph, &Registry::with_builtins()).unwrap();
    assert_eq!(loaded.len(), 5);

    for (id, values) in &config.inputs {
        loaded.get(id).unwrap().set_input(values.clone()).unwrap();
    }

    let all = loaded.get("all").unwrap();
    // scaled = [3, 4, -2], norm of its first two columns = 5
    assert_eq!(all.output().unwrap().as_slice(), &[3.0, 4.0, -2.0, 5.0]);
    assert_eq!(all.find_input_feature().unwrap().id(), "raw");
    assert_eq!(loaded.sinks().len(), 1);

    let snapshot = graph::snapshot(&[all.clone()]);
    assert!(snapshot.features.iter().all(|f| !f.dirty));

    // Re-encoding the loaded graph reproduces the file.
    let text = std::fs::read_to_string(&config.graph).unwrap();
    assert_eq!(codec::encode_graph(&[all.clone()]).unwrap(), text);
}
