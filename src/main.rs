use std::env;

use anyhow::{anyhow, bail, Context, Result};
use log::info;

use featuregraph::codec;
use featuregraph::config::RunConfig;
use featuregraph::graph;
use featuregraph::registry;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: featuregraph <run-config.json> | --types"))?;

    if arg == "--types" {
        for type_tag in registry::global().registered_types() {
            println!("{type_tag}");
        }
        return Ok(());
    }

    let config = RunConfig::load(&arg)?;
    let loaded = codec::load_graph(&config.graph, registry::global())
        .context(format!("Failed to load graph {:?}", config.graph))?;
    info!("loaded {} features from {:?}", loaded.len(), config.graph);

    for (id, values) in &config.inputs {
        let feature = loaded
            .get(id)
            .ok_or_else(|| anyhow!("config sets input '{id}', which is not in the graph"))?;
        feature
            .set_input(values.clone())
            .context(format!("Failed to set input '{id}'"))?;
    }

    let roots = if config.roots.is_empty() {
        loaded.sinks()
    } else {
        config
            .roots
            .iter()
            .map(|id| {
                loaded
                    .get(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("root '{id}' is not in the graph"))
            })
            .collect::<Result<Vec<_>>>()?
    };
    if roots.is_empty() {
        bail!("graph {:?} has no features", config.graph);
    }

    for root in &roots {
        let output = root
            .output()
            .context(format!("Failed to evaluate '{}'", root.id()))?;
        let columns = root.column_descriptions();
        println!("{} ({}), warm-up {}", root.id(), root.type_tag(), root.warmup_time());
        for (label, value) in columns.iter().zip(output.iter()) {
            println!("  {label} = {value}");
        }
    }

    if config.dump {
        println!("{}", graph::snapshot(&roots).to_json_pretty()?);
    }

    Ok(())
}
