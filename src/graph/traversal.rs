use std::collections::{HashMap, HashSet};

use crate::core::Feature;

/// Every node reachable from `roots` through input edges, each exactly once,
/// inputs before their dependents.
///
/// Roots and inputs are visited in declaration order, so the result is
/// deterministic for a given graph.
pub fn topological_order(roots: &[Feature]) -> Vec<Feature> {
    let mut order = Vec::new();
    let mut visited: HashSet<*const ()> = HashSet::new();

    for root in roots {
        // (node, inputs already pushed)
        let mut stack = vec![(root.clone(), false)];
        while let Some((feature, expanded)) = stack.pop() {
            if expanded {
                order.push(feature);
                continue;
            }
            if !visited.insert(feature.addr()) {
                continue;
            }
            let inputs = feature.inputs();
            stack.push((feature, true));
            for input in inputs.into_iter().rev() {
                if !visited.contains(&input.addr()) {
                    stack.push((input, false));
                }
            }
        }
    }
    order
}

/// Whether `target` is `from` itself or one of its transitive inputs.
pub fn reaches(from: &Feature, target: &Feature) -> bool {
    let mut visited: HashSet<*const ()> = HashSet::new();
    let mut pending = vec![from.clone()];
    while let Some(feature) = pending.pop() {
        if feature.ptr_eq(target) {
            return true;
        }
        if visited.insert(feature.addr()) {
            pending.extend(feature.inputs());
        }
    }
    false
}

/// Warm-up time of every node reachable from `roots`, keyed by node identity.
pub(crate) fn warmup_times(roots: &[Feature]) -> HashMap<*const (), usize> {
    let mut warmups = HashMap::new();
    for feature in topological_order(roots) {
        let inputs_warmup = feature
            .inputs()
            .iter()
            .filter_map(|input| warmups.get(&input.addr()).copied())
            .max()
            .unwrap_or(0);
        warmups.insert(feature.addr(), feature.kind().warmup_time(inputs_warmup));
    }
    warmups
}

/// Nodes reachable from `roots` that have no live dependents.
pub fn sinks(roots: &[Feature]) -> Vec<Feature> {
    topological_order(roots)
        .into_iter()
        .filter(|feature| feature.dependents().is_empty())
        .collect()
}
