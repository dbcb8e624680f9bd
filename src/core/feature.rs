use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, trace};

use super::FeatureOutput;
use crate::error::{FeatureError, Result};
use crate::graph;

/// Process-wide instance counter used for automatic `f_<n>` ids.
static INSTANCE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Type-specific behaviour of a feature node.
///
/// The base contract (identity, edges, caching, invalidation) lives in
/// [`Feature`]; a kind only describes how its output is shaped and computed.
pub trait FeatureKind: Any {
    /// Tag written to description records and looked up in the registry.
    fn type_tag(&self) -> &str;

    /// Output width given the widths of the inputs, in input order.
    ///
    /// Called once at construction; rejecting unsupported input shapes here
    /// keeps the failure at the point the graph is built.
    fn num_columns(&self, input_columns: &[usize]) -> Result<usize>;

    /// Computes the output from the current outputs of the inputs.
    ///
    /// Must depend only on the kind's configuration and `inputs`: the result
    /// is cached until the next dirty transition.
    fn compute_output(&self, inputs: &[FeatureOutput]) -> Result<Vec<f64>>;

    /// Warm-up of this node given the max warm-up over its direct inputs.
    fn warmup_time(&self, inputs_warmup: usize) -> usize {
        inputs_warmup
    }

    /// Appends the type-specific suffix of the description record.
    fn add_to_description(&self, _description: &mut Vec<String>) {}

    fn column_description(&self, index: usize) -> String {
        format!("{}_{}", self.type_tag(), index)
    }

    /// Raw-input capability, searched for by [`Feature::find_input_feature`].
    fn as_raw_input(&self) -> Option<&dyn RawInput> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// A leaf that receives samples from outside the graph.
pub trait RawInput {
    /// Replaces the current sample. The length has already been checked
    /// against the node's column count.
    fn set_sample(&self, values: Vec<f64>);

    fn sample(&self) -> Vec<f64>;
}

struct Node {
    id: String,
    kind: Box<dyn FeatureKind>,
    num_columns: usize,
    inputs: RefCell<Vec<Feature>>,
    // Back-references only; never keep a dependent alive.
    dependents: RefCell<Vec<Weak<Node>>>,
    dirty: Cell<bool>,
    cache: RefCell<Option<FeatureOutput>>,
}

impl Drop for Node {
    // Unlinks sole-owned ancestors one at a time; the default drop would
    // recurse once per level of a chain.
    fn drop(&mut self) {
        let mut pending = std::mem::take(self.inputs.get_mut());
        while let Some(feature) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(feature.0) {
                pending.append(node.inputs.get_mut());
            }
        }
    }
}

/// Shared handle to a node of the feature graph.
///
/// Cloning the handle shares the node. A node owns its inputs; dependents are
/// held weakly, so dropping the last handle to a root frees everything only
/// that root reached.
///
/// The graph is single-threaded: all mutation, invalidation and evaluation
/// on related nodes must happen on one thread.
#[derive(Clone)]
pub struct Feature(Rc<Node>);

impl Feature {
    /// Creates a node with an automatic `f_<n>` id.
    pub fn new<K: FeatureKind>(kind: K, inputs: Vec<Feature>) -> Result<Self> {
        let instance = INSTANCE_COUNT.fetch_add(1, Ordering::Relaxed);
        Self::build(format!("f_{instance}"), Box::new(kind), inputs)
    }

    /// Creates a node with an explicit id. Still advances the instance counter.
    pub fn with_id<K: FeatureKind>(
        id: impl Into<String>,
        kind: K,
        inputs: Vec<Feature>,
    ) -> Result<Self> {
        INSTANCE_COUNT.fetch_add(1, Ordering::Relaxed);
        let id = id.into();
        if id.is_empty() || id.trim() != id || id.contains(['\t', '\n', '\r']) {
            return Err(FeatureError::range(format!(
                "invalid feature id {id:?}: must be non-empty, unpadded, without tabs or line breaks"
            )));
        }
        Self::build(id, Box::new(kind), inputs)
    }

    fn build(id: String, kind: Box<dyn FeatureKind>, inputs: Vec<Feature>) -> Result<Self> {
        let input_columns: Vec<usize> = inputs.iter().map(Feature::num_columns).collect();
        let num_columns = kind.num_columns(&input_columns)?;
        if num_columns == 0 {
            return Err(FeatureError::range(format!(
                "feature '{id}' ({}) would have no output columns",
                kind.type_tag()
            )));
        }

        let node = Rc::new(Node {
            id,
            kind,
            num_columns,
            inputs: RefCell::new(inputs),
            dependents: RefCell::new(Vec::new()),
            dirty: Cell::new(true),
            cache: RefCell::new(None),
        });
        for input in node.inputs.borrow().iter() {
            let mut dependents = input.0.dependents.borrow_mut();
            dependents.retain(|dependent| dependent.strong_count() > 0);
            dependents.push(Rc::downgrade(&node));
        }

        trace!(
            "created feature {} ({}) with {} columns",
            node.id,
            node.kind.type_tag(),
            num_columns
        );
        Ok(Feature(node))
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn type_tag(&self) -> &str {
        self.0.kind.type_tag()
    }

    pub fn kind(&self) -> &dyn FeatureKind {
        self.0.kind.as_ref()
    }

    /// Downcasts the kind to a concrete type.
    pub fn kind_as<K: FeatureKind>(&self) -> Option<&K> {
        self.0.kind.as_any().downcast_ref::<K>()
    }

    pub fn num_columns(&self) -> usize {
        self.0.num_columns
    }

    pub fn inputs(&self) -> Vec<Feature> {
        self.0.inputs.borrow().clone()
    }

    /// Dependents that are still alive.
    pub fn dependents(&self) -> Vec<Feature> {
        self.0
            .dependents
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(Feature)
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.0.dirty.get()
    }

    pub fn has_output(&self) -> bool {
        self.cached_output().is_some()
    }

    /// The cached output if it is valid. Never computes.
    pub fn cached_output(&self) -> Option<FeatureOutput> {
        if self.0.dirty.get() {
            return None;
        }
        self.0.cache.borrow().clone()
    }

    /// Returns the output, recomputing this node and any dirty ancestors first.
    ///
    /// Only the recomputed nodes become clean; dependents keep their state.
    /// Ancestors are visited with an explicit stack, so deep chains do not
    /// grow the call stack.
    pub fn output(&self) -> Result<FeatureOutput> {
        if let Some(output) = self.cached_output() {
            return Ok(output);
        }

        // (node, inputs already scheduled)
        let mut stack = vec![(self.clone(), false)];
        while let Some((feature, inputs_ready)) = stack.pop() {
            if !feature.needs_compute() {
                continue;
            }
            if inputs_ready {
                feature.recompute()?;
                continue;
            }
            stack.push((feature.clone(), true));
            for input in feature.0.inputs.borrow().iter().rev() {
                if input.needs_compute() {
                    stack.push((input.clone(), false));
                }
            }
        }

        self.cached_output().ok_or_else(|| {
            FeatureError::range(format!("feature '{}' produced no output", self.id()))
        })
    }

    fn needs_compute(&self) -> bool {
        self.0.dirty.get() || self.0.cache.borrow().is_none()
    }

    fn recompute(&self) -> Result<()> {
        let inputs = self
            .0
            .inputs
            .borrow()
            .iter()
            .map(|input| {
                input.cached_output().ok_or_else(|| {
                    FeatureError::range(format!(
                        "input '{}' of feature '{}' has no output",
                        input.id(),
                        self.id()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let values = self.0.kind.compute_output(&inputs)?;
        if values.len() != self.0.num_columns {
            return Err(FeatureError::range(format!(
                "feature '{}' ({}) computed {} values, expected {}",
                self.id(),
                self.type_tag(),
                values.len(),
                self.0.num_columns
            )));
        }

        trace!("recomputed feature {}", self.id());
        *self.0.cache.borrow_mut() = Some(FeatureOutput::new(values));
        // Not set_dirty_flag: only this node becomes clean.
        self.0.dirty.set(false);
        Ok(())
    }

    /// Marks this node and everything downstream of it dirty.
    pub fn reset(&self) {
        debug!("reset feature {}", self.id());
        self.set_dirty_flag(true);
    }

    /// `true` marks this node and all current dependents dirty, transitively.
    /// `false` marks only this node clean and does not touch dependents; a
    /// clean node keeps serving its existing cache, so this is meant for
    /// internal bookkeeping rather than for "cleaning" a subtree.
    pub fn set_dirty_flag(&self, dirty: bool) {
        if !dirty {
            self.0.dirty.set(false);
            return;
        }

        let mut visited: HashSet<*const Node> = HashSet::new();
        let mut pending = vec![Rc::clone(&self.0)];
        while let Some(node) = pending.pop() {
            if !visited.insert(Rc::as_ptr(&node)) {
                continue;
            }
            node.dirty.set(true);
            let mut dependents = node.dependents.borrow_mut();
            dependents.retain(|dependent| dependent.strong_count() > 0);
            pending.extend(dependents.iter().filter_map(Weak::upgrade));
        }
        trace!(
            "invalidated {} feature(s) from {}",
            visited.len(),
            self.id()
        );
    }

    /// Appends `input` to the inputs and registers `self` as its dependent.
    ///
    /// Fails without mutating anything if `self` is already reachable from
    /// `input`, or if the kind does not accept the extended input list with
    /// an unchanged column count. Does not recompute or invalidate.
    pub fn add_input_feature(&self, input: &Feature) -> Result<()> {
        if graph::reaches(input, self) {
            debug!(
                "rejected edge {} -> {}: would create a cycle",
                input.id(),
                self.id()
            );
            return Err(FeatureError::Cycle {
                from: input.id().to_string(),
                to: self.id().to_string(),
            });
        }

        let mut input_columns: Vec<usize> =
            self.0.inputs.borrow().iter().map(Feature::num_columns).collect();
        input_columns.push(input.num_columns());
        let num_columns = self.0.kind.num_columns(&input_columns).map_err(|err| {
            FeatureError::range(format!(
                "feature '{}' ({}) cannot take input '{}': {}",
                self.id(),
                self.type_tag(),
                input.id(),
                err
            ))
        })?;
        if num_columns != self.0.num_columns {
            return Err(FeatureError::range(format!(
                "input '{}' would change feature '{}' from {} to {} columns",
                input.id(),
                self.id(),
                self.0.num_columns,
                num_columns
            )));
        }

        self.0.inputs.borrow_mut().push(input.clone());
        input.add_dependent(self);
        Ok(())
    }

    /// Registers a back-reference from `self` to `dependent`.
    ///
    /// A dependent added after `self` was marked dirty is not marked
    /// retroactively; it is only reached by later invalidations.
    pub fn add_dependent(&self, dependent: &Feature) {
        let mut dependents = self.0.dependents.borrow_mut();
        dependents.retain(|d| d.strong_count() > 0);
        let target = Rc::as_ptr(&dependent.0);
        if !dependents.iter().any(|d| d.as_ptr() == target) {
            dependents.push(Rc::downgrade(&dependent.0));
        }
    }

    /// Max warm-up over the direct inputs, adjusted by the kind.
    /// A leaf reports its kind's intrinsic warm-up (0 unless overridden).
    pub fn warmup_time(&self) -> usize {
        let warmups = graph::warmup_times(std::slice::from_ref(self));
        warmups.get(&self.addr()).copied().unwrap_or(0)
    }

    /// `[id, typeTag, inputId_0, ..., inputId_k-1, <type-specific fields>]`
    pub fn description(&self) -> Vec<String> {
        let inputs = self.0.inputs.borrow();
        let mut description = Vec::with_capacity(inputs.len() + 2);
        description.push(self.id().to_string());
        description.push(self.type_tag().to_string());
        description.extend(inputs.iter().map(|input| input.id().to_string()));
        self.0.kind.add_to_description(&mut description);
        description
    }

    pub fn column_descriptions(&self) -> Vec<String> {
        (0..self.0.num_columns)
            .map(|index| self.0.kind.column_description(index))
            .collect()
    }

    /// Nearest raw-input ancestor along the leftmost path.
    ///
    /// Only the first input of each node is followed: a raw input reachable
    /// only through a second or later input is not found.
    pub fn find_input_feature(&self) -> Option<Feature> {
        let mut current = self.clone();
        loop {
            let first = current.0.inputs.borrow().first().cloned()?;
            if first.kind().as_raw_input().is_some() {
                return Some(first);
            }
            current = first;
        }
    }

    /// Replaces the sample of a raw-input node and invalidates downstream.
    pub fn set_input(&self, values: Vec<f64>) -> Result<()> {
        let raw = self.0.kind.as_raw_input().ok_or_else(|| {
            FeatureError::range(format!(
                "feature '{}' ({}) is not an input",
                self.id(),
                self.type_tag()
            ))
        })?;
        if values.len() != self.0.num_columns {
            return Err(FeatureError::range(format!(
                "input '{}' expects {} values, got {}",
                self.id(),
                self.0.num_columns,
                values.len()
            )));
        }

        raw.set_sample(values);
        self.reset();
        Ok(())
    }

    pub fn ptr_eq(&self, other: &Feature) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity key, valid while the node is alive.
    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("id", &self.0.id)
            .field("type_tag", &self.type_tag())
            .field("num_columns", &self.0.num_columns)
            .field("dirty", &self.0.dirty.get())
            .finish()
    }
}
