//! Tab-separated description records, one node per line.
//!
//! ```text
//! <id>\t<typeTag>\t<inputId_0>\t...\t<inputId_k-1>\t<type-specific field>...\n
//! ```
//!
//! A stream is read top to bottom and may only reference ids defined on
//! earlier lines.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::core::{Feature, FeatureMap};
use crate::error::{FeatureError, Result};
use crate::graph::{sinks, topological_order};
use crate::registry::Registry;

pub const FIELD_SEPARATOR: char = '\t';

/// One record, without the line terminator.
///
/// Fails with a Range error if a token would not survive decoding: any
/// token holding a separator or line break, or a type tag that is empty or
/// padded.
pub fn encode_record(feature: &Feature) -> Result<String> {
    let description = feature.description();
    for (position, token) in description.iter().enumerate() {
        if token.contains([FIELD_SEPARATOR, '\n', '\r']) {
            return Err(FeatureError::range(format!(
                "feature '{}' ({}): token {position} {token:?} contains a separator or line break",
                feature.id(),
                feature.type_tag()
            )));
        }
    }
    let type_tag = feature.type_tag();
    if type_tag.is_empty() || type_tag.chars().any(char::is_whitespace) {
        return Err(FeatureError::range(format!(
            "feature '{}' has unencodable type tag {type_tag:?}",
            feature.id()
        )));
    }
    Ok(description.join("\t"))
}

/// Writes one record followed by a line break.
pub fn write_record<W: Write>(feature: &Feature, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", encode_record(feature)?)?;
    Ok(())
}

/// Writes every node reachable from `roots` once, inputs first.
/// Returns the number of records written. Nothing is written if any record
/// fails to encode.
pub fn write_graph<W: Write>(roots: &[Feature], writer: &mut W) -> Result<usize> {
    let records = topological_order(roots)
        .iter()
        .map(encode_record)
        .collect::<Result<Vec<_>>>()?;
    for record in &records {
        writeln!(writer, "{}", record)?;
    }
    Ok(records.len())
}

pub fn encode_graph(roots: &[Feature]) -> Result<String> {
    topological_order(roots)
        .iter()
        .map(|feature| encode_record(feature).map(|record| record + "\n"))
        .collect()
}

pub fn save_graph(path: impl AsRef<Path>, roots: &[Feature]) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_graph(roots, &mut writer)?;
    writer.flush()?;
    Ok(written)
}

/// Splits a line into tokens. A trailing carriage return is dropped.
pub fn parse_record(line: &str) -> Vec<String> {
    line.strip_suffix('\r')
        .unwrap_or(line)
        .split(FIELD_SEPARATOR)
        .map(str::to_string)
        .collect()
}

/// Nodes decoded from a record stream.
#[derive(Debug, Default)]
pub struct LoadedGraph {
    features: Vec<Feature>,
    by_id: FeatureMap,
}

impl LoadedGraph {
    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.by_id.get(id)
    }

    /// Nodes in the order their records appeared.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Nodes no other node reads from.
    pub fn sinks(&self) -> Vec<Feature> {
        sinks(&self.features)
    }

    pub fn into_map(self) -> FeatureMap {
        self.by_id
    }
}

/// Decodes a record stream, stopping at the first record that fails.
///
/// The error carries the 1-based line number and the record's id. Blank
/// lines are skipped.
pub fn read_graph<R: BufRead>(reader: R, registry: &Registry) -> Result<LoadedGraph> {
    let mut graph = LoadedGraph::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let tokens = parse_record(&line);
        let id = tokens[0].trim().to_string();

        let decoded = if graph.by_id.contains_key(&id) {
            Err(FeatureError::range(format!("duplicate feature id '{id}'")))
        } else {
            registry.from_description(&tokens, &graph.by_id)
        };
        let feature = decoded.map_err(|source| FeatureError::Decode {
            line: line_number,
            id: id.clone(),
            source: Box::new(source),
        })?;

        debug!(
            "decoded feature {} ({}) from line {}",
            feature.id(),
            feature.type_tag(),
            line_number
        );
        graph.by_id.insert(feature.id().to_string(), feature.clone());
        graph.features.push(feature);
    }

    Ok(graph)
}

pub fn read_graph_str(text: &str, registry: &Registry) -> Result<LoadedGraph> {
    read_graph(text.as_bytes(), registry)
}

pub fn load_graph(path: impl AsRef<Path>, registry: &Registry) -> Result<LoadedGraph> {
    read_graph(BufReader::new(File::open(path)?), registry)
}
