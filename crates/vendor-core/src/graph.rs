//! Dependency graph of internal mappings and cycle detection.
//!
//! Every internal mapping adds an edge from its source file to its
//! destination file, positions stripped. A cycle means some file would
//! eventually be overwritten by content derived from itself, so validation
//! rejects it. An edge from a file to itself (two regions of one file) is
//! not a cycle.
//!
//! # Example
//!
//! ```
//! use vendor_core::graph::MappingGraph;
//!
//! let mut graph = MappingGraph::new();
//! graph.add_edge("lib/a.go", "pkg/a.go");
//! graph.add_edge("pkg/a.go", "lib/a.go");
//!
//! let cycle = graph.find_cycle().unwrap();
//! assert_eq!(cycle, vec!["lib/a.go", "pkg/a.go", "lib/a.go"]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use vendor_fs::NormalizedPath;

use crate::config::VendorConfig;
use crate::{Error, Result};

/// DFS visitation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the current DFS stack
    Gray,
    /// Fully explored
    Black,
}

/// Directed file-level graph of internal mappings.
///
/// Ordered collections keep traversal, and therefore the reported cycle,
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct MappingGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl MappingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from every internal vendor in `config`.
    ///
    /// External vendors are ignored. Fails if a mapping address does not
    /// parse.
    pub fn from_config(config: &VendorConfig) -> Result<Self> {
        let mut graph = Self::new();
        for vendor in config.vendors.iter().filter(|v| v.is_internal()) {
            for (_, mapping) in vendor.mappings() {
                let from = mapping.from_spec()?;
                let to = mapping.to_spec()?;
                graph.add_edge(&from.path, &to.path);
            }
        }
        Ok(graph)
    }

    /// Add an edge between two files. Self-edges are dropped.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = NormalizedPath::new(from).as_str().to_string();
        let to = NormalizedPath::new(to).as_str().to_string();
        if from == to {
            return;
        }
        self.edges.entry(to.clone()).or_default();
        self.edges.entry(from).or_default().insert(to);
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Find a cycle, returned as the chain of files starting and ending at
    /// the same node.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut colors: HashMap<&str, Color> = HashMap::new();
        let mut stack: Vec<&str> = Vec::new();

        for node in self.edges.keys() {
            if !colors.contains_key(node.as_str())
                && let Some(cycle) = self.visit(node, &mut colors, &mut stack)
            {
                return Some(cycle);
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        colors: &mut HashMap<&'a str, Color>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        colors.insert(node, Color::Gray);
        stack.push(node);

        if let Some(targets) = self.edges.get(node) {
            for next in targets {
                match colors.get(next.as_str()) {
                    Some(Color::Gray) => {
                        let begin = stack.iter().position(|n| *n == next.as_str())?;
                        let mut chain: Vec<String> =
                            stack[begin..].iter().map(|n| n.to_string()).collect();
                        chain.push(next.clone());
                        return Some(chain);
                    }
                    Some(Color::Black) => {}
                    None => {
                        if let Some(cycle) = self.visit(next, colors, stack) {
                            return Some(cycle);
                        }
                    }
                }
            }
        }

        stack.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Fail with [`Error::CircularDependency`] if the graph has a cycle.
    pub fn ensure_acyclic(&self) -> Result<()> {
        match self.find_cycle() {
            Some(chain) => Err(Error::CircularDependency { chain }),
            None => Ok(()),
        }
    }
}
