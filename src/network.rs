/*!
# Networks

A [`Network`] is the shared input of all covering algorithms: a connected, undirected,
unweighted graph together with a lazily computed [`DistanceOracle`].

Networks are created once per instance and then reused for every algorithm and box size.
The graph never changes after construction, so a computed distance matrix stays valid
until it is dropped explicitly, e.g. to free memory before running an algorithm that does
not need it.

# Example

```rust
use ucover::prelude::*;

let graph = CsrGraph::from_edges(5, [(0, 1), (1, 2), (3, 4)]);

// The source is disconnected, so only the component {0, 1, 2} is kept
let mut network = Network::from_largest_component("example", &graph).unwrap();
assert_eq!(network.number_of_nodes(), 3);
assert_eq!(network.diameter().unwrap(), 2);

network.ensure_distances().unwrap();
assert!(network.has_distances());
network.drop_distances();
assert!(!network.has_distances());
```
*/

use log::info;

use crate::{
    algo::*,
    error::{CoverError, Result},
    prelude::*,
};

/// A connected, undirected network with a droppable all-pairs distance cache
#[derive(Clone, Debug)]
pub struct Network {
    name: String,
    graph: CsrGraph,
    original_ids: Vec<Node>,
    distances: DistanceOracle,
}

impl Network {
    /// Creates a network from a connected graph.
    ///
    /// # Errors
    /// Fails with [`CoverError::InvalidNetwork`] if the graph is empty or disconnected.
    pub fn new<S>(name: S, graph: CsrGraph) -> Result<Self>
    where
        S: Into<String>,
    {
        let name = name.into();
        if graph.is_empty() {
            return Err(CoverError::InvalidNetwork(format!("network {name} has no nodes")));
        }
        if !graph.is_connected() {
            return Err(CoverError::InvalidNetwork(format!(
                "network {name} is disconnected; extract its largest component first"
            )));
        }

        let original_ids = graph.vertices().collect();
        Ok(Self {
            name,
            graph,
            original_ids,
            distances: DistanceOracle::new(),
        })
    }

    /// Creates a network from the largest connected component of an arbitrary graph.
    /// Nodes are relabelled to `0..n'`; [`Network::original_id`] maps them back.
    ///
    /// # Errors
    /// Fails with [`CoverError::InvalidNetwork`] if the graph is empty.
    pub fn from_largest_component<S, G>(name: S, graph: &G) -> Result<Self>
    where
        S: Into<String>,
        G: AdjacencyList,
    {
        let name = name.into();
        if graph.is_empty() {
            return Err(CoverError::InvalidNetwork(format!("network {name} has no nodes")));
        }

        let component = graph.largest_connected_component();
        if component.len() < graph.len() {
            info!(
                "Network {name}: keeping largest component with {} of {} nodes",
                component.len(),
                graph.len()
            );
        }

        let (graph, original_ids) = graph.vertex_induced_as::<CsrGraph>(&component);
        Ok(Self {
            name,
            graph,
            original_ids,
            distances: DistanceOracle::new(),
        })
    }

    /// Returns the name of the network (used to name log files)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the underlying graph
    pub fn graph(&self) -> &CsrGraph {
        &self.graph
    }

    /// Returns the id `u` had in the graph the network was created from
    pub fn original_id(&self, u: Node) -> Node {
        self.original_ids[u as usize]
    }

    /// Limits the number of bytes the distance matrix may occupy
    pub fn set_memory_limit(&mut self, bytes: Option<usize>) {
        self.distances.set_memory_limit(bytes);
    }

    /// Computes the distance matrix unless it is already held
    pub fn ensure_distances(&mut self) -> Result<&DistanceMatrix> {
        self.distances.ensure_computed(&self.graph)
    }

    /// Releases the distance matrix
    pub fn drop_distances(&mut self) {
        self.distances.drop();
    }

    /// Returns *true* if the distance matrix is currently held
    pub fn has_distances(&self) -> bool {
        self.distances.is_computed()
    }

    /// Returns the distance matrix.
    ///
    /// # Errors
    /// Fails with [`CoverError::DistancesNotComputed`] if the matrix is not held.
    pub fn distances(&self) -> Result<&DistanceMatrix> {
        self.distances
            .get()
            .ok_or_else(|| CoverError::DistancesNotComputed(self.name.clone()))
    }

    /// Returns the diameter; computed lazily and remembered afterwards
    pub fn diameter(&mut self) -> Result<Distance> {
        self.distances.diameter(&self.graph)
    }

    /// Returns all nodes within distance `radius` of `center`.
    /// Uses the distance matrix if held and a truncated BFS otherwise.
    pub fn ball(&self, center: Node, radius: Distance) -> Vec<Node> {
        match self.distances.get() {
            Some(matrix) => matrix.ball(center, radius).collect(),
            None => self.graph.ball(center, radius as Depth),
        }
    }
}

impl GraphNodeOrder for Network {
    fn number_of_nodes(&self) -> NumNodes {
        self.graph.number_of_nodes()
    }
}

impl GraphEdgeOrder for Network {
    fn number_of_edges(&self) -> NumEdges {
        self.graph.number_of_edges()
    }
}

impl AdjacencyList for Network {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.graph.neighbors_of(u)
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.graph.degree_of(u)
    }
}
