/*!
# Box Partitions

A box covering is a partition of the nodes into disjoint **boxes**. The [`Partition`] struct
allows:
- Creating boxes and moving nodes between them while a covering is built
- Querying box membership and sizes
- Remembering a designated centre per box (radius-bound coverings)
- Validating a finished covering against its distance bound

Helper traits like [`IntoPartition`] simplify construction from collections of node lists.

# Example

```rust
use ucover::covering::Partition;

let mut part = Partition::new(5);

let b0 = part.add_box([0, 1]);
let b1 = part.add_box([2, 3]);
part.move_node(4, b0);

assert_eq!(part.number_of_boxes(), 2);
assert_eq!(part.number_in_box(b0), 3);
assert_eq!(part.box_of_node(4), Some(b0));
assert!(part.is_complete());
```
*/

use std::{iter::Enumerate, slice::Iter};

use itertools::Itertools;

use super::*;

/// Identifier of a box; boxes are numbered `0..k`
pub type BoxId = NumNodes;

/// Represents a **partition** of the node set into disjoint boxes.
///
/// While a covering is built, nodes may remain **unassigned**; a finished covering assigns
/// every node (see [`Partition::is_complete`]). Box ids of boxes that became empty stay
/// reserved until [`Partition::compact`] is called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    boxes: Vec<Option<OptionalNode>>,
    box_sizes: Vec<NumNodes>,
    unassigned: NumNodes,
    centres: Option<Vec<Node>>,
}

/// Iterator over the members of a single box.
///
/// Returned by [`Partition::members_of_box`].
pub struct BoxMemberIter<'a> {
    boxes: Enumerate<Iter<'a, Option<OptionalNode>>>,
    box_id: Option<OptionalNode>,
}

impl Iterator for BoxMemberIter<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.boxes
            .find(|(_, b)| **b == self.box_id)
            .map(|(u, _)| u as Node)
    }
}

impl Partition {
    /// Creates a new partition over `nodes` nodes, all initially unassigned.
    pub fn new(nodes: NumNodes) -> Self {
        Self {
            boxes: vec![None; nodes as usize],
            box_sizes: vec![],
            unassigned: nodes,
            centres: None,
        }
    }

    /// Creates a complete partition from an assignment vector where `assignment[u]` is the
    /// box of `u`. Box ids need not be dense; they are compacted in order of first use.
    pub fn from_assignment(assignment: &[BoxId]) -> Self {
        let mut remap = fxhash::FxHashMap::default();
        let mut part = Self::new(assignment.len() as NumNodes);
        for (u, &b) in assignment.iter().enumerate() {
            let next_id = remap.len() as BoxId;
            let id = *remap.entry(b).or_insert(next_id);
            if id as usize == part.box_sizes.len() {
                part.box_sizes.push(0);
            }
            part.move_node(u as Node, id);
        }
        part
    }

    /// Creates a new box and assigns the given nodes to it.
    /// Returns the new box identifier.
    ///
    /// # Panics
    /// If any provided node was already assigned to another box.
    pub fn add_box<I>(&mut self, nodes: I) -> BoxId
    where
        I: IntoIterator<Item = Node>,
    {
        let raw_box_id = self.box_sizes.len();
        let box_id = OptionalNode::new(raw_box_id as Node);
        self.box_sizes.push(0);

        let size = &mut self.box_sizes[raw_box_id];
        for u in nodes {
            assert_eq!(self.boxes[u as usize], None); // check that node is unassigned
            self.boxes[u as usize] = box_id;
            *size += 1;
        }

        self.unassigned -= *size;
        if let Some(centres) = self.centres.as_mut() {
            centres.push(INVALID_NODE);
        }

        raw_box_id as BoxId
    }

    /// Creates a new box around a designated centre. The centre itself is assigned to the
    /// box if it is contained in `nodes`.
    ///
    /// # Panics
    /// If any provided node was already assigned to another box.
    pub fn add_box_with_centre<I>(&mut self, centre: Node, nodes: I) -> BoxId
    where
        I: IntoIterator<Item = Node>,
    {
        if self.centres.is_none() {
            self.centres = Some(vec![INVALID_NODE; self.box_sizes.len()]);
        }
        let id = self.add_box(nodes);
        if let Some(centres) = self.centres.as_mut() {
            centres[id as usize] = centre;
        }
        id
    }

    /// Moves a node into an existing box.
    ///
    /// - If the node was already in a box, it is removed from its old box.
    /// - If the node was unassigned, it becomes assigned.
    pub fn move_node(&mut self, node: Node, new_box: BoxId) {
        if let Some(old_box) = self.boxes[node as usize].map(|old| old.get()) {
            self.box_sizes[old_box as usize] -= 1;
        } else {
            self.unassigned -= 1;
        }
        self.boxes[node as usize] = OptionalNode::new(new_box);
        self.box_sizes[new_box as usize] += 1;
    }

    /// Returns the box identifier of a node, or `None` if the node is unassigned.
    pub fn box_of_node(&self, node: Node) -> Option<BoxId> {
        self.boxes[node as usize].map(|b| b.get())
    }

    /// Returns the number of nodes the partition is defined on
    pub fn number_of_nodes(&self) -> NumNodes {
        self.boxes.len() as NumNodes
    }

    /// Returns *true* if every node is assigned to a box
    pub fn is_complete(&self) -> bool {
        self.unassigned == 0
    }

    /// Returns the number of nodes in the specified box.
    pub fn number_in_box(&self, box_id: BoxId) -> NumNodes {
        self.box_sizes[box_id as usize]
    }

    /// Returns the number of non-empty boxes, i.e. the box count of the covering
    pub fn number_of_boxes(&self) -> NumNodes {
        self.box_sizes.iter().filter(|&&s| s > 0).count() as NumNodes
    }

    /// Returns the number of box ids handed out so far (including emptied boxes)
    pub fn number_of_box_ids(&self) -> NumNodes {
        self.box_sizes.len() as NumNodes
    }

    /// Returns an iterator over all members of a given box.
    ///
    /// # Warning
    /// This operation is **linear in the total number of nodes**,
    /// not the size of the box itself.
    pub fn members_of_box(&self, box_id: BoxId) -> BoxMemberIter<'_> {
        assert!(self.box_sizes.len() > box_id as usize);
        BoxMemberIter {
            boxes: self.boxes.iter().enumerate(),
            box_id: OptionalNode::new(box_id),
        }
    }

    /// Returns the members of all boxes; `result[b]` lists the nodes of box `b` increasingly.
    /// Runs in linear time.
    pub fn boxes(&self) -> Vec<Vec<Node>> {
        let mut boxes = self
            .box_sizes
            .iter()
            .map(|&s| Vec::with_capacity(s as usize))
            .collect_vec();
        for (u, b) in self.boxes.iter().enumerate() {
            if let Some(b) = b {
                boxes[b.get() as usize].push(u as Node);
            }
        }
        boxes
    }

    /// Returns the designated centre of a box, if the covering has centres
    pub fn centre_of_box(&self, box_id: BoxId) -> Option<Node> {
        self.centres
            .as_ref()
            .map(|c| c[box_id as usize])
            .filter(|&c| c != INVALID_NODE)
    }

    /// Returns the centres of all boxes, if the covering has centres
    pub fn centres(&self) -> Option<&[Node]> {
        self.centres.as_deref()
    }

    /// Returns `assignment[u]`, the box of every node; unassigned nodes map to `INVALID_NODE`
    pub fn assignment(&self) -> Vec<BoxId> {
        self.boxes
            .iter()
            .map(|b| b.map_or(INVALID_NODE, |b| b.get()))
            .collect()
    }

    /// Removes empty boxes and renumbers the remaining ones densely, keeping their order
    pub fn compact(&mut self) {
        if self.box_sizes.iter().all(|&s| s > 0) {
            return;
        }

        let mut new_id = vec![INVALID_NODE; self.box_sizes.len()];
        let mut next = 0;
        for (b, &s) in self.box_sizes.iter().enumerate() {
            if s > 0 {
                new_id[b] = next;
                next += 1;
            }
        }

        for b in self.boxes.iter_mut().flatten() {
            *b = OptionalNode::new(new_id[b.get() as usize]).unwrap_or(*b);
        }
        if let Some(centres) = self.centres.as_mut() {
            *centres = centres
                .iter()
                .enumerate()
                .filter_map(|(b, &c)| (new_id[b] != INVALID_NODE).then_some(c))
                .collect();
        }
        self.box_sizes.retain(|&s| s > 0);
    }

    /// Checks that the partition is a valid covering of `network` for the given box size.
    ///
    /// - [`Family::Diameter`]: every two members of a box have distance at most `size - 1`
    /// - [`Family::Radius`]: every box has a centre among its members and every member is
    ///   within distance `size` of it
    ///
    /// Uses the distance matrix if the network holds it and truncated BFS otherwise.
    ///
    /// # Errors
    /// Fails with [`CoverError::PartitionValidation`] describing the first violation.
    pub fn validate(
        &self,
        network: &Network,
        family: Family,
        size: u32,
        algorithm: &str,
    ) -> Result<()> {
        let fail = |reason: String| {
            Err(CoverError::PartitionValidation {
                algorithm: algorithm.to_string(),
                reason,
            })
        };

        if self.number_of_nodes() != network.number_of_nodes() {
            return fail(format!(
                "partition has {} nodes, network has {}",
                self.number_of_nodes(),
                network.number_of_nodes()
            ));
        }
        if !self.is_complete() {
            return fail(format!("{} nodes are not covered", self.unassigned));
        }

        let matrix = network.distances().ok();
        for (b, members) in self.boxes().into_iter().enumerate() {
            if members.is_empty() {
                continue;
            }

            match family {
                Family::Diameter => {
                    let bound = size.saturating_sub(1);
                    for &u in &members {
                        let ok = match matrix {
                            Some(m) => m.fits(u, &members, clamp_distance(bound)),
                            None => {
                                let ball = network.graph().ball_as_bitset(u, bound);
                                members.iter().all(|&v| ball.contains(v as usize))
                            }
                        };
                        if !ok {
                            return fail(format!(
                                "box {b} contains nodes at distance >= {size} from node {u}"
                            ));
                        }
                    }
                }
                Family::Radius => {
                    let Some(centre) = self.centre_of_box(b as BoxId) else {
                        return fail(format!("box {b} has no centre"));
                    };
                    if self.box_of_node(centre) != Some(b as BoxId) {
                        return fail(format!("centre {centre} is not a member of box {b}"));
                    }
                    let ok = match matrix {
                        Some(m) => m.fits(centre, &members, clamp_distance(size)),
                        None => {
                            let ball = network.graph().ball_as_bitset(centre, size);
                            members.iter().all(|&v| ball.contains(v as usize))
                        }
                    };
                    if !ok {
                        return fail(format!(
                            "box {b} contains nodes farther than {size} from centre {centre}"
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Converts a box size bound to a [`Distance`], saturating at the largest finite distance
pub(crate) fn clamp_distance(bound: u32) -> Distance {
    bound.min((INFINITE_DISTANCE - 1) as u32) as Distance
}

/// Convenience trait for converting a collection of boxes into a [`Partition`].
///
/// Each inner collection is interpreted as one box.
pub trait IntoPartition {
    /// Consumes the collection and builds a [`Partition`] with `n` total nodes.
    fn into_partition(self, n: NumNodes) -> Partition;
}

impl<N, I> IntoPartition for I
where
    N: IntoIterator<Item = Node>,
    I: IntoIterator<Item = N>,
{
    fn into_partition(self, n: NumNodes) -> Partition {
        let mut partition = Partition::new(n);
        for class in self {
            partition.add_box(class);
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    #[test]
    fn build_and_query() {
        let mut part = Partition::new(6);
        let b0 = part.add_box([0, 1, 2]);
        let b1 = part.add_box([3]);
        assert!(!part.is_complete());
        assert_eq!(part.box_of_node(4), None);

        part.move_node(4, b1);
        part.move_node(5, b1);
        part.move_node(2, b1);
        assert!(part.is_complete());
        assert_eq!(part.number_in_box(b0), 2);
        assert_eq!(part.members_of_box(b1).collect_vec(), vec![2, 3, 4, 5]);
        assert_eq!(part.boxes(), vec![vec![0, 1], vec![2, 3, 4, 5]]);
        assert_eq!(part.assignment(), vec![0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn compact_and_assignment() {
        let mut part = vec![vec![0], vec![1, 2], vec![3]].into_partition(4);
        part.move_node(1, 0);
        part.move_node(2, 0);
        assert_eq!(part.number_of_boxes(), 2);
        assert_eq!(part.number_of_box_ids(), 3);

        part.compact();
        assert_eq!(part.number_of_box_ids(), 2);
        assert_eq!(part.assignment(), vec![0, 0, 0, 1]);

        let part = Partition::from_assignment(&[7, 7, 3, 9, 3]);
        assert_eq!(part.assignment(), vec![0, 0, 1, 2, 1]);
        assert_eq!(part.number_of_boxes(), 3);
    }

    #[test]
    fn centres_survive_compaction() {
        let mut part = Partition::new(4);
        part.add_box_with_centre(0, [0]);
        part.add_box_with_centre(2, [1, 2, 3]);
        part.move_node(0, 1);
        part.compact();
        assert_eq!(part.centres(), Some(&[2][..]));
        assert_eq!(part.centre_of_box(0), Some(2));
    }

    #[test]
    fn validate_diameter() {
        let mut network = Network::new("path", CsrGraph::path(6)).unwrap();
        let good = vec![vec![0, 1, 2], vec![3, 4, 5]].into_partition(6);
        let bad = vec![vec![0, 1, 2, 3], vec![4, 5]].into_partition(6);
        let partial = vec![vec![0, 1, 2]].into_partition(6);

        for with_distances in [false, true] {
            if with_distances {
                network.ensure_distances().unwrap();
            }
            assert!(good.validate(&network, Family::Diameter, 3, "test").is_ok());
            assert!(matches!(
                bad.validate(&network, Family::Diameter, 3, "test"),
                Err(CoverError::PartitionValidation { .. })
            ));
            assert!(bad.validate(&network, Family::Diameter, 4, "test").is_ok());
            assert!(partial.validate(&network, Family::Diameter, 10, "test").is_err());
        }
    }

    #[test]
    fn validate_radius() {
        let network = Network::new("cycle", CsrGraph::cycle(4)).unwrap();

        let mut good = Partition::new(4);
        good.add_box_with_centre(0, [3, 0, 1]);
        good.add_box_with_centre(2, [2]);
        assert!(good.validate(&network, Family::Radius, 1, "test").is_ok());

        let mut far = Partition::new(4);
        far.add_box_with_centre(0, [0, 1, 2]);
        far.add_box_with_centre(3, [3]);
        assert!(far.validate(&network, Family::Radius, 1, "test").is_err());
        assert!(far.validate(&network, Family::Radius, 2, "test").is_ok());

        let no_centres = vec![vec![0, 1, 2, 3]].into_partition(4);
        assert!(no_centres.validate(&network, Family::Radius, 2, "test").is_err());
    }
}
