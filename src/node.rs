/*!
# Node Representation

We choose `Node = u32` as almost all networks used for box covering have less than `2^32` nodes.
This allows us to (1) save space by not using `usize` or `u64` and (2) directly use nodes as
indices into the distance matrix and partition vectors.
*/

use std::num::NonZero;

use fixedbitset::FixedBitSet;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet for Nodes
pub type NodeBitSet = FixedBitSet;

/// Shortest-path distance between two nodes.
///
/// Distances are stored in an `n x n` matrix, so we keep them small. Real-world networks
/// have diameters far below `2^16`; larger distances are reported as a resource error.
pub type Distance = u16;

/// Distance-Value marking an unreachable node
pub const INFINITE_DISTANCE: Distance = Distance::MAX;

/// As `Option<Node>` uses additional bytes for padding, it can be inefficient
/// since we often need to use `Vec<Option<Node>>`. This instead uses the
/// `NonZero`-Wrapper to assign a constant value (often)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OptionalNodeImpl<const N: Node>(NonZero<Node>);

/// Often, `INVALID_NODE` is safe to pick as the `None`-Value
pub type OptionalNode = OptionalNodeImpl<INVALID_NODE>;

impl<const N: Node> OptionalNodeImpl<N> {
    /// Returns `Some(OptionalNodeImpl)` if `n != N` and `None` otherwise
    pub const fn new(n: Node) -> Option<Self> {
        match NonZero::new(n ^ N) {
            Some(inner) => Some(OptionalNodeImpl(inner)),
            None => None,
        }
    }

    /// Gets the underlying Node-Value
    pub const fn get(&self) -> Node {
        self.0.get() ^ N
    }
}

/// Creates an empty bitset with one bit per node
pub fn node_bitset(n: NumNodes) -> NodeBitSet {
    FixedBitSet::with_capacity(n as usize)
}

/// Creates a bitset with one bit per node where exactly the given nodes are set
pub fn node_bitset_with<I>(n: NumNodes, nodes: I) -> NodeBitSet
where
    I: IntoIterator<Item = Node>,
{
    let mut set = node_bitset(n);
    for u in nodes {
        set.insert(u as usize);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_node() {
        assert_eq!(OptionalNode::new(3).map(|x| x.get()), Some(3));
        assert_eq!(OptionalNode::new(0).map(|x| x.get()), Some(0));
        assert!(OptionalNode::new(INVALID_NODE).is_none());
        assert_eq!(
            std::mem::size_of::<Option<OptionalNode>>(),
            std::mem::size_of::<Node>()
        );
    }

    #[test]
    fn bitset_with() {
        let set = node_bitset_with(5, [0, 3]);
        assert_eq!(set.ones().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(set.len(), 5);
    }
}
