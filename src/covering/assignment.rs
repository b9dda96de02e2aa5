use super::*;

/// Mutable box assignment with explicit member lists.
///
/// In contrast to [`Partition`], members of a box can be listed in time linear in the box
/// size, which the local-search algorithms need for their `fits` checks. Every node is always
/// assigned; emptied boxes keep their id until the assignment is turned into a [`Partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoxAssignment {
    box_of: Vec<BoxId>,
    members: Vec<Vec<Node>>,
    non_empty: NumNodes,
}

impl BoxAssignment {
    /// Creates an assignment from disjoint boxes covering all `n` nodes
    pub fn from_boxes(n: NumNodes, boxes: Vec<Vec<Node>>) -> Self {
        let mut box_of = vec![INVALID_NODE; n as usize];
        for (b, members) in boxes.iter().enumerate() {
            for &u in members {
                box_of[u as usize] = b as BoxId;
            }
        }
        debug_assert!(box_of.iter().all(|&b| b != INVALID_NODE));

        let non_empty = boxes.iter().filter(|b| !b.is_empty()).count() as NumNodes;
        Self {
            box_of,
            members: boxes,
            non_empty,
        }
    }

    /// Creates an assignment where every node forms its own box
    pub fn singletons(n: NumNodes) -> Self {
        Self::from_boxes(n, (0..n).map(|u| vec![u]).collect())
    }

    /// Returns the box of `u`
    #[inline]
    pub fn box_of(&self, u: Node) -> BoxId {
        self.box_of[u as usize]
    }

    /// Returns the members of box `b`
    #[inline]
    pub fn members(&self, b: BoxId) -> &[Node] {
        &self.members[b as usize]
    }

    /// Returns the number of non-empty boxes
    pub fn number_of_boxes(&self) -> NumNodes {
        self.non_empty
    }

    /// Returns the ids of all non-empty boxes
    pub fn non_empty_boxes(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(b, m)| (!m.is_empty()).then_some(b as BoxId))
    }

    /// Returns *true* if `u` is within `bound` of all members of box `b` other than itself
    #[inline]
    pub fn fits(&self, matrix: &DistanceMatrix, u: Node, b: BoxId, bound: Distance) -> bool {
        matrix.fits(u, self.members(b), bound)
    }

    /// Moves `u` into box `b`
    pub fn move_node(&mut self, u: Node, b: BoxId) {
        let old = self.box_of(u);
        if old == b {
            return;
        }

        let old_members = &mut self.members[old as usize];
        if let Some(pos) = old_members.iter().position(|&v| v == u) {
            old_members.swap_remove(pos);
        }
        if old_members.is_empty() {
            self.non_empty -= 1;
        }

        let new_members = &mut self.members[b as usize];
        if new_members.is_empty() {
            self.non_empty += 1;
        }
        new_members.push(u);
        self.box_of[u as usize] = b;
    }

    /// Moves `u` into a new singleton box and returns its id
    pub fn open_box(&mut self, u: Node) -> BoxId {
        let b = self.members.len() as BoxId;
        self.members.push(Vec::new());
        self.move_node(u, b);
        b
    }

    /// Returns a compacted partition of the assignment
    pub fn to_partition(&self) -> Partition {
        Partition::from_assignment(&self.box_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_keep_counts() {
        let mut assignment = BoxAssignment::from_boxes(5, vec![vec![0, 1], vec![2], vec![3, 4]]);
        assert_eq!(assignment.number_of_boxes(), 3);

        assignment.move_node(2, 0);
        assert_eq!(assignment.number_of_boxes(), 2);
        assert_eq!(assignment.members(0), &[0, 1, 2]);
        assert_eq!(assignment.non_empty_boxes().collect::<Vec<_>>(), vec![0, 2]);

        let b = assignment.open_box(4);
        assert_eq!(b, 3);
        assert_eq!(assignment.number_of_boxes(), 3);
        assert_eq!(assignment.box_of(4), 3);

        assert_eq!(assignment.to_partition().assignment(), vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn singletons() {
        let assignment = BoxAssignment::singletons(4);
        assert_eq!(assignment.number_of_boxes(), 4);
        assert_eq!(assignment.box_of(3), 3);
    }
}
