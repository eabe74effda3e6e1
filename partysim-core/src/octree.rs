//! # Lazily subdivided octree
//!
//! A bounded spatial container mapping 3D positions to lists of values.
//!
//! - The root covers an axis-aligned box given by its center and dimension.
//! - A node of depth `n > 0` is split into 8 children of depth `n - 1`, each
//!   covering one octant of the parent box. Children are only created when a
//!   value is first added below that node.
//! - Values are stored at depth 0 (leaves) only.
//! - When a removal empties a leaf, the tree is pruned bottom-up: a node drops
//!   its 8 children once none of them holds values or children of its own.
//!
//! Nodes live in an arena (`Vec`) and refer to each other by [`NodeId`]; every
//! node keeps the id of its parent so pruning can walk back up to the root.
//! Slots of pruned nodes are recycled by later subdivisions.
//!
//! Bounds are stored as min/max corners. A child takes its faces from the
//! parent's corners and center, so siblings share faces exactly and the root
//! boundary `center ± dimension / 2` is contained without rounding loss.
//!
//! Child order is fixed. The top face (`+y`) comes first as
//! `(+x,+z), (+x,-z), (-x,+z), (-x,-z)`, then the bottom face (`-y`) in the
//! same x/z order.

use crate::error::OctreeError;
use glam::Vec3;

/// Sign of each child's offset from its parent center, in child order
const CHILD_OFFSETS: [Vec3; 8] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, -1.0, -1.0),
];

/// Handle of a node inside an [`Octree`]
///
/// Ids of pruned nodes become stale and may later be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct OctreeNode<T> {
    depth: u32,
    min: Vec3,
    max: Vec3,
    parent: Option<NodeId>,
    children: Option<[NodeId; 8]>,
    values: Vec<T>,
}

impl<T> OctreeNode<T> {
    fn contains(&self, position: Vec3) -> bool {
        position.cmpge(self.min).all() && position.cmple(self.max).all()
    }

    fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    fn dimension(&self) -> Vec3 {
        self.max - self.min
    }

    fn is_occupied(&self) -> bool {
        self.children.is_some() || !self.values.is_empty()
    }
}

/// Bounds and content of a non-empty leaf
#[derive(Debug, Clone, Copy)]
pub struct LeafView<'a, T> {
    pub center: Vec3,
    pub dimension: Vec3,
    pub values: &'a [T],
}

#[derive(Debug, Clone)]
pub struct Octree<T> {
    nodes: Vec<Option<OctreeNode<T>>>,
    free: Vec<usize>,
    root: NodeId,
}

impl<T> Octree<T> {
    /// Create a root of the given depth over the box `center ± dimension / 2`
    ///
    /// A depth of `n` allows up to `8^n` leaves. No children are allocated yet.
    pub fn new(depth: u32, center: Vec3, dimension: Vec3) -> Self {
        let half = dimension * 0.5;
        let root = OctreeNode {
            depth,
            min: center - half,
            max: center + half,
            parent: None,
            children: None,
            values: Vec::new(),
        };
        Self {
            nodes: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// True iff `position` lies inside the root box (boundaries included)
    pub fn contains(&self, position: Vec3) -> bool {
        self.node(self.root).contains(position)
    }

    pub fn node_contains(&self, id: NodeId, position: Vec3) -> bool {
        self.node(id).contains(position)
    }

    pub fn depth(&self, id: NodeId) -> u32 {
        self.node(id).depth
    }

    pub fn center(&self, id: NodeId) -> Vec3 {
        self.node(id).center()
    }

    pub fn dimension(&self, id: NodeId) -> Vec3 {
        self.node(id).dimension()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of a node, `None` while they are not materialized
    pub fn children(&self, id: NodeId) -> Option<[NodeId; 8]> {
        self.node(id).children
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Store `value` in the leaf containing `position`, subdividing on the way down
    pub fn add(&mut self, value: T, position: Vec3) -> Result<(), OctreeError> {
        self.check_bounds(self.root, position)?;

        let mut current = self.root;
        loop {
            if self.node(current).depth == 0 {
                self.node_mut(current).values.push(value);
                return Ok(());
            }
            let children = self.init_children(current);
            // first match wins when the position sits on an octant boundary
            current = match children.iter().find(|c| self.node(**c).contains(position)) {
                Some(child) => *child,
                None => return Err(self.out_of_bounds(current, position)),
            };
        }
    }

    /// Values stored in the leaf containing `position`
    ///
    /// Returns an empty slice when the containing subtree was never subdivided.
    pub fn get(&self, position: Vec3) -> Result<&[T], OctreeError> {
        self.check_bounds(self.root, position)?;

        let mut current = self.root;
        loop {
            let node = self.node(current);
            let children = match node.children {
                Some(children) if node.depth > 0 => children,
                _ => return Ok(&node.values),
            };
            current = match children.iter().find(|c| self.node(**c).contains(position)) {
                Some(child) => *child,
                None => return Err(self.out_of_bounds(current, position)),
            };
        }
    }

    /// All non-empty leaves, in child order
    pub fn occupied_leaves(&self) -> Vec<LeafView<'_, T>> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if let Some(children) = node.children {
                stack.extend(children.iter().rev());
            } else if !node.values.is_empty() {
                leaves.push(LeafView {
                    center: node.center(),
                    dimension: node.dimension(),
                    values: &node.values,
                });
            }
        }
        leaves
    }

    /// Materialize the 8 children of `id` if needed and return them
    fn init_children(&mut self, id: NodeId) -> [NodeId; 8] {
        if let Some(children) = self.node(id).children {
            return children;
        }
        let (depth, min, max) = {
            let node = self.node(id);
            (node.depth, node.min, node.max)
        };
        let center = (min + max) * 0.5;

        let children = CHILD_OFFSETS.map(|sign| {
            let upper = sign.cmpgt(Vec3::ZERO);
            self.alloc(OctreeNode {
                depth: depth - 1,
                min: Vec3::select(upper, center, min),
                max: Vec3::select(upper, max, center),
                parent: Some(id),
                children: None,
                values: Vec::new(),
            })
        });
        self.node_mut(id).children = Some(children);
        log::debug!("octree: subdivided node at {} (depth {})", center, depth);
        children
    }

    /// Walk from `id` up to the root, dropping children sets that hold nothing
    fn clean_recursive(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if let Some(children) = self.node(node_id).children {
                if children.iter().all(|c| !self.node(*c).is_occupied()) {
                    for child in children {
                        self.release(child);
                    }
                    self.node_mut(node_id).children = None;
                    log::debug!("octree: pruned children at depth {}", self.node(node_id).depth);
                }
            }
            current = self.node(node_id).parent;
        }
    }

    fn alloc(&mut self, node: OctreeNode<T>) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id.0] = None;
        self.free.push(id.0);
    }

    fn is_live(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    fn node(&self, id: NodeId) -> &OctreeNode<T> {
        match self.nodes.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("stale octree node id {:?}", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut OctreeNode<T> {
        match self.nodes.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("stale octree node id {:?}", id),
        }
    }

    fn check_bounds(&self, id: NodeId, position: Vec3) -> Result<(), OctreeError> {
        if self.node(id).contains(position) {
            Ok(())
        } else {
            Err(self.out_of_bounds(id, position))
        }
    }

    fn out_of_bounds(&self, id: NodeId, position: Vec3) -> OctreeError {
        let node = self.node(id);
        OctreeError::OutOfBounds {
            position,
            center: node.center(),
            dimension: node.dimension(),
        }
    }
}

impl<T: PartialEq> Octree<T> {
    /// Remove every occurrence of `value` from the leaves containing `position`
    ///
    /// Unlike [`Octree::add`], which follows the first matching child, removal
    /// visits every child containing the position, so a position on an octant
    /// boundary is searched in all adjacent leaves. Returns the number of values
    /// removed.
    pub fn remove(&mut self, value: &T, position: Vec3) -> Result<usize, OctreeError> {
        self.check_bounds(self.root, position)?;

        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.depth == 0 {
                leaves.push(id);
            } else if let Some(children) = node.children {
                stack.extend(children.iter().filter(|c| self.node(**c).contains(position)));
            }
        }

        let mut removed = 0;
        for leaf in leaves {
            // an earlier prune may already have released this leaf
            if !self.is_live(leaf) {
                continue;
            }
            let values = &mut self.node_mut(leaf).values;
            let before = values.len();
            values.retain(|v| v != value);
            removed += before - values.len();
            if values.is_empty() {
                self.clean_recursive(leaf);
            }
        }
        Ok(removed)
    }
}
