// Comment tree construction.
// Arena-backed tree expanded incrementally as item fetches resolve.

use std::collections::HashMap;

use tracing::trace;

use crate::api::{Item, ItemId};

/// Index of a node in the tree arena.
type NodeIx = usize;

/// Load state of one tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSlot {
    /// Fetch not yet resolved for this node's id.
    Pending,
    /// Resolved item; never reverts to pending.
    Resolved(Item),
    /// Terminal fetch failure, rendered as an error leaf.
    Failed(String),
}

/// One node of the comment tree.
#[derive(Debug)]
pub struct Node {
    pub id: ItemId,
    pub slot: NodeSlot,
    children: Vec<NodeIx>,
    parent: Option<NodeIx>,
}

/// Rooted comment tree over an arena. Nodes are referenced by index so a
/// placeholder can be replaced in position without rebuilding the tree.
/// Pruned nodes are unlinked and their arena entries left dead; tree sizes
/// are bounded by per-story comment counts, so the arena is never compacted.
#[derive(Debug)]
pub struct CommentTree {
    nodes: Vec<Node>,
    /// Live ids only; pruned subtrees drop out so stale merges are ignored.
    index: HashMap<ItemId, NodeIx>,
    root: NodeIx,
}

impl CommentTree {
    /// Create a tree with a single pending node for `root_id`.
    pub fn new(root_id: ItemId) -> Self {
        Self {
            nodes: vec![Node {
                id: root_id,
                slot: NodeSlot::Pending,
                children: Vec::new(),
                parent: None,
            }],
            index: HashMap::from([(root_id, 0)]),
            root: 0,
        }
    }

    pub fn root_id(&self) -> ItemId {
        self.nodes[self.root].id
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Look up the live node for an item id.
    pub fn get(&self, id: ItemId) -> Option<&Node> {
        self.index.get(&id).map(|&ix| &self.nodes[ix])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Children of a node, in the order the parent's kids listed them.
    pub fn children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.children.iter().map(|&ix| &self.nodes[ix])
    }

    /// Ids whose fetches have not resolved yet, in depth-first order from
    /// the root. This is the fetch frontier for the next batch.
    pub fn pending_ids(&self) -> Vec<ItemId> {
        let mut pending = Vec::new();
        let mut stack = vec![self.root];
        while let Some(ix) = stack.pop() {
            let node = &self.nodes[ix];
            if node.slot == NodeSlot::Pending {
                pending.push(node.id);
            }
            stack.extend(node.children.iter().rev());
        }
        pending
    }

    /// Merge a resolved item into its node: replace the pending slot in
    /// place, attach pending children for each of the item's kids so the
    /// next layer is visible immediately, and prune the whole subtree when
    /// the item is a deleted comment. Applying the same item twice is a
    /// no-op; merges for ids no longer in the tree are ignored.
    pub fn merge(&mut self, item: &Item) {
        if item.is_placeholder() {
            return;
        }
        let Some(&ix) = self.index.get(&item.id()) else {
            return;
        };

        if let Item::Comment(comment) = item {
            if comment.deleted {
                trace!(id = comment.id, "pruning deleted comment");
                self.prune(ix);
                return;
            }
        }

        if matches!(self.nodes[ix].slot, NodeSlot::Resolved(_)) {
            return;
        }
        self.nodes[ix].slot = NodeSlot::Resolved(item.clone());

        // Stories are only expanded at the root; a story or job appearing
        // deeper in the tree is a leaf.
        if matches!(item, Item::Comment(_)) || ix == self.root {
            for &kid in item.kids() {
                self.attach_child(ix, kid);
            }
        }
    }

    /// Mark the node for `id` as failed. Terminal for this expansion;
    /// siblings are unaffected. A node that already resolved keeps its item.
    pub fn fail(&mut self, id: ItemId, message: String) {
        if let Some(&ix) = self.index.get(&id) {
            if !matches!(self.nodes[ix].slot, NodeSlot::Resolved(_)) {
                self.nodes[ix].slot = NodeSlot::Failed(message);
            }
        }
    }

    /// Return failed nodes to pending so a new expansion cycle retries
    /// them. Failed ids never entered the cache, so each gets a fresh
    /// fetch (or a cache hit if it resolved in the meantime).
    pub(crate) fn retry_failed(&mut self) {
        for &ix in self.index.values() {
            if matches!(self.nodes[ix].slot, NodeSlot::Failed(_)) {
                self.nodes[ix].slot = NodeSlot::Pending;
            }
        }
    }

    fn attach_child(&mut self, parent: NodeIx, id: ItemId) {
        if self.index.contains_key(&id) {
            return;
        }
        let ix = self.nodes.len();
        self.nodes.push(Node {
            id,
            slot: NodeSlot::Pending,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.index.insert(id, ix);
        self.nodes[parent].children.push(ix);
    }

    /// Unlink a node and its entire subtree; their ids drop out of the
    /// index so later stale merges for them are ignored.
    fn prune(&mut self, ix: NodeIx) {
        if let Some(parent) = self.nodes[ix].parent {
            self.nodes[parent].children.retain(|&child| child != ix);
        }
        let mut stack = vec![ix];
        while let Some(current) = stack.pop() {
            self.index.remove(&self.nodes[current].id);
            stack.extend(self.nodes[current].children.clone());
        }
        if ix == self.root {
            // A deleted root has nothing to show; detach its layers too.
            self.nodes[self.root].children.clear();
            self.nodes[self.root].slot = NodeSlot::Failed("deleted".to_string());
        }
    }
}
