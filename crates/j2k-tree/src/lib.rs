//! The mutable intermediate tree shared by every conversion pass.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]; parent links are id
//! fields, so ownership is flat and the "detach before reattach" invariant is
//! an arena-level check rather than a borrow puzzle. Structural mutation is
//! always in-place on the owning arena; there is no copy-on-write.
//!
//! Lifecycle of a structural edit:
//! - [`Tree::invalidate`] marks a node's subtree as about to be replaced and
//!   releases its children (they become detached and reusable);
//! - allocation or a slot write attaches detached nodes;
//! - attaching a node that is still attached elsewhere, or reading the
//!   children of an invalidated node, is an [`InvalidTreeState`] error.
//!   These indicate a bug in a conversion pass, not malformed input, and
//!   abort the run.

use j2k_core::NodeId;
use thiserror::Error;

pub mod build;
pub mod node;
pub mod visitor;

#[cfg(test)]
mod tests;

pub use node::{
    AssignmentOp, BinaryOp, ClassDecl, ClassKind, ConstructorDecl, DelegationCall, LiteralKind,
    MethodDecl, Modality, Mutability, NodeCategory, NodeKind, OtherModifier, UnaryOp,
    VariableDecl, Visibility,
};
pub use visitor::{accept, walk, Visitor};

/// Programming-error class failures of the tree invariants. Fatal: a pass
/// that triggers one aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTreeState {
    #[error("node {node:?} is already attached to {parent:?} and must be detached first")]
    AlreadyAttached { node: NodeId, parent: NodeId },
    #[error("node {node:?} has been invalidated")]
    Invalidated { node: NodeId },
    #[error("node {node:?} is not a child of {parent:?}")]
    NotAChild { node: NodeId, parent: NodeId },
    #[error("node {node:?} occupies a required slot of {parent:?} and cannot be detached")]
    RequiredSlot { node: NodeId, parent: NodeId },
    #[error("attaching {node:?} under {parent:?} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    invalidated: bool,
}

/// Arena of tree nodes. Each node owns its children exclusively: a node has
/// at most one parent at any time.
#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a node, attaching every child referenced by `kind`.
    ///
    /// All referenced children must currently be detached and live; on any
    /// violation nothing is attached and the error is returned.
    pub fn alloc(&mut self, kind: NodeKind) -> Result<NodeId, InvalidTreeState> {
        let id = NodeId(self.nodes.len() as u32);
        let children = kind.child_ids();
        self.check_attachable(&children, id)?;
        self.nodes.push(NodeData {
            kind,
            parent: None,
            invalidated: false,
        });
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        Ok(id)
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[must_use]
    pub fn is_invalidated(&self, id: NodeId) -> bool {
        self.nodes[id.index()].invalidated
    }

    /// Ordered children of a node. Reading through an invalidated node is an
    /// error: its payload no longer owns what it references.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, InvalidTreeState> {
        let data = &self.nodes[id.index()];
        if data.invalidated {
            return Err(InvalidTreeState::Invalidated { node: id });
        }
        Ok(data.kind.child_ids())
    }

    /// Walks parent links from `id` upward (excluding `id` itself).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Replaces the payload of `id`, transactionally rebinding children:
    /// children present only in the old payload are detached, children
    /// present only in the new payload are attached (and must be detached
    /// beforehand), children in both stay attached.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<(), InvalidTreeState> {
        if self.nodes[id.index()].invalidated {
            return Err(InvalidTreeState::Invalidated { node: id });
        }
        let old_children = self.nodes[id.index()].kind.child_ids();
        let new_children = kind.child_ids();
        let added: Vec<NodeId> = new_children
            .iter()
            .copied()
            .filter(|c| !old_children.contains(c))
            .collect();
        self.check_attachable(&added, id)?;
        for child in old_children {
            if !new_children.contains(&child) {
                self.nodes[child.index()].parent = None;
            }
        }
        for child in added {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes[id.index()].kind = kind;
        Ok(())
    }

    /// Writes a child slot: detaches `old`, attaches `new` in its place.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), InvalidTreeState> {
        if old == new {
            return Ok(());
        }
        if self.nodes[parent.index()].invalidated {
            return Err(InvalidTreeState::Invalidated { node: parent });
        }
        self.check_attachable(&[new], parent)?;
        let mut kind = self.nodes[parent.index()].kind.clone();
        if !kind.replace_child(old, new) {
            return Err(InvalidTreeState::NotAChild {
                node: old,
                parent,
            });
        }
        self.nodes[old.index()].parent = None;
        self.nodes[new.index()].parent = Some(parent);
        self.nodes[parent.index()].kind = kind;
        Ok(())
    }

    /// Replaces `old` wherever it is attached. Returns an error when `old`
    /// has no parent (roots are replaced by returning the new id instead).
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), InvalidTreeState> {
        match self.parent(old) {
            Some(parent) => self.replace_child(parent, old, new),
            None => Err(InvalidTreeState::NotAChild {
                node: old,
                parent: old,
            }),
        }
    }

    /// Marks `id` as about to be replaced and releases its children: each
    /// direct child becomes detached and may be reused in a replacement
    /// subtree. The node's own parent link is left untouched so the caller
    /// can still locate the slot to overwrite.
    pub fn invalidate(&mut self, id: NodeId) -> Result<(), InvalidTreeState> {
        let data = &mut self.nodes[id.index()];
        if data.invalidated {
            return Err(InvalidTreeState::Invalidated { node: id });
        }
        data.invalidated = true;
        for child in self.nodes[id.index()].kind.child_ids() {
            self.nodes[child.index()].parent = None;
        }
        Ok(())
    }

    /// Removes the ownership edge between `id` and its parent.
    ///
    /// Legal when the parent is invalidated (the edge is already morally
    /// gone) or when `id` occupies a list or optional slot; a required single
    /// slot cannot be emptied, only replaced.
    pub fn detach(&mut self, id: NodeId) -> Result<(), InvalidTreeState> {
        let Some(parent) = self.parent(id) else {
            return Ok(());
        };
        if self.nodes[parent.index()].invalidated {
            self.nodes[id.index()].parent = None;
            return Ok(());
        }
        let mut kind = self.nodes[parent.index()].kind.clone();
        if !kind.remove_child(id) {
            return Err(InvalidTreeState::RequiredSlot { node: id, parent });
        }
        self.nodes[parent.index()].kind = kind;
        self.nodes[id.index()].parent = None;
        Ok(())
    }

    /// Deep-copies the subtree rooted at `id`; the copy is detached and built
    /// from fresh nodes throughout. Used when a rewrite needs the same
    /// statements in more than one place (e.g. switch fallthrough inlining).
    pub fn copy_subtree_detached(&mut self, id: NodeId) -> Result<NodeId, InvalidTreeState> {
        if self.nodes[id.index()].invalidated {
            return Err(InvalidTreeState::Invalidated { node: id });
        }
        let mut kind = self.nodes[id.index()].kind.clone();
        let mut result = Ok(());
        kind.for_each_child_mut(&mut |slot| {
            if result.is_err() {
                return;
            }
            match self.copy_subtree_detached(*slot) {
                Ok(copy) => *slot = copy,
                Err(e) => result = Err(e),
            }
        });
        result?;
        self.alloc(kind)
    }

    fn check_attachable(
        &self,
        children: &[NodeId],
        parent: NodeId,
    ) -> Result<(), InvalidTreeState> {
        // `parent` may be the id of a node that is still being allocated.
        let parent_exists = parent.index() < self.nodes.len();
        for (i, &child) in children.iter().enumerate() {
            let data = &self.nodes[child.index()];
            if data.invalidated {
                return Err(InvalidTreeState::Invalidated { node: child });
            }
            if let Some(current) = data.parent {
                return Err(InvalidTreeState::AlreadyAttached {
                    node: child,
                    parent: current,
                });
            }
            // The same node twice in one payload is a double-attach.
            if children[..i].contains(&child) {
                return Err(InvalidTreeState::AlreadyAttached {
                    node: child,
                    parent,
                });
            }
            if child == parent
                || (parent_exists && self.ancestors(parent).any(|a| a == child))
            {
                return Err(InvalidTreeState::Cycle {
                    node: child,
                    parent,
                });
            }
        }
        Ok(())
    }
}
