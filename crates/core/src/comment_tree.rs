//! Discussion thread assembly: flat comment lists into nested reply forests.
//!
//! Comments are fetched flat (ordered by `created_at ASC`) and every record
//! carries at most one parent pointer. [`build_tree`] turns that list into a
//! forest of [`CommentNode`]s, and [`render_forest`] layers the depth-capped
//! presentation hints on top of it.
//!
//! Reply chains have no depth limit, so nothing here recurses per level:
//! building and rendering use explicit work lists, and [`Replies`] tears a
//! subtree down iteratively when it is dropped.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Number of indentation levels a thread renders before replies stop
/// indenting further.
pub const MAX_RENDER_DEPTH: usize = 6;

/// Replies at or below this depth use the compact avatar size.
pub const COMPACT_AVATAR_DEPTH: usize = 1;

/// Deepest level at which the delete action is offered.
pub const DELETE_ACTION_MAX_DEPTH: usize = MAX_RENDER_DEPTH - 2;

/* --------------------------------------------------------------------------
Tree building
-------------------------------------------------------------------------- */

/// A record that can be placed in a reply tree.
///
/// Only the key and the parent pointer are consulted; every other field is
/// carried through untouched.
pub trait Threaded {
    type Key: Eq + Hash;

    /// Unique identifier of this record.
    fn thread_key(&self) -> &Self::Key;

    /// Identifier of the record this one replies to, if any.
    fn parent_key(&self) -> Option<&Self::Key>;
}

/// A tree node owning a [`Replies`] list.
pub trait Nested: Sized {
    fn replies_mut(&mut self) -> &mut Replies<Self>;
}

/// The direct replies of a node, in input order.
#[derive(Debug)]
pub struct Replies<N: Nested>(Vec<N>);

impl<N: Nested> Replies<N> {
    pub fn into_vec(mut self) -> Vec<N> {
        std::mem::take(&mut self.0)
    }
}

impl<N: Nested> Default for Replies<N> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<N: Nested> From<Vec<N>> for Replies<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self(nodes)
    }
}

impl<N: Nested> FromIterator<N> for Replies<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<N: Nested> Deref for Replies<N> {
    type Target = [N];

    fn deref(&self) -> &[N] {
        &self.0
    }
}

impl<N: Nested> IntoIterator for Replies<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, N: Nested> IntoIterator for &'a Replies<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<N: Nested> Drop for Replies<N> {
    fn drop(&mut self) {
        // Each popped node is dropped with an empty reply list.
        let mut pending = std::mem::take(&mut self.0);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies_mut().0);
        }
    }
}

/// A comment together with its direct replies, in input order.
#[derive(Debug)]
pub struct CommentNode<T> {
    pub comment: T,
    pub replies: Replies<CommentNode<T>>,
}

impl<T> Nested for CommentNode<T> {
    fn replies_mut(&mut self) -> &mut Replies<Self> {
        &mut self.replies
    }
}

impl<T> CommentNode<T> {
    pub fn into_parts(self) -> (T, Vec<CommentNode<T>>) {
        let CommentNode { comment, replies } = self;
        (comment, replies.into_vec())
    }
}

/// Build an ordered reply forest from a flat list of comments.
///
/// - A comment whose parent is present becomes one of that parent's replies.
/// - A comment with no parent, or whose parent is not in `comments`, is a root.
/// - Siblings (and roots) keep their relative input order; nothing is sorted.
/// - Parents may appear after their children in the input.
/// - A comment that is its own ancestor (self-reference or a longer cycle) is
///   forced to root at the point where the cycle closes, so every input record
///   appears exactly once in the output.
/// - When two records share an id, replies attach to the first of them.
pub fn build_tree<T: Threaded>(comments: Vec<T>) -> Vec<CommentNode<T>> {
    let n = comments.len();

    let mut parent: Vec<Option<usize>> = {
        let mut index: HashMap<&T::Key, usize> = HashMap::with_capacity(n);
        for (i, comment) in comments.iter().enumerate() {
            index.entry(comment.thread_key()).or_insert(i);
        }
        comments
            .iter()
            .map(|comment| comment.parent_key().and_then(|p| index.get(p).copied()))
            .collect()
    };

    break_cycles(&mut parent);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut roots = Vec::new();
    for (i, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    // Post-order assembly over an explicit stack so very deep threads cannot
    // exhaust the call stack while building.
    let mut slots: Vec<Option<T>> = comments.into_iter().map(Some).collect();
    let mut built: Vec<Option<CommentNode<T>>> = (0..n).map(|_| None).collect();
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&r| (r, false)).collect();

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            let replies = children[node]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            if let Some(comment) = slots[node].take() {
                built[node] = Some(CommentNode { comment, replies });
            }
        } else {
            stack.push((node, true));
            stack.extend(children[node].iter().rev().map(|&child| (child, false)));
        }
    }

    roots.into_iter().filter_map(|r| built[r].take()).collect()
}

/// Cut the parent link at the node where each parent-pointer cycle closes.
fn break_cycles(parent: &mut [Option<usize>]) {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; parent.len()];
    let mut path = Vec::new();

    for start in 0..parent.len() {
        let mut cursor = Some(start);
        while let Some(node) = cursor {
            match state[node] {
                UNSEEN => {
                    state[node] = ON_PATH;
                    path.push(node);
                    cursor = parent[node];
                }
                ON_PATH => {
                    parent[node] = None;
                    break;
                }
                _ => break,
            }
        }
        for node in path.drain(..) {
            state[node] = DONE;
        }
    }
}

/* --------------------------------------------------------------------------
Render policy
-------------------------------------------------------------------------- */

/// Depth thresholds applied when a thread is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPolicy {
    pub max_depth: usize,
    pub compact_avatar_depth: usize,
    pub delete_action_max_depth: usize,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            max_depth: MAX_RENDER_DEPTH,
            compact_avatar_depth: COMPACT_AVATAR_DEPTH,
            delete_action_max_depth: DELETE_ACTION_MAX_DEPTH,
        }
    }
}

impl RenderPolicy {
    /// Indentation level for a comment at logical `depth` (roots are depth 0).
    ///
    /// Replies past the cap keep nesting logically but share the cap's
    /// indentation.
    pub fn indent_level(&self, depth: usize) -> usize {
        depth.min(self.max_depth.saturating_sub(1))
    }

    pub fn compact_avatar(&self, depth: usize) -> bool {
        depth >= self.compact_avatar_depth
    }

    pub fn delete_action(&self, depth: usize) -> bool {
        depth <= self.delete_action_max_depth
    }
}

/// A comment node annotated with its presentation hints.
#[derive(Debug)]
pub struct RenderedComment<T> {
    pub comment: T,
    pub depth: usize,
    pub render_depth: usize,
    pub compact_avatar: bool,
    pub delete_action: bool,
    pub replies: Replies<RenderedComment<T>>,
}

impl<T> Nested for RenderedComment<T> {
    fn replies_mut(&mut self) -> &mut Replies<Self> {
        &mut self.replies
    }
}

/// Annotate a forest with depth, capped indentation, and affordance gates.
pub fn render_forest<T>(
    forest: Vec<CommentNode<T>>,
    policy: &RenderPolicy,
) -> Vec<RenderedComment<T>> {
    // Flatten in pre-order: every reply lands after its parent in the arena
    // and siblings keep their order.
    let mut comments: Vec<Option<T>> = Vec::new();
    let mut depths: Vec<usize> = Vec::new();
    let mut children: Vec<Vec<usize>> = Vec::new();
    let mut roots = Vec::new();
    let mut pending: Vec<(CommentNode<T>, usize, Option<usize>)> =
        forest.into_iter().rev().map(|node| (node, 0, None)).collect();

    while let Some((node, depth, parent)) = pending.pop() {
        let (comment, replies) = node.into_parts();
        let index = comments.len();
        comments.push(Some(comment));
        depths.push(depth);
        children.push(Vec::new());
        match parent {
            Some(p) => children[p].push(index),
            None => roots.push(index),
        }
        pending.extend(
            replies
                .into_iter()
                .rev()
                .map(|reply| (reply, depth + 1, Some(index))),
        );
    }

    // Children always sit at higher indices, so a reverse sweep sees every
    // subtree completed before its parent.
    let mut built: Vec<Option<RenderedComment<T>>> =
        (0..comments.len()).map(|_| None).collect();
    for index in (0..comments.len()).rev() {
        let replies = children[index]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(comment) = comments[index].take() {
            let depth = depths[index];
            built[index] = Some(RenderedComment {
                comment,
                depth,
                render_depth: policy.indent_level(depth),
                compact_avatar: policy.compact_avatar(depth),
                delete_action: policy.delete_action(depth),
                replies,
            });
        }
    }

    roots.into_iter().filter_map(|r| built[r].take()).collect()
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
