//! Comment tree assembly
//!
//! Rebuilds the reply forest from the flat, chronologically ordered comment
//! rows a store hands back. Two passes over the input: build an id index,
//! then attach every comment to its parent's replies. A comment whose
//! parent is unknown (deleted, or never existed) is promoted to a root;
//! deleting a parent must not strand its replies.

use crate::models::{CommentNode, FlatComment};
use std::collections::HashMap;

/// Build the reply forest for one post.
///
/// O(n) in comment count and stable: siblings keep the input
/// (chronological) order at every level.
pub fn build_comment_tree(comments: Vec<FlatComment>) -> Vec<CommentNode> {
    let index: HashMap<uuid::Uuid, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id.and_then(|p| index.get(&p).copied()) {
            // Self-parented rows are corrupt input; treat them as roots
            Some(parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }

    let mut nodes: Vec<Option<CommentNode>> = comments
        .into_iter()
        .map(|c| Some(CommentNode::from(c)))
        .collect();

    roots
        .into_iter()
        .map(|i| assemble(i, &children, &mut nodes))
        .collect()
}

/// Total node count of a forest, replies included. Backs the denormalized
/// comment counter shown on post listings.
pub fn count_nodes(forest: &[CommentNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + count_nodes(&node.replies))
        .sum()
}

fn assemble(
    i: usize,
    children: &[Vec<usize>],
    nodes: &mut Vec<Option<CommentNode>>,
) -> CommentNode {
    // Every index lands in exactly one of roots/children, so each slot is
    // taken at most once.
    let mut node = nodes[i].take().expect("comment node consumed twice");
    node.replies = children[i]
        .iter()
        .map(|&child| assemble(child, children, nodes))
        .collect();
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn comment(id: Uuid, parent_id: Option<Uuid>, minutes: i64) -> FlatComment {
        FlatComment {
            id,
            parent_id,
            author: "tester".to_string(),
            author_karma: 1,
            content: format!("comment {}", id),
            score: 1,
            created_at: Utc::now() + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_orphan_promoted_to_root() {
        let id1 = Uuid::new_v4();
        let id2 = Uuid::new_v4();
        let id3 = Uuid::new_v4();
        let missing = Uuid::new_v4();

        let forest = build_comment_tree(vec![
            comment(id1, None, 0),
            comment(id2, Some(id1), 1),
            comment(id3, Some(missing), 2),
        ]);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].id, id1);
        assert_eq!(forest[0].replies.len(), 1);
        assert_eq!(forest[0].replies[0].id, id2);
        // Orphan becomes its own root
        assert_eq!(forest[1].id, id3);
        assert!(forest[1].replies.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_comment_tree(Vec::new()).is_empty());
    }

    #[test]
    fn test_sibling_order_preserved() {
        let root = Uuid::new_v4();
        let replies: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

        let mut flat = vec![comment(root, None, 0)];
        for (i, id) in replies.iter().enumerate() {
            flat.push(comment(*id, Some(root), i as i64 + 1));
        }

        let forest = build_comment_tree(flat);
        assert_eq!(forest.len(), 1);
        let got: Vec<Uuid> = forest[0].replies.iter().map(|r| r.id).collect();
        assert_eq!(got, replies);
    }

    #[test]
    fn test_deep_nesting() {
        let ids: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
        let mut flat = vec![comment(ids[0], None, 0)];
        for i in 1..ids.len() {
            flat.push(comment(ids[i], Some(ids[i - 1]), i as i64));
        }

        let forest = build_comment_tree(flat);
        assert_eq!(forest.len(), 1);

        let mut node = &forest[0];
        for id in &ids[1..] {
            assert_eq!(node.replies.len(), 1);
            node = &node.replies[0];
            assert_eq!(node.id, *id);
        }
        assert!(node.replies.is_empty());
    }

    #[test]
    fn test_self_parent_promoted_to_root() {
        let id = Uuid::new_v4();
        let forest = build_comment_tree(vec![comment(id, Some(id), 0)]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, id);
    }

    #[test]
    fn test_parent_cycle_drops_out() {
        // Two rows pointing at each other are unreachable from any root;
        // they drop out instead of looping.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let root = Uuid::new_v4();

        let forest = build_comment_tree(vec![
            comment(root, None, 0),
            comment(a, Some(b), 1),
            comment(b, Some(a), 2),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, root);
        assert_eq!(count_nodes(&forest), 1);
    }

    #[test]
    fn test_count_nodes() {
        let root = Uuid::new_v4();
        let child = Uuid::new_v4();
        let grandchild = Uuid::new_v4();
        let forest = build_comment_tree(vec![
            comment(root, None, 0),
            comment(child, Some(root), 1),
            comment(grandchild, Some(child), 2),
        ]);
        assert_eq!(count_nodes(&forest), 3);
    }

    #[test]
    fn test_out_of_order_parent_still_resolves() {
        // The id index is built over the whole input before attaching, so a
        // parent appearing after its child still collects it.
        let parent = Uuid::new_v4();
        let child = Uuid::new_v4();
        let forest = build_comment_tree(vec![
            comment(child, Some(parent), 1),
            comment(parent, None, 0),
        ]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, parent);
        assert_eq!(forest[0].replies.len(), 1);
        assert_eq!(forest[0].replies[0].id, child);
    }
}
