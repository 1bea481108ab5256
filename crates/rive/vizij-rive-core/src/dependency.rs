//! Topological ordering of the component graph.
//!
//! Depth-first with temporary and permanent marks; a node reached again while
//! it is still on the stack closes a cycle. Uses an explicit stack so deep
//! hierarchies cannot exhaust the call stack.

use hashbrown::HashMap;

use crate::error::GraphError;
use crate::ids::ObjectId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Temporary,
    Permanent,
}

/// Orders `nodes` so every node precedes its dependents. `dependents(id)`
/// lists the nodes that must update after `id`. Roots are visited in the
/// order given, so the first node (the artboard) leads the result.
pub fn sort_dependencies<'a, F>(nodes: &[ObjectId], mut dependents: F) -> Result<Vec<ObjectId>, GraphError>
where
    F: FnMut(ObjectId) -> &'a [ObjectId],
{
    let mut marks: HashMap<ObjectId, Mark> = HashMap::with_capacity(nodes.len());
    let mut post_order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<(ObjectId, &'a [ObjectId], usize)> = Vec::new();

    // Visit roots in reverse so the reversed post order keeps their order.
    for &root in nodes.iter().rev() {
        if marks.contains_key(&root) {
            continue;
        }
        marks.insert(root, Mark::Temporary);
        stack.push((root, dependents(root), 0));

        while let Some(top) = stack.last_mut() {
            let (id, edges, next) = *top;
            if next < edges.len() {
                top.2 += 1;
                let child = edges[next];
                match marks.get(&child) {
                    Some(Mark::Permanent) => {}
                    Some(Mark::Temporary) => return Err(GraphError::Cycle { id: child.0 }),
                    None => {
                        marks.insert(child, Mark::Temporary);
                        stack.push((child, dependents(child), 0));
                    }
                }
            } else {
                marks.insert(id, Mark::Permanent);
                post_order.push(id);
                stack.pop();
            }
        }
    }

    post_order.reverse();
    Ok(post_order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[u32]) -> Vec<ObjectId> {
        v.iter().copied().map(ObjectId).collect()
    }

    fn position(order: &[ObjectId], id: u32) -> usize {
        order.iter().position(|o| o.0 == id).unwrap()
    }

    #[test]
    fn parents_precede_children() {
        // 0 -> 1 -> 3, 0 -> 2 -> 3
        let edges: Vec<Vec<ObjectId>> = vec![ids(&[1, 2]), ids(&[3]), ids(&[3]), vec![]];
        let order = sort_dependencies(&ids(&[0, 1, 2, 3]), |id| edges[id.index()].as_slice()).unwrap();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], ObjectId(0));
        assert!(position(&order, 1) < position(&order, 3));
        assert!(position(&order, 2) < position(&order, 3));
    }

    #[test]
    fn detached_nodes_are_still_ordered() {
        let edges: Vec<Vec<ObjectId>> = vec![vec![], ids(&[2]), vec![]];
        let order = sort_dependencies(&ids(&[0, 1, 2]), |id| edges[id.index()].as_slice()).unwrap();
        assert_eq!(order, ids(&[0, 1, 2]));
    }

    #[test]
    fn cycle_is_rejected() {
        let edges: Vec<Vec<ObjectId>> = vec![ids(&[1]), ids(&[2]), ids(&[1])];
        let err = sort_dependencies(&ids(&[0, 1, 2]), |id| edges[id.index()].as_slice()).unwrap_err();
        assert!(matches!(err, GraphError::Cycle { .. }));
    }
}
