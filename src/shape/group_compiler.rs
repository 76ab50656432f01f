use indexmap::IndexMap;
use std::collections::HashSet;

use crate::{
    ir::LogicalOp,
    shape::{CriteriaDescriptor, GroupDef, GroupDescriptor, PredicateDescriptor, ShapeError},
};

/// Reassembles the flat per-member groupings plus the group-definition table
/// into one nested predicate tree under an AND root.
pub(crate) struct GroupCompiler;

impl GroupCompiler {
    pub(crate) fn assemble<F>(
        members: Vec<(CriteriaDescriptor<F>, Option<String>)>,
        groups: &IndexMap<String, GroupDef>,
    ) -> Result<GroupDescriptor<F>, ShapeError> {
        let mut top: GroupDescriptor<F> = GroupDescriptor { op: LogicalOp::And, children: Vec::new() };

        // ungrouped pass: direct leaves of the top-level group
        let mut leaf_groups: IndexMap<String, Vec<CriteriaDescriptor<F>>> = IndexMap::new();
        for (descriptor, group) in members {
            match group {
                None => top.children.push(PredicateDescriptor::Criteria(descriptor)),
                Some(id) => leaf_groups.entry(id).or_default().push(descriptor),
            }
        }

        // grouped pass: roots are definitions never referenced as a child
        let referenced: HashSet<&str> =
            groups.values().flat_map(|def| def.children.iter().map(String::as_str)).collect();
        let mut visited: HashSet<String> = HashSet::new();
        for id in groups.keys() {
            if referenced.contains(id.as_str()) {
                continue;
            }
            let subtree =
                Self::build_group(id, groups, &mut leaf_groups, &mut visited, &mut Vec::new())?;
            top.children.push(PredicateDescriptor::Group(subtree));
        }

        // a definition cycle has no root, so its ids are never visited
        if let Some(unvisited) = groups.keys().find(|id| !visited.contains(id.as_str())) {
            return ShapeError::CyclicGroup(unvisited.clone()).err();
        }

        // leaf-groups no definition consumed form an implicit AND subgroup
        // instead of vanishing
        for (_, leaves) in leaf_groups {
            top.children.push(PredicateDescriptor::Group(GroupDescriptor {
                op: LogicalOp::And,
                children: leaves.into_iter().map(PredicateDescriptor::Criteria).collect::<Vec<_>>(),
            }));
        }

        Ok(top)
    }

    fn build_group<F>(
        id: &str,
        groups: &IndexMap<String, GroupDef>,
        leaf_groups: &mut IndexMap<String, Vec<CriteriaDescriptor<F>>>,
        visited: &mut HashSet<String>,
        stack: &mut Vec<String>,
    ) -> Result<GroupDescriptor<F>, ShapeError> {
        if stack.iter().any(|open| open == id) {
            return ShapeError::CyclicGroup(id.to_string()).err();
        }
        stack.push(id.to_string());
        visited.insert(id.to_string());

        let def = match groups.get(id) {
            Some(def) => def,
            None => {
                // callers check membership; a miss here is a dangling root
                return ShapeError::DanglingGroupChild {
                    group: id.to_string(),
                    child: id.to_string(),
                }
                .err();
            }
        };

        let mut node: GroupDescriptor<F> = GroupDescriptor { op: def.op, children: Vec::new() };

        // the definition's own collected criteria come first
        if let Some(leaves) = leaf_groups.shift_remove(id) {
            node.children.extend(leaves.into_iter().map(PredicateDescriptor::Criteria));
        }

        for child in &def.children {
            if groups.contains_key(child) {
                // another definition wins over a bare leaf list, so a child
                // that is both keeps its declared operator
                let subtree = Self::build_group(child, groups, leaf_groups, visited, stack)?;
                node.children.push(PredicateDescriptor::Group(subtree));
            } else if let Some(leaves) = leaf_groups.shift_remove(child) {
                // leaf-group: its criteria embed directly in this subtree
                node.children.extend(leaves.into_iter().map(PredicateDescriptor::Criteria));
            } else {
                return ShapeError::DanglingGroupChild {
                    group: id.to_string(),
                    child: child.clone(),
                }
                .err();
            }
        }

        if node.children.is_empty() {
            return ShapeError::EmptyGroup(id.to_string()).err();
        }

        stack.pop();
        Ok(node)
    }
}
