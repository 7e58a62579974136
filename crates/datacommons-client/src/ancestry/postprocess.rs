//! Shapes a finished ancestry map into a flat list or a tree

use std::collections::{HashSet, VecDeque};

use crate::ancestry::types::{AncestryMap, AncestryTree, Parent, ParentType};

/// Every ancestor of `start` in breadth-first discovery order.
///
/// A dcid reached along several paths is kept at its first position, and
/// `start` itself is never listed even if the map loops back to it.
pub fn flatten(start: &str, ancestry: &AncestryMap) -> Vec<Parent> {
    let mut seen: HashSet<&str> = HashSet::from([start]);
    let mut queue: VecDeque<&str> = VecDeque::from([start]);
    let mut flat = Vec::new();

    while let Some(dcid) = queue.pop_front() {
        let parents = ancestry.get(dcid).map(Vec::as_slice).unwrap_or_default();
        for parent in parents {
            if seen.insert(parent.dcid.as_str()) {
                flat.push(parent.clone());
                queue.push_back(parent.dcid.as_str());
            }
        }
    }

    flat
}

/// Nested ancestry of `start`, one branch per path.
///
/// Diamond-shaped ancestries repeat the shared subtree under each path.
/// A dcid already on the current path is emitted as a leaf so cyclic maps
/// still produce a finite tree.
pub fn to_tree(start: &str, ancestry: &AncestryMap) -> AncestryTree {
    let mut path = Vec::new();
    build_node(start, None, None, ancestry, &mut path)
}

fn build_node<'a>(
    dcid: &'a str,
    name: Option<String>,
    entity_type: Option<ParentType>,
    ancestry: &'a AncestryMap,
    path: &mut Vec<&'a str>,
) -> AncestryTree {
    let mut node = AncestryTree {
        dcid: dcid.to_string(),
        name,
        entity_type,
        parents: Vec::new(),
    };

    if path.contains(&dcid) {
        return node;
    }

    path.push(dcid);
    for parent in ancestry.get(dcid).into_iter().flatten() {
        node.parents.push(build_node(
            &parent.dcid,
            parent.name.clone(),
            Some(parent.type_field()),
            ancestry,
            path,
        ));
    }
    path.pop();

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use datacommons_models::OneOrMany;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parent(dcid: &str) -> Parent {
        Parent::new(dcid, Some(dcid), &["Place"])
    }

    fn map(edges: &[(&str, &[&str])]) -> AncestryMap {
        edges
            .iter()
            .map(|(child, parents)| (child.to_string(), parents.iter().map(|p| parent(p)).collect()))
            .collect()
    }

    #[test]
    fn test_flatten_of_root_is_empty() {
        let ancestry = map(&[("start", &[])]);
        assert!(flatten("start", &ancestry).is_empty());
    }

    #[test]
    fn test_flatten_keeps_first_discovery_of_shared_grandparent() {
        let ancestry = map(&[
            ("A", &["P1", "P2"]),
            ("P1", &["G", "X"]),
            ("P2", &["Y", "G"]),
            ("G", &[]),
            ("X", &[]),
            ("Y", &[]),
        ]);

        let dcids: Vec<String> = flatten("A", &ancestry).into_iter().map(|p| p.dcid).collect();
        assert_eq!(dcids, vec!["P1", "P2", "G", "X", "Y"]);
    }

    #[test]
    fn test_flatten_excludes_start_in_a_cycle() {
        let ancestry = map(&[("A", &["B"]), ("B", &["A"])]);
        let flat = flatten("A", &ancestry);
        assert_eq!(flat, vec![parent("B")]);
    }

    #[test]
    fn test_tree_shape_of_a_chain() {
        let ancestry = map(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]);
        let tree = to_tree("A", &ancestry);

        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "dcid": "A", "name": null, "type": null,
                "parents": [{
                    "dcid": "B", "name": "B", "type": "Place",
                    "parents": [{"dcid": "C", "name": "C", "type": "Place", "parents": []}]
                }]
            })
        );
    }

    #[test]
    fn test_tree_of_root_has_no_parents() {
        let tree = to_tree("start", &map(&[("start", &[])]));
        assert_eq!(tree.dcid, "start");
        assert!(tree.parents.is_empty());
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn test_tree_repeats_shared_ancestor_per_path() {
        let ancestry = map(&[
            ("A", &["P1", "P2"]),
            ("P1", &["G"]),
            ("P2", &["G"]),
            ("G", &["Earth"]),
            ("Earth", &[]),
        ]);

        let tree = to_tree("A", &ancestry);

        assert_eq!(tree.size(), 7);
        assert_eq!(tree.parents[0].parents[0].dcid, "G");
        assert_eq!(tree.parents[1].parents[0].dcid, "G");
        assert_eq!(tree.parents[1].parents[0].parents[0].dcid, "Earth");
    }

    #[test]
    fn test_tree_of_cyclic_map_is_finite() {
        let ancestry = map(&[("A", &["B"]), ("B", &["A"])]);
        let tree = to_tree("A", &ancestry);

        assert_eq!(tree.size(), 3);
        let repeated = &tree.parents[0].parents[0];
        assert_eq!(repeated.dcid, "A");
        assert!(repeated.parents.is_empty());
    }

    #[test]
    fn test_tree_type_lists_several_types() {
        let mut ancestry = AncestryMap::new();
        ancestry.insert(
            "geoId/06085".into(),
            vec![Parent::new("geoId/06", Some("California"), &["State", "AdministrativeArea1"])],
        );
        let tree = to_tree("geoId/06085", &ancestry);

        assert_eq!(
            tree.parents[0].entity_type,
            Some(OneOrMany::Many(vec!["State".to_string(), "AdministrativeArea1".to_string()]))
        );
    }
}
