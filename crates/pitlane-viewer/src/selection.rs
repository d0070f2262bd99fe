//! Writing pick results back into the graph's selection

use pitlane_core::{EntityId, Result};
use pitlane_course::CourseGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Plain click: the hit becomes the only selection, a miss clears it
    #[default]
    Replace,
    /// Modifier click: flip the hit entity, a miss changes nothing
    Toggle,
}

/// Apply a decoded pick to the selection.
///
/// A hit on an id that is no longer in the graph (the pick image is from an
/// older frame) is treated as a miss.
pub fn apply_pick(graph: &mut CourseGraph, hit: Option<EntityId>, mode: SelectMode) -> Result<()> {
    let hit = hit.filter(|id| graph.contains(*id));
    if hit.is_none() {
        log::debug!("Pick missed");
    }

    match (mode, hit) {
        (SelectMode::Replace, None) => graph.clear_selection(),
        (SelectMode::Replace, Some(id)) => {
            graph.clear_selection();
            graph.set_selected(id, true)?;
        }
        (SelectMode::Toggle, None) => {}
        (SelectMode::Toggle, Some(id)) => {
            graph.toggle_selected(id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::Vec3;
    use pitlane_course::MapObject;

    fn graph_with_objects() -> (CourseGraph, EntityId, EntityId) {
        let mut graph = CourseGraph::new();
        let a = graph.add_object(MapObject::new(Vec3::ZERO, 1)).unwrap();
        let b = graph.add_object(MapObject::new(Vec3::X, 2)).unwrap();
        (graph, a, b)
    }

    #[test]
    fn test_replace_selects_only_hit() {
        let (mut graph, a, b) = graph_with_objects();
        graph.set_selected(a, true).unwrap();
        apply_pick(&mut graph, Some(b), SelectMode::Replace).unwrap();
        assert_eq!(graph.selection(), vec![b]);
    }

    #[test]
    fn test_replace_miss_clears() {
        let (mut graph, a, _) = graph_with_objects();
        graph.set_selected(a, true).unwrap();
        apply_pick(&mut graph, None, SelectMode::Replace).unwrap();
        assert!(graph.selection().is_empty());
    }

    #[test]
    fn test_toggle_flips_and_keeps_others() {
        let (mut graph, a, b) = graph_with_objects();
        graph.set_selected(a, true).unwrap();

        apply_pick(&mut graph, Some(b), SelectMode::Toggle).unwrap();
        assert_eq!(graph.selection(), vec![a, b]);

        apply_pick(&mut graph, Some(a), SelectMode::Toggle).unwrap();
        assert_eq!(graph.selection(), vec![b]);

        apply_pick(&mut graph, None, SelectMode::Toggle).unwrap();
        assert_eq!(graph.selection(), vec![b]);
    }

    #[test]
    fn test_stale_hit_is_a_miss() {
        let (mut graph, a, _) = graph_with_objects();
        graph.set_selected(a, true).unwrap();
        apply_pick(&mut graph, Some(EntityId::from_raw(999)), SelectMode::Replace).unwrap();
        assert!(graph.selection().is_empty());
    }
}
