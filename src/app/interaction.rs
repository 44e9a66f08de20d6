use eframe::egui::{self, Context, Pos2, Vec2, vec2};

use super::store::{GraphStore, NodeRecord};

/// Pointer-to-node pickup distance in pixels.
pub(in crate::app) const HOVER_RADIUS: f32 = 30.0;

const TOOLTIP_OFFSET: Vec2 = vec2(16.0, -8.0);

/// Nearest node within [`HOVER_RADIUS`] of the pointer, in view-local
/// coordinates. The closest one wins; exact ties fall to iteration order.
pub(in crate::app) fn hit_test(store: &GraphStore, pointer: Vec2) -> Option<usize> {
    let mut closest = None;
    let mut best = HOVER_RADIUS;

    for (index, node) in store.nodes().iter().enumerate() {
        let distance = (node.pos - pointer).length();
        if distance < best {
            best = distance;
            closest = Some(index);
        }
    }

    closest
}

pub(in crate::app) fn tooltip_text(node: &NodeRecord) -> String {
    if node.status.is_empty() || node.status == "active" {
        node.label.clone()
    } else {
        format!("{} [{}]", node.label, node.status)
    }
}

pub(in crate::app) fn show_tooltip(ctx: &Context, pointer: Pos2, text: &str) {
    egui::Area::new(egui::Id::new("node-tooltip"))
        .fixed_pos(pointer + TOOLTIP_OFFSET)
        .order(egui::Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(text);
            });
        });
}

#[cfg(test)]
mod tests {
    use crate::client::SnapshotPayload;

    use super::*;

    fn store_with_positions(entries: &[(&str, Vec2)]) -> GraphStore {
        let nodes = entries
            .iter()
            .map(|(id, _)| serde_json::json!({"id": id, "type": "trainer"}))
            .collect::<Vec<_>>();
        let payload: SnapshotPayload =
            serde_json::from_value(serde_json::json!({"nodes": nodes})).unwrap();
        let mut store = GraphStore::new(vec2(400.0, 300.0));
        store.merge(payload);
        for (node, (_, pos)) in store.nodes_mut().iter_mut().zip(entries) {
            node.pos = *pos;
        }
        store
    }

    #[test]
    fn pointer_beyond_threshold_hits_nothing() {
        let store = store_with_positions(&[("a", vec2(100.0, 100.0))]);
        assert_eq!(hit_test(&store, vec2(100.0, 131.0)), None);
        assert_eq!(hit_test(&store, vec2(300.0, 100.0)), None);
    }

    #[test]
    fn pointer_within_threshold_hits_the_node() {
        let store = store_with_positions(&[("a", vec2(100.0, 100.0))]);
        assert_eq!(hit_test(&store, vec2(110.0, 95.0)), Some(0));
    }

    #[test]
    fn closest_node_wins() {
        let store = store_with_positions(&[
            ("near", vec2(100.0, 100.0)),
            ("nearer", vec2(112.0, 100.0)),
        ]);
        assert_eq!(hit_test(&store, vec2(110.0, 100.0)), Some(1));
    }

    #[test]
    fn tooltip_brackets_non_active_status() {
        let mut store = store_with_positions(&[("t-0", vec2(0.0, 0.0))]);
        store.nodes_mut()[0].status = "training".to_owned();
        assert_eq!(tooltip_text(&store.nodes()[0]), "t-0 [training]");

        store.nodes_mut()[0].status = "active".to_owned();
        assert_eq!(tooltip_text(&store.nodes()[0]), "t-0");

        store.nodes_mut()[0].status = String::new();
        assert_eq!(tooltip_text(&store.nodes()[0]), "t-0");
    }
}
