use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::client::{EdgeRecord, JobState, NodeInput, NodeKind, SnapshotPayload};

/// New nodes spawn inside this radius band around the view center, so they
/// never land exactly concentric with the nodes already settled there.
pub(in crate::app) const SPAWN_RADIUS_MIN: f32 = 100.0;
pub(in crate::app) const SPAWN_RADIUS_SPAN: f32 = 100.0;

/// One simulated topology node. Descriptive fields are overwritten by every
/// snapshot merge; `pos`, `vel` and `pulse_phase` belong to the simulation
/// and survive merges untouched, which is what keeps the layout continuous
/// across polling ticks.
pub(in crate::app) struct NodeRecord {
    pub(in crate::app) id: String,
    pub(in crate::app) label: String,
    pub(in crate::app) kind: NodeKind,
    pub(in crate::app) status: String,
    pub(in crate::app) pos: Vec2,
    pub(in crate::app) vel: Vec2,
    pub(in crate::app) pulse_phase: f32,
}

impl NodeRecord {
    /// Statuses other than idle/active get the animated dashed ring and the
    /// status caption under the label.
    pub(in crate::app) fn has_status_decoration(&self) -> bool {
        !matches!(self.status.as_str(), "" | "idle" | "active")
    }
}

/// The authoritative in-memory model: an index-addressed node arena keyed by
/// id, the latest edge list, and the latest job progress counters.
///
/// This is the only type allowed to create node records; the simulation gets
/// a mutable slice (no way to insert or remove), the renderer and the
/// interaction layer read shared references.
pub(in crate::app) struct GraphStore {
    nodes: Vec<NodeRecord>,
    index_by_id: HashMap<String, usize>,
    edges: Vec<EdgeRecord>,
    job_state: Option<JobState>,
    bounds: Vec2,
    revision: u64,
}

impl GraphStore {
    pub(in crate::app) fn new(bounds: Vec2) -> Self {
        Self {
            nodes: Vec::new(),
            index_by_id: HashMap::new(),
            edges: Vec::new(),
            job_state: None,
            bounds,
            revision: 0,
        }
    }

    pub(in crate::app) fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    pub(in crate::app) fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub(in crate::app) fn center(&self) -> Vec2 {
        self.bounds * 0.5
    }

    /// Reconciles one fetched snapshot into the live simulation state.
    ///
    /// Known ids keep their physical fields and take the incoming descriptive
    /// ones; unseen ids are spawned in the radius band around the center with
    /// zero velocity and a fresh pulse phase. The edge list and the job
    /// counters are replaced wholesale (an omitted `job_state` keeps the
    /// previous value). Nodes are never removed.
    pub(in crate::app) fn merge(&mut self, payload: SnapshotPayload) {
        let mut rng = rand::thread_rng();
        let center = self.center();

        for input in payload.nodes {
            match self.index_by_id.get(&input.id) {
                Some(&index) => {
                    let node = &mut self.nodes[index];
                    node.label = input.label.unwrap_or_else(|| input.id.clone());
                    node.kind = input.kind;
                    node.status = input.status.unwrap_or_default();
                }
                None => {
                    let angle = rng.gen_range(0.0..TAU);
                    let radius =
                        rng.gen_range(SPAWN_RADIUS_MIN..SPAWN_RADIUS_MIN + SPAWN_RADIUS_SPAN);
                    let index = self.nodes.len();
                    self.index_by_id.insert(input.id.clone(), index);
                    self.nodes.push(NodeRecord {
                        label: input.label.unwrap_or_else(|| input.id.clone()),
                        id: input.id,
                        kind: input.kind,
                        status: input.status.unwrap_or_default(),
                        pos: center + vec2(angle.cos(), angle.sin()) * radius,
                        vel: Vec2::ZERO,
                        pulse_phase: rng.gen_range(0.0..TAU),
                    });
                }
            }
        }

        self.edges = payload.edges;
        if payload.job_state.is_some() {
            self.job_state = payload.job_state;
        }
        self.revision = self.revision.wrapping_add(1);
    }

    pub(in crate::app) fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub(in crate::app) fn nodes_mut(&mut self) -> &mut [NodeRecord] {
        &mut self.nodes
    }

    pub(in crate::app) fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Index pair for an edge whose endpoints both exist. Dangling edges stay
    /// in the list for a later-arriving node but resolve to `None` until then.
    pub(in crate::app) fn resolve(&self, edge: &EdgeRecord) -> Option<(usize, usize)> {
        let source = *self.index_by_id.get(&edge.source)?;
        let target = *self.index_by_id.get(&edge.target)?;
        Some((source, target))
    }

    pub(in crate::app) fn resolved_edges(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .filter_map(|edge| self.resolve(edge))
            .collect()
    }

    pub(in crate::app) fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub(in crate::app) fn job_state(&self) -> Option<JobState> {
        self.job_state
    }

    pub(in crate::app) fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn node(id: &str, kind: &str, status: &str) -> NodeInput {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "type": kind,
            "status": status,
        }))
        .unwrap()
    }

    fn payload(nodes: Vec<NodeInput>, edges: Vec<EdgeRecord>) -> SnapshotPayload {
        SnapshotPayload {
            nodes,
            edges,
            job_state: None,
        }
    }

    fn edge(source: &str, target: &str) -> EdgeRecord {
        serde_json::from_value(serde_json::json!({
            "source": source,
            "target": target,
        }))
        .unwrap()
    }

    #[test]
    fn merge_preserves_physics_of_existing_nodes() {
        let mut store = GraphStore::new(vec2(400.0, 300.0));
        store.merge(payload(vec![node("T1", "trainer", "idle")], Vec::new()));

        store.nodes_mut()[0].pos = vec2(120.0, 80.0);
        let phase_before = store.nodes()[0].pulse_phase;

        store.merge(payload(vec![node("T1", "trainer", "training")], Vec::new()));

        let record = store.get("T1").unwrap();
        assert_eq!(record.pos, vec2(120.0, 80.0));
        assert_eq!(record.vel, Vec2::ZERO);
        assert_eq!(record.pulse_phase, phase_before);
        assert_eq!(record.status, "training");
        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn new_nodes_spawn_inside_the_radius_band() {
        let mut store = GraphStore::new(vec2(400.0, 300.0));
        store.merge(payload(vec![node("T9", "trainer", "idle")], Vec::new()));

        let record = store.get("T9").unwrap();
        let distance = (record.pos - vec2(200.0, 150.0)).length();
        assert!(
            distance >= SPAWN_RADIUS_MIN - 1e-3
                && distance <= SPAWN_RADIUS_MIN + SPAWN_RADIUS_SPAN + 1e-3,
            "spawned at distance {distance}"
        );
        assert_eq!(record.vel, Vec2::ZERO);
        assert!((0.0..TAU).contains(&record.pulse_phase));
    }

    #[test]
    fn dangling_edges_are_kept_but_unresolved() {
        let mut store = GraphStore::new(vec2(400.0, 300.0));
        store.merge(payload(
            vec![node("orch", "orchestrator", "active")],
            vec![edge("orch", "t-later")],
        ));

        assert_eq!(store.edges().len(), 1);
        assert!(store.resolve(&store.edges()[0]).is_none());
        assert!(store.resolved_edges().is_empty());

        store.merge(payload(
            vec![node("t-later", "trainer", "training")],
            vec![edge("orch", "t-later")],
        ));
        assert_eq!(store.resolved_edges(), vec![(0, 1)]);
    }

    #[test]
    fn edges_are_replaced_wholesale() {
        let mut store = GraphStore::new(vec2(400.0, 300.0));
        store.merge(payload(Vec::new(), vec![edge("a", "b"), edge("b", "c")]));
        assert_eq!(store.edges().len(), 2);

        store.merge(payload(Vec::new(), vec![edge("a", "b")]));
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn omitted_job_state_keeps_the_previous_value() {
        let mut store = GraphStore::new(vec2(400.0, 300.0));
        let mut with_state = payload(Vec::new(), Vec::new());
        with_state.job_state = serde_json::from_str(r#"{"current_epoch": 3, "total_epochs": 10, "updates_submitted": 7, "validations_completed": 4, "aggregations_done": 2}"#).unwrap();
        store.merge(with_state);
        assert_eq!(store.job_state().unwrap().current_epoch, 3);

        store.merge(payload(Vec::new(), Vec::new()));
        assert_eq!(store.job_state().unwrap().current_epoch, 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Merging the same node set again, in reverse order and with new
        /// statuses, must leave every physical field untouched and register
        /// each id exactly once.
        #[test]
        fn prop_remerge_is_order_independent_and_physics_preserving(
            ids in proptest::collection::hash_set("[a-z]{1,8}", 1..12),
        ) {
            let ids = ids.into_iter().collect::<Vec<_>>();
            let mut store = GraphStore::new(vec2(640.0, 480.0));
            let first = ids
                .iter()
                .map(|id| node(id, "trainer", "idle"))
                .collect::<Vec<_>>();
            store.merge(payload(first, Vec::new()));

            let before = store
                .nodes()
                .iter()
                .map(|record| (record.id.clone(), (record.pos, record.pulse_phase)))
                .collect::<std::collections::HashMap<_, _>>();

            let second = ids
                .iter()
                .rev()
                .map(|id| node(id, "trainer", "training"))
                .collect::<Vec<_>>();
            store.merge(payload(second, Vec::new()));

            prop_assert_eq!(store.nodes().len(), ids.len());
            for record in store.nodes() {
                let (pos, phase) = before[&record.id];
                prop_assert_eq!(record.pos, pos);
                prop_assert_eq!(record.pulse_phase, phase);
                prop_assert_eq!(record.status.as_str(), "training");
            }
        }
    }
}
