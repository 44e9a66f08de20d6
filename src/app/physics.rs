use eframe::egui::Vec2;

use crate::client::NodeKind;

use super::store::GraphStore;

/// Integrator constants. The defaults reproduce the reference layout feel;
/// every one of them is surfaced as a slider in the side panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct SimConfig {
    /// Pairwise repulsion magnitude, applied as `repulsion / d²`.
    pub(in crate::app) repulsion: f32,
    /// Linear spring constant along resolved edges.
    pub(in crate::app) spring: f32,
    /// Spring rest length in view units.
    pub(in crate::app) rest_length: f32,
    /// Per-tick velocity decay, < 1.
    pub(in crate::app) damping: f32,
    /// Center pull for orchestrator and contract nodes.
    pub(in crate::app) anchor_gravity: f32,
    /// Center pull for everything else, weak enough to let workers cluster
    /// around their edges instead of the middle.
    pub(in crate::app) drift_gravity: f32,
    /// Keep-out border inside the view bounds.
    pub(in crate::app) margin: f32,
    /// Distance floor guarding the repulsion term against coincident nodes.
    pub(in crate::app) min_distance: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            repulsion: 3000.0,
            spring: 0.004,
            rest_length: 140.0,
            damping: 0.88,
            anchor_gravity: 0.003,
            drift_gravity: 0.001,
            margin: 50.0,
            min_distance: 1.0,
        }
    }
}

fn gravity_for(kind: NodeKind, config: &SimConfig) -> f32 {
    match kind {
        NodeKind::Orchestrator | NodeKind::Contract => config.anchor_gravity,
        NodeKind::Trainer | NodeKind::Validator | NodeKind::Other => config.drift_gravity,
    }
}

/// Advances every node by one explicit Euler step: accumulate repulsion,
/// gravity and spring forces, decay velocity, integrate, clamp into bounds.
/// Edges with an unresolved endpoint contribute nothing. Clamping does not
/// zero velocity; a node pushed against the border re-enters on its own.
pub(in crate::app) fn step_simulation(store: &mut GraphStore, config: &SimConfig) {
    let bounds = store.bounds();
    let center = store.center();
    let resolved = store.resolved_edges();
    let nodes = store.nodes_mut();
    let count = nodes.len();
    if count == 0 {
        return;
    }

    let mut forces = vec![Vec2::ZERO; count];

    for i in 0..count {
        forces[i] += (center - nodes[i].pos) * gravity_for(nodes[i].kind, config);

        for j in (i + 1)..count {
            let delta = nodes[i].pos - nodes[j].pos;
            let distance = delta.length().max(config.min_distance);
            let push = delta / distance * (config.repulsion / (distance * distance));
            forces[i] += push;
            forces[j] -= push;
        }
    }

    for &(source, target) in &resolved {
        if source == target {
            continue;
        }
        let delta = nodes[target].pos - nodes[source].pos;
        let distance = delta.length().max(config.min_distance);
        let pull = delta / distance * ((distance - config.rest_length) * config.spring);
        forces[source] += pull;
        forces[target] -= pull;
    }

    let low = Vec2::splat(config.margin);
    let high = (bounds - Vec2::splat(config.margin)).max(low);
    for (node, force) in nodes.iter_mut().zip(forces) {
        node.vel = (node.vel + force) * config.damping;
        node.pos += node.vel;
        node.pos = node.pos.clamp(low, high);
    }
}
