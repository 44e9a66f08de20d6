use eframe::egui::{Align2, Color32, CursorIcon, FontId, Painter, Pos2, Sense, Stroke, Ui, vec2};

use crate::client::NodeKind;
use crate::theme::NodeColors;

use super::SwarmScopeApp;
use super::interaction::{hit_test, show_tooltip, tooltip_text};
use super::physics::step_simulation;
use super::render_utils::{
    draw_dashed_ring, draw_glow, fade, quad_bezier_point, shade, three_stop,
};

const EDGE_SEGMENTS: usize = 16;
const FRAME_STEP: f32 = 0.016;

fn base_radius(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::Orchestrator => 22.0,
        NodeKind::Contract => 18.0,
        NodeKind::Trainer | NodeKind::Validator | NodeKind::Other => 14.0,
    }
}

impl SwarmScopeApp {
    fn node_colors(&self, kind: NodeKind) -> &NodeColors {
        match kind {
            NodeKind::Orchestrator => &self.palette.orchestrator,
            NodeKind::Contract => &self.palette.contract,
            NodeKind::Trainer => &self.palette.trainer,
            NodeKind::Validator => &self.palette.validator,
            NodeKind::Other => &self.palette.fallback,
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);

        self.store.set_bounds(rect.size());
        self.ambient.ensure_size(rect.size());

        let motion = !self.reduce_motion;
        if motion {
            self.time += FRAME_STEP;
            self.ambient.step();
            step_simulation(&mut self.store, &self.sim);
        } else if self.static_layout_revision != self.store.revision() {
            // One synchronous pass per snapshot keeps the layout readable
            // without a continuous animation loop.
            step_simulation(&mut self.store, &self.sim);
            self.static_layout_revision = self.store.revision();
        }

        // Hover resolves against the freshly integrated positions so the
        // highlight applies in the same frame.
        let pointer = response.hover_pos();
        self.hovered = pointer.and_then(|pos| {
            hit_test(&self.store, pos - rect.min)
                .map(|index| self.store.nodes()[index].id.clone())
        });

        self.draw_wash(&painter, rect.center(), rect.width());
        self.ambient.draw(&painter, rect.min, &self.palette, self.time);
        self.draw_edges(&painter, rect.min, motion);
        self.draw_nodes(&painter, rect.min);

        if let Some(pos) = pointer
            && let Some(id) = self.hovered.clone()
            && let Some(node) = self.store.get(&id)
        {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::PointingHand);
            show_tooltip(ui.ctx(), pos, &tooltip_text(node));
        }

        if motion {
            ui.ctx().request_repaint();
        }
    }

    fn draw_wash(&self, painter: &Painter, center: Pos2, width: f32) {
        painter.circle_filled(center, width * 0.7, self.palette.wash_outer);
        painter.circle_filled(center, width * 0.35, self.palette.wash_inner);
    }

    fn draw_edges(&self, painter: &Painter, origin: Pos2, motion: bool) {
        for edge in self.store.edges() {
            let Some((source, target)) = self.store.resolve(edge) else {
                continue;
            };

            let start = origin + self.store.nodes()[source].pos;
            let end = origin + self.store.nodes()[target].pos;
            let mid = start + (end - start) * 0.5;
            let chord = end - start;
            let control = mid + vec2(-chord.y, chord.x) * 0.1;

            let width = (1.0 + edge.count as f32 * 0.2).min(3.0);
            let pulse = ((self.time * 2.0 + edge.count as f32).sin() + 1.0) * 0.5;
            let mid_stop = Color32::from_rgba_unmultiplied(
                self.palette.edge_stop_b.r(),
                self.palette.edge_stop_b.g(),
                self.palette.edge_stop_b.b(),
                ((0.4 + pulse * 0.3) * 255.0) as u8,
            );

            let mut previous = start;
            for segment in 1..=EDGE_SEGMENTS {
                let t = segment as f32 / EDGE_SEGMENTS as f32;
                let point = quad_bezier_point(start, control, end, t);
                let color = three_stop(
                    self.palette.edge_stop_a,
                    mid_stop,
                    self.palette.edge_stop_c,
                    t - 0.5 / EDGE_SEGMENTS as f32,
                );
                painter.line_segment([previous, point], Stroke::new(width, color));
                previous = point;
            }

            if motion {
                let t = (self.time * 0.5 + edge.count as f32 * 0.3).fract();
                let point = quad_bezier_point(start, control, end, t);
                let strength = 1.0 - (t - 0.5).abs() * 2.0;
                painter.circle_filled(point, 3.0, fade(self.palette.edge_particle, strength));
            }

            if edge.count > 1 {
                painter.text(
                    mid + vec2(8.0, -8.0),
                    Align2::LEFT_CENTER,
                    format!("×{}", edge.count),
                    FontId::proportional(10.0),
                    self.palette.text_muted,
                );
            }
        }
    }

    fn draw_nodes(&self, painter: &Painter, origin: Pos2) {
        for node in self.store.nodes() {
            let colors = self.node_colors(node.kind);
            let status_color = self
                .palette
                .status_color(&node.status)
                .unwrap_or(colors.fill);
            let is_hovered = self.hovered.as_deref() == Some(node.id.as_str());

            let pulse_scale = 1.0 + (self.time * 2.0 + node.pulse_phase).sin() * 0.05;
            let radius = base_radius(node.kind) * if is_hovered { 1.2 } else { pulse_scale };
            let center = origin + node.pos;

            draw_glow(painter, center, radius, colors.glow);

            if node.has_status_decoration() {
                draw_dashed_ring(
                    painter,
                    center,
                    radius + 6.0,
                    Stroke::new(2.0, status_color),
                    4.0,
                    4.0,
                    -self.time * 20.0,
                );
            }

            self.draw_node_body(painter, center, radius, colors.fill);

            painter.circle_stroke(
                center,
                radius,
                Stroke::new(
                    if is_hovered { 2.0 } else { 1.0 },
                    if is_hovered {
                        self.palette.hover_border
                    } else {
                        self.palette.node_border
                    },
                ),
            );

            painter.text(
                center + vec2(0.0, radius + 18.0),
                Align2::CENTER_CENTER,
                &node.label,
                FontId::proportional(12.0),
                self.palette.text,
            );

            if node.has_status_decoration() {
                painter.text(
                    center + vec2(0.0, radius + 32.0),
                    Align2::CENTER_CENTER,
                    &node.status,
                    FontId::proportional(10.0),
                    status_color,
                );
            }
        }
    }

    /// Shaded fill with an offset highlight, standing in for the radial
    /// fill gradient of the reference rendering.
    fn draw_node_body(&self, painter: &Painter, center: Pos2, radius: f32, fill: Color32) {
        painter.circle_filled(center, radius, shade(fill, -30.0));
        painter.circle_filled(
            center + vec2(-radius * 0.12, -radius * 0.12),
            radius * 0.85,
            fill,
        );
        painter.circle_filled(
            center + vec2(-radius * 0.25, -radius * 0.25),
            radius * 0.3,
            Color32::from_rgba_unmultiplied(255, 255, 255, 102),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radii_rank_orchestrator_above_contract_above_workers() {
        assert!(base_radius(NodeKind::Orchestrator) > base_radius(NodeKind::Contract));
        assert!(base_radius(NodeKind::Contract) > base_radius(NodeKind::Trainer));
        assert_eq!(base_radius(NodeKind::Trainer), base_radius(NodeKind::Validator));
    }
}
