use eframe::egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

/// Two-valued theme flag. Persisted across sessions; everything color-related
/// is derived from it through [`Palette::for_mode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn visuals(self) -> Visuals {
        match self {
            ThemeMode::Light => Visuals::light(),
            ThemeMode::Dark => Visuals::dark(),
        }
    }

}

/// Fill and halo pair for one node role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeColors {
    pub fill: Color32,
    pub glow: Color32,
}

/// Full resolved color set for one theme mode. Rebuilt (cheaply) whenever the
/// theme toggles; node data is never touched by a rebuild.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub orchestrator: NodeColors,
    pub contract: NodeColors,
    pub trainer: NodeColors,
    pub validator: NodeColors,
    pub fallback: NodeColors,

    pub edge_stop_a: Color32,
    pub edge_stop_b: Color32,
    pub edge_stop_c: Color32,
    pub edge_particle: Color32,

    pub text: Color32,
    pub text_muted: Color32,
    pub node_border: Color32,
    pub hover_border: Color32,

    pub wash_inner: Color32,
    pub wash_outer: Color32,

    pub link_up: Color32,
    pub link_down: Color32,

    pub mesh_line_a: Color32,
    pub mesh_line_b: Color32,
    pub mesh_glow: Color32,
    pub mesh_node: Color32,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                orchestrator: NodeColors {
                    fill: Color32::from_rgb(255, 255, 255),
                    glow: Color32::from_rgba_unmultiplied(255, 255, 255, 102),
                },
                contract: NodeColors {
                    fill: Color32::from_rgb(244, 114, 182),
                    glow: Color32::from_rgba_unmultiplied(244, 114, 182, 128),
                },
                trainer: NodeColors {
                    fill: Color32::from_rgb(34, 211, 238),
                    glow: Color32::from_rgba_unmultiplied(34, 211, 238, 128),
                },
                validator: NodeColors {
                    fill: Color32::from_rgb(251, 191, 36),
                    glow: Color32::from_rgba_unmultiplied(251, 191, 36, 128),
                },
                fallback: NodeColors {
                    fill: Color32::from_rgb(148, 163, 184),
                    glow: Color32::from_rgba_unmultiplied(148, 163, 184, 77),
                },
                edge_stop_a: Color32::from_rgba_unmultiplied(99, 102, 241, 128),
                edge_stop_b: Color32::from_rgba_unmultiplied(34, 211, 238, 153),
                edge_stop_c: Color32::from_rgba_unmultiplied(244, 114, 182, 128),
                edge_particle: Color32::from_rgba_unmultiplied(34, 211, 238, 204),
                text: Color32::from_rgba_unmultiplied(255, 255, 255, 230),
                text_muted: Color32::from_rgba_unmultiplied(255, 255, 255, 128),
                node_border: Color32::from_rgba_unmultiplied(255, 255, 255, 51),
                hover_border: Color32::from_rgba_unmultiplied(255, 255, 255, 204),
                wash_inner: Color32::from_rgba_unmultiplied(99, 102, 241, 8),
                wash_outer: Color32::from_rgba_unmultiplied(34, 211, 238, 5),
                link_up: Color32::from_rgb(34, 211, 238),
                link_down: Color32::from_rgb(244, 114, 182),
                mesh_line_a: Color32::from_rgba_unmultiplied(99, 102, 241, 102),
                mesh_line_b: Color32::from_rgba_unmultiplied(34, 211, 238, 102),
                mesh_glow: Color32::from_rgba_unmultiplied(99, 102, 241, 77),
                mesh_node: Color32::from_rgba_unmultiplied(255, 255, 255, 204),
            },
            ThemeMode::Light => Self {
                orchestrator: NodeColors {
                    fill: Color32::from_rgb(26, 35, 43),
                    glow: Color32::from_rgba_unmultiplied(26, 35, 43, 77),
                },
                contract: NodeColors {
                    fill: Color32::from_rgb(255, 107, 53),
                    glow: Color32::from_rgba_unmultiplied(255, 107, 53, 102),
                },
                trainer: NodeColors {
                    fill: Color32::from_rgb(46, 196, 182),
                    glow: Color32::from_rgba_unmultiplied(46, 196, 182, 102),
                },
                validator: NodeColors {
                    fill: Color32::from_rgb(255, 200, 87),
                    glow: Color32::from_rgba_unmultiplied(255, 200, 87, 102),
                },
                fallback: NodeColors {
                    fill: Color32::from_rgb(86, 99, 114),
                    glow: Color32::from_rgba_unmultiplied(86, 99, 114, 77),
                },
                edge_stop_a: Color32::from_rgba_unmultiplied(99, 102, 241, 102),
                edge_stop_b: Color32::from_rgba_unmultiplied(46, 196, 182, 128),
                edge_stop_c: Color32::from_rgba_unmultiplied(255, 107, 53, 102),
                edge_particle: Color32::from_rgba_unmultiplied(46, 196, 182, 204),
                text: Color32::from_rgba_unmultiplied(26, 35, 43, 230),
                text_muted: Color32::from_rgba_unmultiplied(26, 35, 43, 128),
                node_border: Color32::from_rgba_unmultiplied(26, 35, 43, 51),
                hover_border: Color32::from_rgba_unmultiplied(26, 35, 43, 204),
                wash_inner: Color32::from_rgba_unmultiplied(99, 102, 241, 13),
                wash_outer: Color32::from_rgba_unmultiplied(46, 196, 182, 10),
                link_up: Color32::from_rgb(13, 148, 136),
                link_down: Color32::from_rgb(236, 72, 153),
                mesh_line_a: Color32::from_rgba_unmultiplied(46, 196, 182, 115),
                mesh_line_b: Color32::from_rgba_unmultiplied(99, 102, 241, 77),
                mesh_glow: Color32::from_rgba_unmultiplied(46, 196, 182, 77),
                mesh_node: Color32::from_rgba_unmultiplied(26, 35, 43, 179),
            },
        }
    }

    /// Status accents are shared across both modes; unknown statuses fall back
    /// to the node's role fill.
    pub fn status_color(&self, status: &str) -> Option<Color32> {
        match status {
            "active" => Some(Color32::from_rgb(34, 211, 238)),
            "idle" => Some(Color32::from_rgb(100, 116, 139)),
            "training" => Some(Color32::from_rgb(244, 114, 182)),
            "submitted" => Some(Color32::from_rgb(167, 139, 250)),
            "validating" => Some(Color32::from_rgb(251, 191, 36)),
            "requesting" => Some(Color32::from_rgb(99, 102, 241)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_palette() {
        let mode = ThemeMode::Dark;
        let original = Palette::for_mode(mode);
        let toggled_back = Palette::for_mode(mode.toggled().toggled());
        assert_eq!(original, toggled_back);
        assert_ne!(original, Palette::for_mode(mode.toggled()));
    }

    #[test]
    fn known_statuses_have_accents() {
        let palette = Palette::for_mode(ThemeMode::Light);
        for status in ["active", "idle", "training", "submitted", "validating", "requesting"] {
            assert!(palette.status_color(status).is_some(), "missing accent for {status}");
        }
        assert!(palette.status_color("hibernating").is_none());
    }
}
