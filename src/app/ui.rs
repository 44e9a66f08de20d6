use eframe::egui::{self, Context, Slider};

use crate::theme::ThemeMode;

use super::{ChainIndicator, LinkStatus, SwarmScopeApp};

impl SwarmScopeApp {
    pub(in crate::app) fn show_side_panel(&mut self, ctx: &Context) {
        egui::SidePanel::left("status-panel")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("swarmscope");
                ui.add_space(8.0);

                let (text, color) = match self.link {
                    LinkStatus::Waiting => ("polling", self.palette.text_muted),
                    LinkStatus::Connected => ("connected", self.palette.link_up),
                    LinkStatus::Disconnected => ("disconnected", self.palette.link_down),
                };
                ui.horizontal(|ui| {
                    ui.label("backend:");
                    ui.colored_label(color, text);
                });
                ui.horizontal(|ui| {
                    ui.label(format!("{} nodes", self.store.nodes().len()));
                    ui.label(format!("{} edges", self.store.edges().len()));
                });

                ui.separator();
                self.show_job_state(ui);

                ui.separator();
                self.show_chain_strip(ui);

                ui.separator();
                let switch_label = match self.theme {
                    ThemeMode::Dark => "Switch to light theme",
                    ThemeMode::Light => "Switch to dark theme",
                };
                if ui.button(switch_label).clicked() {
                    self.toggle_theme(ctx);
                }
                ui.checkbox(&mut self.reduce_motion, "Reduce motion");

                ui.separator();
                ui.collapsing("Simulation", |ui| {
                    ui.add(
                        Slider::new(&mut self.sim.repulsion, 0.0..=10_000.0).text("repulsion"),
                    );
                    ui.add(Slider::new(&mut self.sim.spring, 0.0..=0.02).text("spring"));
                    ui.add(
                        Slider::new(&mut self.sim.rest_length, 40.0..=320.0).text("rest length"),
                    );
                    ui.add(Slider::new(&mut self.sim.damping, 0.5..=0.99).text("damping"));
                    ui.add(
                        Slider::new(&mut self.sim.anchor_gravity, 0.0..=0.01)
                            .text("anchor gravity"),
                    );
                    ui.add(
                        Slider::new(&mut self.sim.drift_gravity, 0.0..=0.01)
                            .text("drift gravity"),
                    );
                });
            });
    }

    fn show_job_state(&self, ui: &mut egui::Ui) {
        let Some(job) = self.store.job_state() else {
            ui.label("no job state yet");
            return;
        };

        egui::Grid::new("job-state").num_columns(2).show(ui, |ui| {
            ui.label("epoch");
            ui.label(format!("{} / {}", job.current_epoch, job.total_epochs));
            ui.end_row();
            ui.label("updates");
            ui.label(job.updates_submitted.to_string());
            ui.end_row();
            ui.label("validations");
            ui.label(job.validations_completed.to_string());
            ui.end_row();
            ui.label("aggregations");
            ui.label(job.aggregations_done.to_string());
            ui.end_row();
        });
    }

    fn show_chain_strip(&self, ui: &mut egui::Ui) {
        match &self.chain {
            ChainIndicator::Probing => {
                ui.label("chain: probing");
            }
            ChainIndicator::Offline => {
                ui.horizontal(|ui| {
                    ui.label("chain:");
                    ui.colored_label(self.palette.link_down, "offline");
                });
            }
            ChainIndicator::Status(status) => {
                egui::Grid::new("chain-strip").num_columns(2).show(ui, |ui| {
                    ui.label("chain id");
                    ui.label(&status.chain_id);
                    ui.end_row();
                    ui.label("block");
                    ui.label(status.block_number.to_string());
                    ui.end_row();
                    ui.label("block time");
                    ui.label(format_block_time(status.block_time));
                    ui.end_row();
                    ui.label("accounts");
                    ui.label(status.accounts.to_string());
                    ui.end_row();
                });
            }
        }
    }
}

fn format_block_time(timestamp: Option<u64>) -> String {
    timestamp
        .and_then(|seconds| chrono::DateTime::from_timestamp(seconds as i64, 0))
        .map(|moment| moment.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "—".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_time_formats_or_dashes() {
        assert_eq!(format_block_time(None), "—");
        assert_eq!(format_block_time(Some(0)), "1970-01-01 00:00:00");
    }
}
