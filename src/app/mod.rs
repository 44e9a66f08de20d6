use std::time::Duration;

use eframe::egui::{self, Context, vec2};

use crate::client::rpc::{CHAIN_POLL_INTERVAL, ChainClient, ChainStatus, ChainUpdate, spawn_chain_poller};
use crate::client::{PollUpdate, Poller, SnapshotClient, spawn_snapshot_poller};
use crate::theme::{Palette, ThemeMode};

mod ambient;
mod interaction;
mod physics;
mod render_utils;
mod store;
mod ui;
mod view;

use ambient::AmbientField;
use physics::SimConfig;
use store::GraphStore;

const THEME_STORAGE_KEY: &str = "swarmscope-theme";

pub struct AppConfig {
    pub endpoint: String,
    pub rpc_url: String,
    pub poll_interval: Duration,
    pub reduce_motion: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LinkStatus {
    Waiting,
    Connected,
    Disconnected,
}

enum ChainIndicator {
    Probing,
    Offline,
    Status(ChainStatus),
}

/// The one application context: owns the store, the pollers, the palette and
/// every piece of view state. Constructed once at startup and handed to
/// eframe; there is no module-level mutable state anywhere in the crate.
pub struct SwarmScopeApp {
    store: GraphStore,
    sim: SimConfig,
    theme: ThemeMode,
    palette: Palette,
    link: LinkStatus,
    chain: ChainIndicator,
    snapshots: Poller<PollUpdate>,
    chain_updates: Poller<ChainUpdate>,
    ambient: AmbientField,
    hovered: Option<String>,
    reduce_motion: bool,
    time: f32,
    static_layout_revision: u64,
}

impl SwarmScopeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        let theme: ThemeMode = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, THEME_STORAGE_KEY))
            .unwrap_or_default();
        cc.egui_ctx.set_visuals(theme.visuals());

        let snapshot_client = SnapshotClient::new(&config.endpoint)?;
        let chain_client = ChainClient::new(&config.rpc_url)?;

        Ok(Self {
            // Placeholder bounds until the first frame reports the real rect;
            // the clamp pass pulls early spawns into view.
            store: GraphStore::new(vec2(980.0, 780.0)),
            sim: SimConfig::default(),
            theme,
            palette: Palette::for_mode(theme),
            link: LinkStatus::Waiting,
            chain: ChainIndicator::Probing,
            snapshots: spawn_snapshot_poller(snapshot_client, config.poll_interval),
            chain_updates: spawn_chain_poller(chain_client, CHAIN_POLL_INTERVAL),
            ambient: AmbientField::new(),
            hovered: None,
            reduce_motion: config.reduce_motion,
            time: 0.0,
            static_layout_revision: 0,
        })
    }

    /// Both pollers deliver into this, on the UI thread only, so a merge can
    /// never interleave with a simulation step. A failed poll leaves the
    /// merged state untouched: stale-but-visible beats a cleared view.
    fn drain_pollers(&mut self) {
        while let Some(update) = self.snapshots.try_recv() {
            match update {
                PollUpdate::Snapshot(payload) => {
                    self.store.merge(payload);
                    self.link = LinkStatus::Connected;
                }
                PollUpdate::Disconnected => self.link = LinkStatus::Disconnected,
            }
        }

        while let Some(update) = self.chain_updates.try_recv() {
            self.chain = match update {
                ChainUpdate::Status(status) => ChainIndicator::Status(status),
                ChainUpdate::Offline => ChainIndicator::Offline,
            };
        }
    }

    fn toggle_theme(&mut self, ctx: &Context) {
        self.theme = self.theme.toggled();
        self.palette = Palette::for_mode(self.theme);
        ctx.set_visuals(self.theme.visuals());
    }

    /// Cancels both polling threads. Called from `on_exit`, and safe to call
    /// more than once.
    pub fn shutdown(&mut self) {
        self.snapshots.shutdown();
        self.chain_updates.shutdown();
    }
}

impl eframe::App for SwarmScopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_pollers();
        self.show_side_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, THEME_STORAGE_KEY, &self.theme);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}
