// src/gui.rs
use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use std::sync::mpsc::{channel, sync_channel, Receiver, Sender};
use std::time::Duration;
use crate::config::ScopeConfig;
use crate::drivers::{CaptureVariant, CaptureView, DecodedCapture, PipelineStats, DISPLAY_RESOLUTION};
use crate::engine;
use crate::types::*;

const SERIES_COLORS: [Color32; 2] = [Color32::YELLOW, Color32::from_rgb(0, 255, 255)];
const MAX_LOG_LINES: usize = 8;

pub struct ScopeApp {
    // connection state
    is_connected: bool,
    is_streaming: bool,
    connection_mode: ConnectionMode,
    host: String,
    port_text: String,
    sim_variant: CaptureVariant,

    // display
    show_channel: [bool; 2],
    last_capture: Option<DecodedCapture>,
    stats: PipelineStats,
    log_messages: Vec<String>,

    // engine pipes
    rx: Receiver<ScopeMessage>,
    rx_capture: Receiver<DecodedCapture>,
    tx_cmd: Sender<GuiCommand>,
    fatal: FatalSlot,
}

impl ScopeApp {
    pub fn new(config: ScopeConfig, fatal: FatalSlot) -> Self {
        let (tx, rx) = channel();
        // Rendezvous: the engine cannot trigger again until update() takes the frame.
        let (tx_capture, rx_capture) = sync_channel(0);
        let (tx_cmd, rx_cmd) = channel();
        // The engine thread lives until this app (and its channel ends) is dropped.
        engine::spawn_thread(tx, tx_capture, rx_cmd, config.clone());
        Self::with_channels(&config, rx, rx_capture, tx_cmd, fatal)
    }

    fn with_channels(
        config: &ScopeConfig,
        rx: Receiver<ScopeMessage>,
        rx_capture: Receiver<DecodedCapture>,
        tx_cmd: Sender<GuiCommand>,
        fatal: FatalSlot,
    ) -> Self {
        let host = config.host.clone();
        let port_text = config.port.to_string();
        let sim_variant = config.simulation_variant.into();
        let connection_mode = if host.is_empty() {
            ConnectionMode::Simulation
        } else {
            ConnectionMode::Hardware
        };
        Self {
            is_connected: false,
            is_streaming: false,
            connection_mode,
            host,
            port_text,
            sim_variant,
            show_channel: [true, true],
            last_capture: None,
            stats: PipelineStats::default(),
            log_messages: vec!["OwonScope ready.".to_owned()],
            rx,
            rx_capture,
            tx_cmd,
            fatal,
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > MAX_LOG_LINES {
            self.log_messages.remove(0);
        }
    }

    fn send(&mut self, cmd: GuiCommand) {
        if self.tx_cmd.send(cmd).is_err() {
            self.log("engine stopped");
        }
    }

    fn request_connect(&mut self) {
        let port = match self.port_text.trim().parse::<u16>() {
            Ok(p) => p,
            Err(_) if self.connection_mode == ConnectionMode::Simulation => 0,
            Err(_) => {
                self.log(&format!("invalid port '{}'", self.port_text));
                return;
            }
        };
        let host = self.host.trim().to_owned();
        if self.connection_mode == ConnectionMode::Hardware && host.is_empty() {
            self.log("enter the oscilloscope IP address");
            return;
        }
        self.send(GuiCommand::Connect {
            mode: self.connection_mode,
            host,
            port,
        });
    }

    /// Returns true once the engine has reported a fatal error.
    fn drain_messages(&mut self) -> bool {
        let mut fatal = false;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                ScopeMessage::Log(s) => self.log(&s),
                ScopeMessage::Status(b) => {
                    self.is_connected = b;
                    if !b {
                        self.is_streaming = false;
                    }
                }
                ScopeMessage::Streaming(b) => self.is_streaming = b,
                ScopeMessage::Stats(stats) => self.stats = stats,
                ScopeMessage::Fatal(reason) => {
                    self.log(&format!("❌ {reason}"));
                    self.is_connected = false;
                    self.is_streaming = false;
                    if let Ok(mut slot) = self.fatal.lock() {
                        *slot = Some(reason);
                    }
                    fatal = true;
                }
            }
        }
        if let Ok(capture) = self.rx_capture.try_recv() {
            self.last_capture = Some(capture);
        }
        fatal
    }

    fn connection_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_enabled_ui(!self.is_connected, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.connection_mode, ConnectionMode::Simulation, "SIM");
                ui.selectable_value(&mut self.connection_mode, ConnectionMode::Hardware, "REAL");
            });
            if self.connection_mode == ConnectionMode::Hardware {
                ui.horizontal(|ui| {
                    ui.label("Host");
                    ui.text_edit_singleline(&mut self.host);
                });
                ui.horizontal(|ui| {
                    ui.label("Port");
                    ui.text_edit_singleline(&mut self.port_text);
                });
            }
        });

        if self.connection_mode == ConnectionMode::Simulation {
            let before = self.sim_variant;
            egui::ComboBox::from_label("Sim frame")
                .selected_text(self.sim_variant.label())
                .show_ui(ui, |ui| {
                    for variant in CaptureVariant::ALL {
                        ui.selectable_value(&mut self.sim_variant, variant, variant.label());
                    }
                });
            if before != self.sim_variant {
                self.send(GuiCommand::SetSimVariant(self.sim_variant));
            }
        }

        let btn_txt = if self.is_connected { "DISCONNECT" } else { "CONNECT" };
        if ui.button(btn_txt).clicked() {
            if self.is_connected {
                self.send(GuiCommand::Disconnect);
            } else {
                self.request_connect();
            }
        }

        if self.is_connected {
            let stream_btn = if self.is_streaming { "STOP" } else { "RUN" };
            if ui.button(stream_btn).clicked() {
                if self.is_streaming {
                    self.send(GuiCommand::StopStream);
                } else {
                    self.send(GuiCommand::StartStream);
                }
            }
        }
    }

    fn stats_panel(&self, ui: &mut egui::Ui) {
        ui.label(format!("Decoded: {}", self.stats.frames_decoded));
        ui.label(format!("Rejected: {}", self.stats.frames_rejected));
        if let Some(variant) = self.stats.last_variant {
            ui.label(format!("Last frame: {}", variant.label()));
        }
        if let Some(len) = self.stats.last_rejected_len {
            ui.label(egui::RichText::new(format!("Last bad length: {len}")).color(Color32::YELLOW));
        }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. engine messages
        if self.drain_messages() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        let repaint = if self.is_streaming { 30 } else { 200 };
        ctx.request_repaint_after(Duration::from_millis(repaint));

        // 2. side panel
        egui::SidePanel::left("controls").min_width(240.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("OwonScope");
            ui.separator();
            self.connection_panel(ui);

            ui.add_space(15.0);
            ui.label("CHANNELS");
            ui.checkbox(&mut self.show_channel[0], "CH1");
            ui.checkbox(&mut self.show_channel[1], "CH2");

            ui.add_space(15.0);
            ui.separator();
            self.stats_panel(ui);

            ui.add_space(10.0);
            egui::ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        // 3. live plot
        let view = self
            .last_capture
            .as_ref()
            .map(|capture| CaptureView::from_capture(capture, self.show_channel));
        egui::CentralPanel::default().show(ctx, |ui| {
            match &view {
                Some(v) => ui.label(v.title.as_str()),
                None if self.is_connected => ui.label("Waiting for a frame..."),
                None => ui.label("Connect first."),
            };
            Plot::new("scope_plot")
                .legend(Legend::default())
                .include_x(0.0)
                .include_x(DISPLAY_RESOLUTION as f64)
                .include_y(i8::MIN as f64)
                .include_y(i8::MAX as f64)
                .show(ui, |plot_ui| {
                    let Some(view) = &view else {
                        return;
                    };
                    for series in view.visible_series() {
                        plot_ui.line(
                            Line::new(PlotPoints::new(series.points.clone()))
                                .name(&series.name)
                                .color(SERIES_COLORS[series.channel]),
                        );
                    }
                });
        });
    }
}
