use eframe::{App, Frame, egui};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::log::logger::Logger;

use super::{ViewerEvent, ViewerState};

/// egui window showing the latest received frame, link stats and logs.
pub struct ViewerApp {
    rx: Receiver<ViewerEvent>,
    logger: Logger,
    state: ViewerState,
    texture: Option<egui::TextureHandle>,
    repaint: Duration,
}

impl ViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        rx: Receiver<ViewerEvent>,
        logger: Logger,
        repaint: Duration,
    ) -> Self {
        Self {
            rx,
            logger,
            state: ViewerState::new(),
            texture: None,
            repaint,
        }
    }

    fn drain(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            self.state.apply(ev);
        }
        while let Some(line) = self.logger.try_recv_ui() {
            self.state.push_log(line);
        }
    }

    fn upload(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.state.take_pending() else {
            return;
        };
        let msg = &frame.message;
        let (Ok(w), Ok(h)) = (usize::try_from(msg.width), usize::try_from(msg.height)) else {
            return;
        };
        let image = egui::ColorImage::from_rgb([w, h], &msg.pixels);
        if let Some(tex) = &mut self.texture {
            tex.set(image, Default::default());
        } else {
            self.texture = Some(ctx.load_texture("frame", image, Default::default()));
        }
    }
}

impl App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain();
        self.upload(ctx);

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_line);
                ui.separator();
                ui.label(format!("frames: {}", self.state.frames_received));
                if let Some(ms) = self.state.last_latency_ms {
                    ui.separator();
                    ui.label(format!("latency: {ms:.1} ms"));
                }
                if let Some(fmt) = &self.state.last_format {
                    ui.separator();
                    ui.label(format!("format: {fmt}"));
                }
            });
        });

        egui::TopBottomPanel::bottom("logs")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                    for line in &self.state.logs {
                        ui.monospace(line);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.texture {
                let size = tex.size_vec2();
                let avail = ui.available_size();
                let scale = (avail.x / size.x).min(avail.y / size.y).max(0.01);
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new(tex).fit_to_exact_size(size * scale));
                });
            } else {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(egui::Color32::GRAY, "No frame yet");
                });
            }
        });

        ctx.request_repaint_after(self.repaint);
    }
}
