use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Stroke, Ui};
use salesmap_core::label::TextMeasure;
use salesmap_core::scene::{Primitive, Scene};
use salesmap_core::tooltip::Point;
use salesmap_core::{Color, DataSource, Visualization};

use crate::state::{AppState, LoadMsg};

/// Label widths measured with the UI's own fonts.
struct EguiMeasure<'a>(&'a egui::Context);

impl TextMeasure for EguiMeasure<'_> {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        self.0.fonts(|f| {
            f.layout_no_wrap(text.to_owned(), FontId::proportional(font_size), Color32::WHITE)
                .size()
                .x
        })
    }
}

fn color32(c: Color) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_load(app);
    if let Some(tree) = app.pending.take() {
        match Visualization::draw(tree, &app.config, &EguiMeasure(ctx)) {
            Ok(vis) => {
                app.scenes = Some((vis.treemap.scene(), vis.legend.scene()));
                app.vis = Some(vis);
            }
            Err(e) => {
                tracing::error!("cannot draw treemap: {e}");
                app.error = Some(e.to_string());
            }
        }
    }

    // Keep polling while the fetch is in flight
    if app.load_rx.is_some() {
        ctx.request_repaint();
    }

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Video Game Sales");
        ui.label("Top 100 most sold video games grouped by platform");
        ui.separator();

        if let Some(err) = &app.error {
            ui.colored_label(Color32::RED, format!("Error fetching data: {err}"));
            return;
        }
        let (Some(vis), Some((treemap, legend))) = (app.vis.as_mut(), app.scenes.as_ref()) else {
            if app.load_rx.is_some() {
                ui.spinner();
            }
            return;
        };

        egui::ScrollArea::both().show(ui, |ui| {
            let size = egui::vec2(treemap.width as f32, treemap.height as f32);
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
            paint_scene(ui.painter(), rect.min, treemap);

            let pointer = response
                .hover_pos()
                .map(|p| Point::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64));
            vis.treemap.pointer_moved(pointer);
            show_tooltip(ctx, rect.min, vis);

            ui.add_space(16.0);
            let size = egui::vec2(legend.width as f32, legend.height as f32);
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            paint_scene(ui.painter(), rect.min, legend);
        });
    });
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("Reload").clicked() {
            match app.source.clone() {
                Some(source) => app.start_load(source),
                None => app.load_default(),
            }
        }
        if ui.button("Open File…").clicked() {
            if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
                app.start_load(DataSource::File(path));
            }
        }
        ui.separator();
        if let Some(source) = &app.source {
            ui.label(source.to_string());
        }
        if let Some(vis) = &app.vis {
            if !vis.hierarchy.rejected.is_empty() {
                ui.separator();
                ui.label(format!("{} entries skipped (non-numeric sales)", vis.hierarchy.rejected.len()));
            }
        }
    });
}

fn paint_scene(painter: &Painter, origin: Pos2, scene: &Scene) {
    let at = |x: f64, y: f64| origin + egui::vec2(x as f32, y as f32);
    for p in &scene.primitives {
        match p {
            Primitive::Rect { bounds, fill, stroke, .. } => {
                let r = egui::Rect::from_min_max(at(bounds.x0, bounds.y0), at(bounds.x1, bounds.y1));
                let stroke = stroke.map(|c| Stroke::new(1.0, color32(c))).unwrap_or(Stroke::NONE);
                painter.rect(r, 0.0, color32(*fill), stroke);
            }
            Primitive::Text { x, y, text, font_size, fill } => {
                painter.text(
                    at(*x, *y),
                    Align2::LEFT_BOTTOM,
                    text,
                    FontId::proportional(*font_size),
                    color32(*fill),
                );
            }
        }
    }
}

fn show_tooltip(ctx: &egui::Context, origin: Pos2, vis: &Visualization) {
    let tip = vis.treemap.tooltip();
    let (Some(content), Some(anchor)) = (tip.content(), tip.anchor()) else {
        return;
    };
    let [title, system, sales] = content.lines();
    egui::Area::new(egui::Id::new("salesmap-tooltip"))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .fixed_pos(origin + egui::vec2(anchor.x as f32, anchor.y as f32))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.strong(title);
                ui.label(system);
                ui.label(sales);
            });
        });
}

fn poll_load(app: &mut AppState) {
    // Take ownership of the receiver to avoid borrowing while we might assign to it.
    let Some(rx) = app.load_rx.take() else { return; };
    match rx.try_recv() {
        Ok(LoadMsg::Done(tree)) => app.pending = Some(tree),
        Ok(LoadMsg::Error(e)) => app.fail(e),
        Err(crossbeam_channel::TryRecvError::Empty) => app.load_rx = Some(rx),
        Err(crossbeam_channel::TryRecvError::Disconnected) => {
            tracing::error!("loader thread exited without a result");
            app.error = Some("loader stopped unexpectedly".to_string());
        }
    }
}
