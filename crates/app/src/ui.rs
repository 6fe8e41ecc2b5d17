use eframe::egui::{self, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use fundmap_core::color::Color;
use fundmap_core::legend::{LABEL_OFFSET, SWATCH_SIZE};
use fundmap_core::loader::LoadMsg;

use crate::state::AppState;

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_load(app, ctx);

    if app.is_loading() {
        ctx.request_repaint();
    }

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::TopBottomPanel::bottom("legend")
        .exact_height(app.legend.height as f32)
        .show(ctx, |ui| {
            legend(ui, app);
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading(&app.config.title);
        ui.label(&app.config.description);
        ui.separator();
        if app.is_loading() {
            ui.spinner();
        } else if let Some(err) = &app.error {
            ui.colored_label(Color32::RED, err);
        }
        chart(ui, app);
    });

    tooltip(ctx, app);
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("Open File").clicked() {
            if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
                app.source = path.display().to_string();
                app.start_load();
            }
        }
        ui.label("Source:");
        let resp = ui.text_edit_singleline(&mut app.source);
        let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Load").clicked() || submitted {
            app.start_load();
        }
        ui.separator();
        ui.label("Search:");
        if ui.text_edit_singleline(&mut app.search).changed() {
            app.update_search();
        }
    });
}

fn fill(c: Color) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

fn chart(ui: &mut Ui, app: &mut AppState) {
    let size = Vec2::new(app.chart.width as f32, app.chart.height as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let dimmed: Vec<bool> = app
        .session
        .as_ref()
        .map(|s| (0..s.tiles.len()).map(|i| app.is_dimmed(i)).collect())
        .unwrap_or_default();
    let Some(session) = app.session.as_mut() else {
        return;
    };

    for (i, t) in session.tiles.iter().enumerate() {
        let rect = Rect::from_min_max(
            origin + Vec2::new(t.rect.x0 as f32, t.rect.y0 as f32),
            origin + Vec2::new(t.rect.x1 as f32, t.rect.y1 as f32),
        );
        let mut color = fill(t.fill);
        if dimmed[i] {
            color = color.gamma_multiply(0.35);
        }
        painter.rect_filled(rect, 0.0, color);
        if session.hovered() == Some(i) {
            painter.rect_stroke(rect, 0.0, Stroke::new(2.0, Color32::WHITE));
        }
        for line in &t.label {
            // label offsets are text baselines
            painter.text(
                rect.min + Vec2::new(line.x as f32, line.y as f32),
                egui::Align2::LEFT_BOTTOM,
                &line.text,
                FontId::proportional(10.0),
                Color32::BLACK,
            );
        }
    }

    match response.hover_pos() {
        Some(pos) => {
            let local = pos - origin;
            session.pointer_move(local.x as f64, local.y as f64, pos.x as f64, pos.y as f64);
        }
        None => session.pointer_exit(),
    }
}

fn legend(ui: &mut Ui, app: &AppState) {
    let size = Vec2::new(app.legend.width as f32, app.legend.height as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let Some(session) = &app.session else {
        return;
    };
    for e in &session.legend {
        let min = origin + Vec2::new(e.x as f32, e.y as f32);
        let swatch = Rect::from_min_size(min, Vec2::splat(SWATCH_SIZE as f32));
        painter.rect_filled(swatch, 0.0, fill(e.fill));
        painter.text(
            min + Vec2::new(LABEL_OFFSET.0 as f32, LABEL_OFFSET.1 as f32),
            egui::Align2::LEFT_CENTER,
            &e.category,
            FontId::proportional(12.0),
            ui.visuals().text_color(),
        );
    }
}

fn tooltip(ctx: &egui::Context, app: &AppState) {
    let Some(session) = &app.session else {
        return;
    };
    let state = session.tooltip().state();
    if !state.is_visible() {
        return;
    }
    egui::Area::new(egui::Id::new("tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(Pos2::new(state.x as f32, state.y as f32))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .multiply_with_opacity(state.opacity as f32)
                .show(ui, |ui| {
                    let mut lines = state.lines();
                    if let Some(name) = lines.next() {
                        ui.strong(name);
                    }
                    if let Some(category) = lines.next() {
                        ui.label(egui::RichText::new(category).italics());
                    }
                    for rest in lines {
                        ui.label(rest);
                    }
                });
        });
}

fn poll_load(app: &mut AppState, ctx: &egui::Context) {
    let Some(rx) = app.load_rx.take() else { return; };
    match rx.try_recv() {
        Ok(LoadMsg::Done(data)) => {
            app.render(&data);
            ctx.request_repaint();
        }
        Ok(LoadMsg::Error(_)) => {
            // logged by the worker; the chart stays blank
            ctx.request_repaint();
        }
        Err(crossbeam_channel::TryRecvError::Empty) => {
            app.load_rx = Some(rx);
        }
        Err(crossbeam_channel::TryRecvError::Disconnected) => {}
    }
}
