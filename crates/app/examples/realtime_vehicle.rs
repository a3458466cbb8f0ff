use control::{Key, KeyboardState, combine};
use mechanics::{Channel, Simulation, Trace, VehicleConfig};
use simcore::{DrawList, Rgba, Shape, TickClock, TickConfig, Vec2, Viewport, WorldBounds};

use egui_plot::{Legend, Line, Plot, PlotPoints};
use std::time::{Duration, Instant};

// Display scaling for the overlay plot
const THROTTLE_SCALE: f64 = 200.0;
const SPEED_SCALE: f64 = 20.0;

// Left shift is read from the modifiers, egui has no key code for it
const KEYMAP: [(egui::Key, Key); 11] = [
    (egui::Key::W, Key::W),
    (egui::Key::A, Key::A),
    (egui::Key::S, Key::S),
    (egui::Key::D, Key::D),
    (egui::Key::Q, Key::Q),
    (egui::Key::E, Key::E),
    (egui::Key::Space, Key::Space),
    (egui::Key::ArrowUp, Key::ArrowUp),
    (egui::Key::ArrowDown, Key::ArrowDown),
    (egui::Key::ArrowLeft, Key::ArrowLeft),
    (egui::Key::ArrowRight, Key::ArrowRight),
];

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 900.0])
            .with_title("Realtime Kart"),
        ..Default::default()
    };
    eframe::run_native(
        "Realtime Kart",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}

struct App {
    sim: Simulation,
    clock: TickClock,
    keys: KeyboardState,
    paused: bool,
    show_vectors: bool,
    draw: DrawList,
}

impl App {
    fn new() -> Self {
        let tick = TickConfig::default();
        let sim = Simulation::new(&VehicleConfig::default(), WorldBounds::default(), tick)
            .expect("default configuration is valid");
        Self {
            sim,
            clock: TickClock::new(tick.max_frame_delta),
            keys: KeyboardState::new(),
            paused: false,
            show_vectors: true,
            draw: DrawList::new(),
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            for (egui_key, key) in KEYMAP {
                self.keys.set(key, i.key_down(egui_key));
            }
            self.keys.set(Key::ShiftLeft, i.modifiers.shift);
        });
    }

    fn line(trace: &Trace, channel: Channel, scale: f64) -> PlotPoints<'static> {
        trace
            .ticks()
            .iter()
            .zip(trace.channel(channel).iter())
            .map(|(&t, &v)| [t as f64, v * scale])
            .collect()
    }

    fn smoothed_line(trace: &Trace, channel: Channel) -> PlotPoints<'static> {
        trace
            .ticks()
            .iter()
            .zip(trace.smoothed(channel))
            .map(|(&t, v)| [t as f64, v])
            .collect()
    }

    fn draw_viewport(&mut self, ui: &mut egui::Ui, height_px: f32) {
        let desired = egui::vec2(ui.available_width(), height_px);
        let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
        let bounds = WorldBounds::default();
        let origin = response.rect.min;
        let view = Viewport::fit(
            &bounds,
            (origin.x as f64, origin.y as f64),
            (response.rect.width() as f64, response.rect.height() as f64),
        );
        let pos = |(x, y): (f64, f64)| egui::pos2(x as f32, y as f32);
        let to_screen = |p: &Vec2| pos(view.to_screen(p));
        let color = |c: Rgba| egui::Color32::from_rgba_unmultiplied(c.0, c.1, c.2, c.3);

        let extent = (view.scale * bounds.width, view.scale * bounds.height);
        painter.rect_filled(
            egui::Rect::from_min_size(origin, egui::vec2(extent.0 as f32, extent.1 as f32)),
            4.0,
            egui::Color32::from_gray(235),
        );

        self.draw.clear();
        self.sim.render(&mut self.draw);
        for shape in &self.draw.shapes {
            match shape {
                Shape::Polygon { points, fill } => {
                    // the y flip reverses winding
                    let points: Vec<egui::Pos2> = points.iter().rev().map(to_screen).collect();
                    painter.add(egui::Shape::convex_polygon(points, color(*fill), egui::Stroke::NONE));
                }
                Shape::Segment { from, to, color: c } if self.show_vectors => {
                    painter.line_segment([to_screen(from), to_screen(to)], egui::Stroke::new(1.5, color(*c)));
                }
                Shape::Segment { .. } => {}
                Shape::Text { at, text, color: c } => {
                    painter.text(
                        pos(view.text_to_screen(at)),
                        egui::Align2::LEFT_TOP,
                        text,
                        egui::FontId::monospace(12.0),
                        color(*c),
                    );
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard(ctx);
        let frame_dt = self.clock.delta(Instant::now());
        if !self.paused {
            let inputs = combine(self.keys.sample(), None);
            self.sim.advance(frame_dt, &inputs);
        }

        let snap = self.sim.snapshot();
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button(if self.paused { "▶ Resume" } else { "⏸ Pause" }).clicked() {
                    self.paused = !self.paused;
                }
                if ui.button("⟲ Reset").clicked() {
                    self.reset();
                }
                ui.checkbox(&mut self.show_vectors, "Debug vectors");

                ui.separator();
                ui.label(format!(
                    "gear {}  rpm {:.0}  shaft {:.1}  throttle {:.2}",
                    snap.gear, snap.engine_rpm, snap.shaft_rpm, snap.throttle
                ));
                ui.label(format!("pos ({:.0}, {:.0})", snap.position.x, snap.position.y));
                ui.label("Keys: A/D steer, Shift throttle, Space brake, Q/E shift");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Track");
            self.draw_viewport(ui, 520.0);

            ui.separator();
            ui.heading("Drivetrain");
            let trace = self.sim.trace();
            Plot::new("drivetrain_plot")
                .legend(Legend::default())
                .allow_scroll(false)
                .y_axis_min_width(48.0)
                .x_axis_label("Tick")
                .y_axis_label("rpm")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("engine rpm", Self::line(trace, Channel::EngineRpm, 1.0)));
                    plot_ui.line(Line::new("engine rpm (smoothed)", Self::smoothed_line(trace, Channel::EngineRpm)));
                    plot_ui.line(Line::new("shaft rpm", Self::line(trace, Channel::ShaftRpm, 1.0)));
                    plot_ui.line(Line::new("throttle", Self::line(trace, Channel::Throttle, THROTTLE_SCALE)));
                    plot_ui.line(Line::new("speed²", Self::line(trace, Channel::SpeedSq, SPEED_SCALE)));
                });
        });

        ctx.request_repaint_after(Duration::from_millis(10));
    }
}
