use mechanics::{Simulation, TireFrictionModel, VehicleConfig};
use plotters::prelude::*;
use simcore::{ControlInputs, MechanicsModel, SimContext, TickConfig, VehicleState, WorldBounds};

fn bounds(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) }
}

fn draw_series(
    filename: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
    x: &[f64],
    series: &[(&str, &[f64], RGBColor)],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = bounds(x);
    let all_y: Vec<f64> = series.iter().flat_map(|(_, y, _)| y.iter().cloned()).collect();
    let (y_min, y_max) = bounds(&all_y);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("Arial", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc(x_label).y_desc(y_label).draw()?;

    for &(label, y, color) in series {
        chart
            .draw_series(LineSeries::new(x.iter().cloned().zip(y.iter().cloned()), &color))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
    }

    chart.configure_series_labels().border_style(&BLACK).draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = VehicleConfig::default();

    // 1) Full-throttle launch in first gear, then a shift to second at tick 300
    let mut sim = Simulation::new(&config, WorldBounds::default(), TickConfig::default())?;
    let mut ticks = Vec::new();
    let mut engine = Vec::new();
    let mut shaft = Vec::new();
    let mut speed = Vec::new();
    for i in 0..600 {
        let inputs = ControlInputs {
            right_trigger: 1.0,
            right_bumper: (300..305).contains(&i),
            ..Default::default()
        };
        sim.tick(&inputs);
        let snap = sim.snapshot();
        ticks.push(i as f64);
        engine.push(snap.engine_rpm);
        shaft.push(snap.shaft_rpm);
        speed.push(snap.velocity.norm_squared() * 10.0);
    }

    draw_series(
        "drivetrain_launch.png",
        "Full Throttle Launch",
        "Tick",
        "rpm",
        &ticks,
        &[
            ("engine rpm", engine.as_slice(), RED),
            ("shaft rpm", shaft.as_slice(), BLUE),
            ("speed² x10", speed.as_slice(), GREEN),
        ],
    )?;

    // 2) Velocity gained in one tick from rest vs shaft rpm; the kink is where the tire breaks loose
    let mut tire = TireFrictionModel::new(config.tire.clone())?;
    let mut shafts = Vec::new();
    let mut gained = Vec::new();
    for i in 0..=200 {
        let shaft_rpm = i as f64 * 0.5;
        let mut state = VehicleState {
            shaft_rpm,
            ..Default::default()
        };
        let ctx = SimContext { dt: 0.01, t: 0.0, tick: 0 };
        tire.step_physics(ctx, &ControlInputs::default(), &mut state);
        shafts.push(shaft_rpm);
        gained.push(state.velocity.y);
    }

    draw_series(
        "tire_traction.png",
        "Velocity Gained From Rest vs Shaft rpm",
        "Shaft rpm",
        "Velocity after one tick",
        &shafts,
        &[("velocity", gained.as_slice(), BLUE)],
    )?;

    println!("Wrote plots: drivetrain_launch.png, tire_traction.png");

    Ok(())
}
