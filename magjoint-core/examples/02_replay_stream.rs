//! Replayed Telemetry Example
//!
//! Fits interpolants from a recorded sweep, then replays a noisy telemetry
//! stream with a spike through a filtered estimator.
//!
//! ## What You'll Learn
//!
//! - Building a `CalibrationTable` and an `AngleEstimator`
//! - Pulling ticks from a `SnapshotSource`
//! - What warm-up looks like and how the outlier filter treats a spike
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_replay_stream
//! ```

use magjoint_core::{
    stream::{poll_angles, ReplaySource, StreamError},
    AngleEstimator, CalibrationSample, CalibrationTable, EstimatorConfig, OutlierConfig,
    Readiness, SensorSnapshot,
};

const JOINTS: [usize; 2] = [1, 2];

fn package(joint: usize, angle: f64, jitter: i32) -> SensorSnapshot {
    let theta = angle.to_radians();
    let mut counts = [[0i32; 3]; 4];
    for (p, pixel) in counts.iter_mut().enumerate() {
        for (a, count) in pixel.iter_mut().enumerate() {
            let phase = 0.7 * p as f64 + 0.3 * joint as f64 + a as f64;
            *count = (900.0 * (theta + phase).sin()).round() as i32 + jitter;
        }
    }
    SensorSnapshot::from_package(counts, 4000)
}

fn tick(angle: f64, jitter: i32) -> Vec<SensorSnapshot> {
    JOINTS.iter().map(|&joint| package(joint, angle, jitter)).collect()
}

/// Sweep both joints from 0° to 90° and record their features
fn record(config: &EstimatorConfig) -> Result<CalibrationTable, Box<dyn std::error::Error>> {
    let mut probe = CalibrationTable::new();
    for joint in JOINTS {
        probe.insert(
            joint,
            vec![
                CalibrationSample::new(0.0, [0.0; 12]),
                CalibrationSample::new(1.0, [1.0; 12]),
            ],
        );
    }
    let extractor = AngleEstimator::new(&probe, config.clone().with_outlier(None).with_smoothing(None))?;

    let mut table = CalibrationTable::new();
    for (slot, joint) in JOINTS.into_iter().enumerate() {
        let mut samples = Vec::new();
        for step in 0..=18 {
            let angle = f64::from(step) * 5.0;
            let frame = extractor.features(&tick(angle, 0))?;
            samples.push(CalibrationSample::new(angle, frame[slot]));
        }
        table.insert(joint, samples);
    }
    Ok(table)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Magjoint Replay Example");
    println!("=======================\n");

    let config = EstimatorConfig::default()
        .with_outlier(Some(OutlierConfig::default().with_population(5)));
    let table = record(&config)?;
    let mut estimator = AngleEstimator::new(&table, config)?;
    println!("Serving joints {:?}\n", estimator.joint_ids());

    // Joint held near 40°, small jitter, one corrupted tick
    let mut ticks = Vec::new();
    for i in 0..12 {
        let jitter = if i % 2 == 0 { 3 } else { -3 };
        let corrupted = if i == 8 { 5000 } else { 0 };
        ticks.push(tick(40.0, jitter + corrupted));
    }
    let mut source = ReplaySource::new(ticks);

    let mut index = 0;
    loop {
        match poll_angles(&mut estimator, &mut source) {
            Ok(Readiness::Ready(angles)) => {
                let values: Vec<String> = angles
                    .iter()
                    .filter_map(|a| a.single())
                    .map(|a| format!("{:6.2}°", a))
                    .collect();
                let note = if index == 8 { "  <- spike clipped" } else { "" };
                println!("tick {:2}: {}{}", index, values.join("  "), note);
            }
            Ok(Readiness::WarmingUp { collected, required }) => {
                println!("tick {:2}: warming up ({}/{})", index, collected, required);
            }
            Err(nb::Error::WouldBlock) => continue,
            Err(nb::Error::Other(StreamError::EndOfStream)) => break,
            Err(nb::Error::Other(e)) => return Err(e.into()),
        }
        index += 1;
    }

    println!("\nPackage temperatures: {:?} °C", estimator.last_temperatures());
    Ok(())
}
