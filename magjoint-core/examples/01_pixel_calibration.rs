//! Pixel Calibration Example
//!
//! Converts raw FH3D04 pixel counts to temperature-compensated flux and
//! shows how the programmed gains and die temperature change the result.
//!
//! ## What You'll Learn
//!
//! - Building a `PixelCalibrator` from a `HardwareConfig`
//! - How the raw temperature count maps to °C
//! - How the geometry profile reorders pixels and axes
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_pixel_calibration
//! ```

use magjoint_core::{
    features::FeatureVector, GeometryProfile, HardwareConfig, PixelCalibrator, RawPixelSample,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Magjoint Pixel Calibration Example");
    println!("==================================\n");

    let firmware = HardwareConfig::default();
    let reference = HardwareConfig::reference();

    println!("Hand firmware configuration:");
    println!("  Temperature offset: {}", firmware.temperature_offset);
    println!("  Gains (xy / z):     {} / {}", firmware.gain_xy, firmware.gain_z);
    println!("  Ratio (xy / z):     {:.4} / {:.4}", firmware.ratio_xy(), firmware.ratio_z());
    println!();

    let calibrator = PixelCalibrator::new(firmware)?;
    let datasheet = PixelCalibrator::new(reference)?;

    println!("Same counts at different die temperatures:\n");
    println!("  {:>6}  {:>8}  {:>12}  {:>12}", "raw t", "°C", "flux x", "flux z");
    for raw_t in [3600, 3800, 4000, 4200, 4400] {
        let reading = calibrator.calibrate(&RawPixelSample::new(1000, 0, 1000, raw_t));
        println!(
            "  {:>6}  {:>8.2}  {:>12.6}  {:>12.6}",
            raw_t, reading.temperature_c, reading.flux.x, reading.flux.z
        );
    }
    println!();

    let raw = RawPixelSample::new(1000, -500, 250, 4000);
    let firmware_reading = calibrator.calibrate(&raw);
    let datasheet_reading = datasheet.calibrate(&raw);
    println!("Counts {:?} at 25 °C:", (raw.x, raw.y, raw.z));
    println!("  firmware gains:  {:?}", firmware_reading.flux);
    println!("  datasheet gains: {:?}", datasheet_reading.flux);
    println!();

    // One package, wiring order
    let package = [
        RawPixelSample::new(100, 0, 0, 4000),
        RawPixelSample::new(0, 200, 0, 4000),
        RawPixelSample::new(0, 0, 300, 4000),
        RawPixelSample::new(400, 400, 400, 4000),
    ];

    for (name, profile) in [
        ("identity", GeometryProfile::identity()),
        ("full_remap", GeometryProfile::full_remap()),
    ] {
        profile.validate()?;
        let ordered = profile.remap_pixels(&package);
        let flux = profile.remap_axes(&ordered.map(|p| datasheet.calibrate(&p).flux));
        let feature = FeatureVector::from_pixels(&flux);

        println!("Geometry '{}':", name);
        for pixel in 0..4 {
            let f = feature.pixel(pixel);
            println!("  pixel {}: [{:>9.4}, {:>9.4}, {:>9.4}]", pixel, f.x, f.y, f.z);
        }
        println!();
    }

    Ok(())
}
