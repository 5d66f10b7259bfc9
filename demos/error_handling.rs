//! Error handling example for geoquery-rs
//!
//! This example demonstrates the validation errors callers can expect and
//! how to tell them apart from load failures.

use geoquery_core::prelude::*;

fn main() -> Result<()> {
    println!("=== geoquery-rs Error Handling Example ===\n");

    // Example 1: Loading with error handling
    println!("--- Example 1: Loading a dataset that does not exist ---");
    match CityIndex::load_from_path("does/not/exist.json") {
        Ok(index) => println!("✓ Unexpectedly loaded {} cities", index.len()),
        Err(e) => println!("✗ {e} (invalid request: {})", e.is_invalid_request()),
    }
    println!();

    let engine = CityEngine::from_index(CityIndex::load_default()?.clone());

    // Example 2: Coordinates out of range
    println!("--- Example 2: Invalid coordinates ---");
    for (lat, lon) in [(91.0, 0.0), (0.0, -180.5), (f64::NAN, 10.0)] {
        match engine.find_nearest(lat, lon, Some(1), &AcceptAll) {
            Ok(resp) => println!("  ({lat}, {lon}): {} found", resp.total_found),
            Err(e) => println!("  ({lat}, {lon}): {e}"),
        }
    }
    println!();

    // Example 3: Radius limits
    println!("--- Example 3: Radius validation ---");
    for radius in [-5.0, 0.0, 20_000.0, 25_000.0] {
        match engine.find_within_radius(53.0, -6.0, Some(radius), &AcceptAll) {
            Ok(resp) => println!("  {radius} km: {} found", resp.total_found),
            Err(GeoError::InvalidArgument(msg)) => println!("  {radius} km: rejected: {msg}"),
            Err(e) => return Err(e),
        }
    }
    println!();

    // Example 4: Inverted bounding box
    println!("--- Example 4: Bounding box validation ---");
    match engine.find_within_bounding_box(10.0, 10.0, 5.0, 20.0, &AcceptAll) {
        Ok(resp) => println!("  {} found", resp.total_found),
        Err(e @ GeoError::InvalidBoundingBox(_)) => println!("  rejected: {e}"),
        Err(e) => return Err(e),
    }
    println!();

    // Example 5: Non-positive k is not an error
    println!("--- Example 5: k <= 0 ---");
    let resp = engine.find_nearest(53.0, -6.0, Some(0), &AcceptAll)?;
    println!("  k = 0 -> {} results", resp.total_found);

    println!("\n=== Example completed successfully ===");
    Ok(())
}
