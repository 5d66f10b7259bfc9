//! Proximity search example for geoquery-rs
//!
//! This example demonstrates how to:
//! - Load the bundled city dataset into a query engine
//! - Run nearest, radius and bounding-box queries
//! - Narrow results with `CityFilter` or an ad-hoc closure
//! - Inspect snapshot statistics

use geoquery_rs::prelude::*;

fn main() -> Result<()> {
    println!("=== geoquery-rs Proximity Search Example ===\n");

    println!("Loading city dataset...");
    let index = CityIndex::load_default()?;
    println!("✓ {} cities loaded\n", index.len());
    let engine = CityEngine::from_index(index.clone());

    // Example 1: Nearest cities to a point in the Irish Sea
    println!("--- Example 1: 5 nearest cities to (53.0, -6.0) ---");
    let resp = engine.find_nearest(53.0, -6.0, Some(5), &AcceptAll)?;
    for r in &resp.results {
        println!(
            "{}. {} ({:.2} km / {:.2} mi)",
            r.rank,
            r.entity.payload.name(),
            r.distance_km,
            r.distance_miles
        );
    }
    println!();

    // Example 2: Radius search with the default radius (100 km)
    println!("--- Example 2: Cities within the default radius of Paris ---");
    let resp = engine.find_within_radius(48.8566, 2.3522, None, &AcceptAll)?;
    println!("{} found within {} km", resp.total_found, resp.radius_km);
    println!();

    // Example 3: Attribute filters
    println!("--- Example 3: Nearest capitals over one million people ---");
    let filter = CityFilter::new()
        .capitals(true)
        .population_between(Some(1_000_000), None);
    let resp = engine.find_nearest(50.0, 10.0, Some(3), &filter)?;
    for r in &resp.results {
        let c = &r.entity.payload;
        println!(
            "{}. {}, {} - {} ({:.2} km)",
            r.rank,
            c.name(),
            c.country(),
            c.population_category(),
            r.distance_km
        );
    }
    println!();

    // Example 4: Closures work as filters too
    println!("--- Example 4: Cities founded before 1000 AD within 2000 km ---");
    let old = |e: &LocatedEntity<DefaultCity>| e.payload.founded_year.is_some_and(|y| y < 1000);
    let resp = engine.find_within_radius(50.0, 5.0, Some(2000.0), &old)?;
    for r in &resp.results {
        println!("- {} ({:.0} km)", r.entity.payload.name(), r.distance_km);
    }
    println!();

    // Example 5: Bounding box over Ireland and Northern Ireland
    println!("--- Example 5: Bounding box ---");
    let resp = engine.find_within_bounding_box(51.0, -11.0, 56.0, -5.0, &AcceptAll)?;
    for e in &resp.entities {
        println!("- {}", e.payload.label());
    }
    println!();

    // Example 6: Statistics
    println!("--- Example 6: Dataset statistics ---");
    let stats = engine.snapshot().stats();
    println!("Cities: {}", stats.total_cities);
    println!("Countries: {}", stats.countries_count);
    println!("Capitals: {}", stats.capitals_count);
    println!("Largest: {}", stats.largest_city);

    println!("\n=== Example completed successfully ===");
    Ok(())
}
