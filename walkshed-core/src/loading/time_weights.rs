use log::{info, warn};

use crate::{Error, StreetGraph};

/// Average walking speed in km/h
pub const DEFAULT_TRAVEL_SPEED: f64 = 4.5;

fn meters_per_minute(travel_speed_kmh: f64) -> Result<f64, Error> {
    if !travel_speed_kmh.is_finite() || travel_speed_kmh <= 0.0 {
        return Err(Error::Configuration(format!(
            "Travel speed must be a positive number, got {travel_speed_kmh}"
        )));
    }
    Ok(travel_speed_kmh * 1000.0 / 60.0)
}

/// Sets every edge's walking time to `length / (speed in meters per minute)`.
///
/// Edges with a negative or non-finite length keep whatever weight they had.
/// Returns the number of edges that received a time.
///
/// # Errors
///
/// Returns a configuration error if the speed is not a positive number
pub fn add_time_weights(streets: &mut StreetGraph, travel_speed_kmh: f64) -> Result<usize, Error> {
    let meters_per_minute = meters_per_minute(travel_speed_kmh)?;
    info!("Adding time attributes with travel speed {travel_speed_kmh} km/h");

    let mut weighted = 0;
    let mut skipped = 0;
    for edge in streets.edges_mut() {
        if edge.length.is_finite() && edge.length >= 0.0 {
            edge.weight = Some(edge.length / meters_per_minute);
            weighted += 1;
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} edges without a usable length");
    }
    Ok(weighted)
}

/// Applies [`add_time_weights`] only if no edge carries a time yet.
///
/// Returns whether weights were added.
///
/// # Errors
///
/// Returns a configuration error if the speed is not a positive number
pub fn ensure_time_weights(
    streets: &mut StreetGraph,
    travel_speed_kmh: f64,
) -> Result<bool, Error> {
    if streets.has_time_weights() {
        return Ok(false);
    }
    info!("Graph missing time attributes, adding them");
    add_time_weights(streets, travel_speed_kmh)?;
    Ok(true)
}
