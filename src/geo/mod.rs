use crate::models::order::Address;

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn haversine_km(a: &Address, b: &Address) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Straight-line placeholder for the route length: chains haversine legs
/// through every pickup and then every delivery stop. Real routing is not
/// modeled; a client-supplied distance always takes precedence.
pub fn estimate_route_km(pickups: &[Address], deliveries: &[Address]) -> f64 {
    let mut total = 0.0;
    let mut stops = pickups.iter().chain(deliveries.iter());

    let Some(mut previous) = stops.next() else {
        return 0.0;
    };

    for stop in stops {
        total += haversine_km(previous, stop);
        previous = stop;
    }

    total
}
