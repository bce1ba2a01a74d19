//! Great-circle distance.

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two WGS84 coordinates, in kilometres.
///
/// # Examples
///
/// ```
/// use u_mdvrp::distance::haversine_km;
///
/// // One degree of latitude is about 111.2 km.
/// let d = haversine_km(40.0, 29.0, 41.0, 29.0);
/// assert!((d - 111.19).abs() < 0.01);
/// assert_eq!(haversine_km(40.0, 29.0, 40.0, 29.0), 0.0);
/// ```
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
