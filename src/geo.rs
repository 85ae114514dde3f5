//! Recovers coordinates from embedded map URLs.

use url::form_urlencoded;

/// Reads the `center=lat,lon` query parameter of a map embed URL.
///
/// Works on absolute and relative URLs. Returns `None` when the parameter is
/// missing or does not hold two finite numbers.
pub fn extract_coordinates(map_url: &str) -> Option<(f64, f64)> {
    let (_, query) = map_url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    let center = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "center")
        .map(|(_, value)| value.into_owned())?;

    let (lat, lon) = center.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;

    (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}
