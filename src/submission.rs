use crate::config::DataConfig;
use crate::constants::{FOCUS_MAP_ZOOM, MAX_MAP_ZOOM, MIN_MAP_ZOOM};
use crate::models::LatLng;
use reqwest::Url;

/// Embedded report form URL, with the location field pre-filled when a point was picked
#[must_use]
pub fn prefilled_form_url(config: &DataConfig, picked: Option<LatLng>) -> String {
    let Some(point) = picked else {
        return config.form_url.clone();
    };
    match Url::parse(&config.form_url) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair(&config.form_location_field, &format!("{},{}", point.lat, point.lng));
            url.to_string()
        }
        Err(e) => {
            leptos::logging::warn!("Invalid form URL '{}': {e}", config.form_url);
            config.form_url.clone()
        }
    }
}

/// Where the map should open, taken from `?lat=..&lng=..&zoom=..`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFocus {
    pub center: LatLng,
    pub zoom: f64,
}

impl MapFocus {
    /// `None` unless the URL carries a valid latitude and longitude
    #[must_use]
    pub fn from_href(href: &str) -> Option<Self> {
        let url = Url::parse(href).ok()?;
        let mut lat = None;
        let mut lng = None;
        let mut zoom = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "lat" => lat = value.parse::<f64>().ok(),
                "lng" => lng = value.parse::<f64>().ok(),
                "zoom" => zoom = value.parse::<f64>().ok(),
                _ => {}
            }
        }
        let center = LatLng { lat: lat?, lng: lng? }.validated().ok()?;
        Some(Self {
            center,
            zoom: zoom.unwrap_or(FOCUS_MAP_ZOOM).clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM),
        })
    }
}

/// Relative link that opens the map focused on `location`
#[must_use]
pub fn view_on_map_href(location: LatLng) -> String {
    format!("?lat={}&lng={}&zoom={FOCUS_MAP_ZOOM}", location.lat, location.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_url_without_pick_is_unchanged() {
        let config = DataConfig::default();
        assert_eq!(prefilled_form_url(&config, None), config.form_url);
    }

    #[test]
    fn test_form_url_prefills_location() {
        let config = DataConfig {
            form_url: "https://forms.example.org/viewform?embedded=true".to_string(),
            form_location_field: "entry.42".to_string(),
            ..DataConfig::default()
        };
        let url = prefilled_form_url(&config, Some(LatLng { lat: 14.6, lng: -90.5 }));
        assert_eq!(url, "https://forms.example.org/viewform?embedded=true&entry.42=14.6%2C-90.5");
    }

    #[test]
    fn test_map_focus_from_href() {
        let focus = MapFocus::from_href("https://example.org/?lat=14.64&lng=-90.51&zoom=18").expect("focus");
        assert_eq!(focus.center, LatLng { lat: 14.64, lng: -90.51 });
        assert_eq!(focus.zoom, 18.0);

        let focus = MapFocus::from_href("https://example.org/?lat=14.64&lng=-90.51").expect("focus");
        assert_eq!(focus.zoom, FOCUS_MAP_ZOOM);

        let focus = MapFocus::from_href("https://example.org/?lat=14.64&lng=-90.51&zoom=40").expect("focus");
        assert_eq!(focus.zoom, MAX_MAP_ZOOM);
    }

    #[test]
    fn test_map_focus_requires_valid_point() {
        assert_eq!(MapFocus::from_href("https://example.org/"), None);
        assert_eq!(MapFocus::from_href("https://example.org/?lat=14.6"), None);
        assert_eq!(MapFocus::from_href("https://example.org/?lat=100&lng=0"), None);
        assert_eq!(MapFocus::from_href("not a url"), None);
    }

    #[test]
    fn test_view_on_map_href_round_trips() {
        let location = LatLng { lat: 14.6349, lng: -90.5069 };
        let href = format!("https://example.org/{}", view_on_map_href(location));
        let focus = MapFocus::from_href(&href).expect("focus");
        assert_eq!(focus.center, location);
        assert_eq!(focus.zoom, FOCUS_MAP_ZOOM);
    }
}
