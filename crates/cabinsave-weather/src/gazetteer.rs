//! Static place list used when the live geocoder is unavailable.

use std::collections::HashSet;

use crate::types::LocationCandidate;

/// A fixed gazetteer entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn place(name: &'static str, lat: f64, lon: f64) -> Place {
    Place { name, lat, lon }
}

/// Cabin destinations in Norway, in display order.
pub const PLACES: &[Place] = &[
    place("Beitostølen", 61.2489, 8.9091),
    place("Oslo", 59.9139, 10.7522),
    place("Bergen", 60.39299, 5.32415),
    place("Trondheim", 63.4305, 10.3951),
    place("Lillehammer", 61.1153, 10.4662),
    place("Hemsedal", 60.8645, 8.5534),
    place("Geilo", 60.533, 8.205),
    place("Trysil", 61.3146, 12.2659),
    place("Hafjell", 61.2452, 10.4536),
    place("Sirdal", 58.9146, 6.8516),
    place("Gol", 60.7015, 9.0407),
    place("Hovden", 59.5594, 7.3559),
    place("Norefjell", 60.2081, 9.4615),
    place("Oppdal", 62.5942, 9.6947),
    place("Sjusjøen", 61.1802, 10.7866),
    place("Kvitfjell", 61.4534, 10.1126),
    place("Voss", 60.628, 6.4147),
    place("Røldal", 59.8299, 6.8158),
    place("Narvik", 68.4385, 17.427),
    place("Tromsø", 69.6492, 18.9553),
];

impl From<&Place> for LocationCandidate {
    fn from(p: &Place) -> Self {
        LocationCandidate::new(p.name, p.lat, p.lon)
    }
}

/// Case-insensitive substring search over `places`, at most `limit` results.
pub fn search_in(places: &[Place], query: &str, limit: usize) -> Vec<LocationCandidate> {
    let needle = query.to_lowercase();
    let mut seen = HashSet::new();

    places
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .map(LocationCandidate::from)
        .filter(|c| seen.insert(c.exact_key()))
        .take(limit)
        .collect()
}

/// Search the built-in gazetteer.
pub fn search(query: &str, limit: usize) -> Vec<LocationCandidate> {
    search_in(PLACES, query, limit)
}
