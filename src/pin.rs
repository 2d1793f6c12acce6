use crate::coords::GeoCoordinate;

/// A user-placed marker with a display title and subtitle.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub coordinate: GeoCoordinate,
    pub title: String,
    pub subtitle: String,
}

impl Pin {
    pub fn new(
        coordinate: GeoCoordinate,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self {
            coordinate,
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// Insertion-ordered collection of pins. Append-only within a session; the
/// earliest entry is the routing destination.
#[derive(Debug, Default)]
pub struct PinStore {
    pins: Vec<Pin>,
}

impl PinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pin: Pin) {
        self.pins.push(pin);
    }

    pub fn first(&self) -> Option<&Pin> {
        self.pins.first()
    }

    pub fn all(&self) -> &[Pin] {
        &self.pins
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(lat: f64, lon: f64) -> Pin {
        Pin::new(GeoCoordinate::new(lat, lon).unwrap(), "A", "B")
    }

    #[test]
    fn empty_store_has_no_first() {
        assert!(PinStore::new().first().is_none());
    }

    #[test]
    fn first_is_stable_across_adds() {
        let mut store = PinStore::new();
        store.add(pin(1.0, 1.0));
        assert_eq!(store.first(), Some(&pin(1.0, 1.0)));

        for i in 2..10 {
            store.add(pin(f64::from(i), 0.0));
        }
        assert_eq!(store.first(), Some(&pin(1.0, 1.0)));
        assert_eq!(store.len(), 9);
    }

    #[test]
    fn all_preserves_insertion_order() {
        let mut store = PinStore::new();
        store.add(pin(1.0, 2.0));
        store.add(pin(1.0, 2.0));
        store.add(pin(3.0, 4.0));
        let lons: Vec<f64> = store.all().iter().map(|p| p.coordinate.lon).collect();
        assert_eq!(lons, vec![2.0, 2.0, 4.0]);
    }
}
