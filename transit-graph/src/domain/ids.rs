//! Identifier types for timetable entities.
//!
//! Identifiers wrap `Arc<str>` so that visits, graph nodes and query results
//! can share them without copying the underlying string.

use std::fmt;
use std::sync::Arc;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

impl_identifier!(TripId);
impl_identifier!(StopId);
impl_identifier!(RouteId);
impl_identifier!(VisitId);

impl VisitId {
    /// Derive the key of a visit: `{trip_id}_{stop_sequence}`.
    pub fn derive(trip_id: &TripId, stop_sequence: u32) -> Self {
        Self::new(format!("{}_{}", trip_id, stop_sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn identifier_equality_and_clone() {
        let a = StopId::new("1042");
        let b = StopId::new("1042");
        let c = a.clone();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(Arc::ptr_eq(&a.0, &c.0));
    }

    #[test]
    fn identifier_hash_lookup() {
        let mut map = HashMap::new();
        map.insert(TripId::new("Weekday_12"), 7);
        assert_eq!(map.get(&TripId::new("Weekday_12")), Some(&7));
    }

    #[test]
    fn identifier_formatting() {
        let route = RouteId::new("10");
        assert_eq!(route.to_string(), "10");
        assert_eq!(format!("{:?}", route), "RouteId(10)");
    }

    #[test]
    fn visit_id_derivation() {
        let trip = TripId::new("Weekday_12");
        assert_eq!(VisitId::derive(&trip, 3).as_str(), "Weekday_12_3");
    }

    #[test]
    fn identifiers_order_lexically() {
        let mut trips = vec![TripId::new("b"), TripId::new("a"), TripId::new("c")];
        trips.sort();
        let names: Vec<_> = trips.iter().map(TripId::as_str).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
