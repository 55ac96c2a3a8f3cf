//! RPN request formatting and response caching for the vendor variable bridge

use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Expression that asks the bridge to report a variable.
pub fn read_expression(var: &str) -> String {
    format!("({})", var)
}

/// Expression that sets a variable.
pub fn write_expression(var: &str, value: f64) -> String {
    format!("{:.6} (>{})", value, var)
}

/// Split a bridge response of the form `(NAME)value`.
pub fn parse_response(data: &str) -> Option<(&str, f64)> {
    let rest = data.strip_prefix('(')?;
    let close = rest.find(')')?;
    let name = &rest[..close];
    let value = rest[close + 1..].trim().trim_end_matches('\0').parse().ok()?;
    Some((name, value))
}

/// Last known value of every vendor variable reported since the aircraft loaded.
#[derive(Debug, Default, Clone)]
pub struct VendorCache {
    values: HashMap<String, f64>,
    fresh: HashSet<String>,
}

impl VendorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget which values arrived last cycle.
    pub fn begin_cycle(&mut self) {
        self.fresh.clear();
    }

    /// Record one raw bridge response. Returns false if it could not be parsed.
    pub fn absorb(&mut self, response: &str) -> bool {
        match parse_response(response) {
            Some((name, value)) => {
                self.insert(name, value);
                true
            }
            None => {
                debug!(response, "Ignoring unparsable bridge response");
                false
            }
        }
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
        self.fresh.insert(name.to_string());
    }

    /// Last known value.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value only if it arrived during the current cycle.
    pub fn fresh(&self, name: &str) -> Option<f64> {
        if self.fresh.contains(name) { self.get(name) } else { None }
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.fresh.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expressions_use_rpn_syntax() {
        assert_eq!(read_expression("L:A310_AP_ON, Number"), "(L:A310_AP_ON, Number)");
        assert_eq!(
            write_expression("L:AP6_BUTTON, Number", 1.0),
            "1.000000 (>L:AP6_BUTTON, Number)"
        );
    }

    #[test]
    fn responses_split_name_and_value() {
        assert_eq!(
            parse_response("(L:A310_apu_master_switch, bool)1.000000"),
            Some(("L:A310_apu_master_switch, bool", 1.0))
        );
        assert_eq!(
            parse_response("(L:A32NX_ENGINE_EGT:1, number) 412.5\0"),
            Some(("L:A32NX_ENGINE_EGT:1, number", 412.5))
        );
        assert_eq!(parse_response("L:missing_paren 1"), None);
        assert_eq!(parse_response("(L:no_value, number)"), None);
    }

    #[test]
    fn cache_tracks_fresh_values_per_cycle() {
        let mut cache = VendorCache::new();
        assert!(cache.absorb("(L:A,bool)1"));
        assert_eq!(cache.fresh("L:A,bool"), Some(1.0));

        cache.begin_cycle();
        assert_eq!(cache.fresh("L:A,bool"), None);
        assert_eq!(cache.get("L:A,bool"), Some(1.0));

        assert!(!cache.absorb("garbage"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
