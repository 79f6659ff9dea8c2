//! Human-readable summaries printed to stderr

use hexroute::{Dashboard, DatasetIndex};

/// One line describing the current trip, if a route was requested
pub fn trip_summary(dashboard: &Dashboard) -> Option<String> {
    let stats = dashboard.stats()?;
    let mut parts = Vec::new();

    match stats.co2_per_trip {
        Some(grams) => parts.push(format!("🌍 CO2 per trip: {grams:.1} g")),
        None => parts.push("🌍 CO2 per trip: n/a".to_string()),
    }
    match stats.visit_count {
        Some(visits) => parts.push(format!("👥 visits: {visits:.0}")),
        None => parts.push("👥 visits: n/a".to_string()),
    }

    if let Some(route) = dashboard.route() {
        if let Some(meters) = route.distance_m {
            parts.push(format!("📏 {:.1} km", meters / 1000.0));
        }
        if let Some(seconds) = route.duration_s {
            parts.push(format!("⏱️  {:.0} min", seconds / 60.0));
        }
    }

    Some(parts.join(" | "))
}

/// Origin and destination option lists, one block each
pub fn option_listing(index: &DatasetIndex) -> String {
    let mut out = String::new();
    out.push_str(&format!("origins ({}):\n", index.origin_options().len()));
    for id in index.origin_options() {
        out.push_str(&format!("  {id}\n"));
    }
    out.push_str(&format!("destinations ({}):\n", index.destination_options().len()));
    for id in index.destination_options() {
        out.push_str(&format!("  {id}\n"));
    }
    out
}
