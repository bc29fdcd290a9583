use geojson::Feature;

/// First clause of a feature label, used as the marker tooltip: the text
/// before the first `", "` or `" -"`, trimmed.
pub fn tooltip_label(label: &str) -> &str {
    let end = [", ", " -"]
        .iter()
        .filter_map(|sep| label.find(sep))
        .min()
        .unwrap_or(label.len());
    label[..end].trim()
}

/// The `label` property of a feature, if it is a string.
pub fn feature_label(feature: &Feature) -> Option<&str> {
    feature.properties.as_ref()?.get("label")?.as_str()
}
