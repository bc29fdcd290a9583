use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject};
use serde::{Deserialize, Serialize};

use crate::geometry::{self, LatLng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StationId {
    /// Read the identifier of a GeoJSON feature. Numeric ids and numeric
    /// strings are both accepted.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        match feature.id.as_ref()? {
            Id::Number(n) => n.as_u64().map(StationId),
            Id::String(s) => s.trim().parse().ok().map(StationId),
        }
    }
}

/// A police station as served by `/police/v1/details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub police_type: Option<String>,
    #[serde(default)]
    pub geojson: Option<Geometry>,
}

/// Join the non-empty parts with `sep`.
fn join_present(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

impl Station {
    /// Generate a URL-safe slug from a station name.
    pub fn slugify(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for c in name.to_lowercase().chars() {
            match c {
                'ä' => out.push_str("ae"),
                'ö' => out.push_str("oe"),
                'ü' => out.push_str("ue"),
                'ß' => out.push_str("ss"),
                c if c.is_ascii_alphanumeric() => out.push(c),
                _ => out.push('-'),
            }
        }
        out.split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// "Street 12"
    pub fn street_line(&self) -> String {
        join_present(&[self.street.as_deref(), self.house_number.as_deref()], " ")
    }

    /// "24937 Flensburg"
    pub fn locality(&self) -> String {
        join_present(&[self.zipcode.as_deref(), self.city.as_deref()], " ")
    }

    /// Feature label: name, street line and locality separated by `", "`.
    pub fn label(&self) -> String {
        let street = self.street_line();
        let locality = self.locality();
        join_present(
            &[Some(self.name.as_str()), Some(street.as_str()), Some(locality.as_str())],
            ", ",
        )
    }

    /// Position used for the map marker and for recentering.
    pub fn position(&self) -> Option<LatLng> {
        self.geojson.as_ref().and_then(geometry::marker_position)
    }

    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("label".to_string(), self.label().into());
        properties.insert("slug".to_string(), self.slug.clone().into());
        if let Some(code) = &self.police_type {
            properties.insert("police_type".to_string(), code.clone().into());
        }
        Feature {
            bbox: None,
            geometry: self.geojson.clone(),
            id: Some(Id::Number(self.id.0.into())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Wrap features into a collection.
pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationType {
    pub code: String,
    pub name: String,
}

#[cfg(test)]
pub(crate) fn sample_station() -> Station {
    Station {
        id: StationId(3),
        name: "Polizeirevier Flensburg - Weststadt".to_string(),
        slug: "polizeirevier-flensburg-weststadt".to_string(),
        street: Some("Norderhofenden".to_string()),
        house_number: Some("1".to_string()),
        zipcode: Some("24937".to_string()),
        city: Some("Flensburg".to_string()),
        telephone: Some("0461 484-0".to_string()),
        fax: None,
        email: Some("flensburg.pr@polizei.landsh.de".to_string()),
        website: None,
        image_url: None,
        police_type: Some("LPOL".to_string()),
        geojson: Some(geometry::point_geometry(54.7836, 9.4321)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_transliterates_umlauts() {
        assert_eq!(
            Station::slugify("Polizeistation Süderbrarup"),
            "polizeistation-suederbrarup"
        );
        assert_eq!(Station::slugify("Straße"), "strasse");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(
            Station::slugify("  Revier -- Kiel, (Mitte)  "),
            "revier-kiel-mitte"
        );
    }

    #[test]
    fn test_label_skips_missing_parts() {
        let mut station = sample_station();
        assert_eq!(
            station.label(),
            "Polizeirevier Flensburg - Weststadt, Norderhofenden 1, 24937 Flensburg"
        );
        station.street = None;
        station.house_number = None;
        assert_eq!(
            station.label(),
            "Polizeirevier Flensburg - Weststadt, 24937 Flensburg"
        );
    }

    #[test]
    fn test_station_id_from_feature() {
        let feature = sample_station().to_feature();
        assert_eq!(StationId::from_feature(&feature), Some(StationId(3)));

        let mut by_string = feature.clone();
        by_string.id = Some(Id::String("17".to_string()));
        assert_eq!(StationId::from_feature(&by_string), Some(StationId(17)));

        let mut missing = feature;
        missing.id = None;
        assert_eq!(StationId::from_feature(&missing), None);
    }

    #[test]
    fn test_to_feature_properties() {
        let feature = sample_station().to_feature();
        let props = feature.properties.unwrap();
        assert_eq!(props["slug"], "polizeirevier-flensburg-weststadt");
        assert_eq!(props["police_type"], "LPOL");
        assert!(props["label"]
            .as_str()
            .unwrap()
            .starts_with("Polizeirevier Flensburg"));
        assert!(feature.geometry.is_some());
    }

    #[test]
    fn test_station_deserializes_with_nulls() {
        let json = r#"{"id":12,"name":"Polizeistation Glücksburg","street":null,"house_number":null,"zipcode":"24960","city":"Glücksburg","telephone":null,"fax":null,"email":null,"website":null,"geojson":{"type":"Point","coordinates":[9.55,54.83]}}"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, StationId(12));
        assert!(station.slug.is_empty());
        assert!(station.email.is_none());
        let pos = station.position().unwrap();
        assert!((pos.lat - 54.83).abs() < 1e-9);
        assert!((pos.lng - 9.55).abs() < 1e-9);
    }

    #[test]
    fn test_station_type_deserializes() {
        let json = r#"[{"code":"BPOL","name":"Bundespolizei"}]"#;
        let types: Vec<StationType> = serde_json::from_str(json).unwrap();
        assert_eq!(types[0].code, "BPOL");
        assert_eq!(types[0].name, "Bundespolizei");
    }
}
