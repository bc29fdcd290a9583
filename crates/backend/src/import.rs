//! Tab-separated station import.
//!
//! Columns: `id name city zipcode street house_number telephone fax email
//! website longitude latitude`, optionally followed by `police_type` and
//! `image_url`. Values are trimmed; empty values and numbers that fail to
//! parse are stored as missing.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use police_map_shared::geometry::point_geometry;
use police_map_shared::models::{Station, StationId};
use serde::Deserialize;
use tracing::{error, info};

use crate::storage::{Storage, Upsert};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Record {
    id: Option<String>,
    name: Option<String>,
    city: Option<String>,
    zipcode: Option<String>,
    street: Option<String>,
    house_number: Option<String>,
    telephone: Option<String>,
    fax: Option<String>,
    email: Option<String>,
    website: Option<String>,
    longitude: Option<String>,
    latitude: Option<String>,
    police_type: Option<String>,
    image_url: Option<String>,
}

fn text(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number<T: FromStr>(value: Option<String>) -> Option<T> {
    text(value)?.parse().ok()
}

impl Record {
    /// `None` when the row has no usable id.
    fn into_station(self) -> Option<Station> {
        let id: u64 = number(self.id)?;
        let longitude: Option<f64> = number(self.longitude);
        let latitude: Option<f64> = number(self.latitude);
        let geojson = match (latitude, longitude) {
            (Some(lat), Some(lng)) => Some(point_geometry(lat, lng)),
            _ => None,
        };
        Some(Station {
            id: StationId(id),
            name: text(self.name).unwrap_or_default(),
            slug: String::new(),
            street: text(self.street),
            house_number: text(self.house_number),
            zipcode: text(self.zipcode),
            city: text(self.city),
            telephone: text(self.telephone),
            fax: text(self.fax),
            email: text(self.email),
            website: text(self.website),
            image_url: text(self.image_url),
            police_type: text(self.police_type),
            geojson,
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Parse the rows of a TSV file. Rows without an id, and rows the reader
/// cannot decode, are logged and counted as skipped.
fn parse_stations<R: Read>(reader: R) -> (Vec<Station>, usize) {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let mut stations = Vec::new();
    let mut skipped = 0;
    for (line, rec) in rdr.deserialize::<Record>().enumerate() {
        let rec = match rec {
            Ok(rec) => rec,
            Err(e) => {
                error!(row = line + 1, error = %e, "Unreadable row, skipped");
                skipped += 1;
                continue;
            }
        };
        let name = rec.name.clone().unwrap_or_default();
        match rec.into_station() {
            Some(station) => stations.push(station),
            None => {
                error!(row = line + 1, "Row without id for station {}, skipped", name.trim());
                skipped += 1;
            }
        }
    }
    (stations, skipped)
}

pub fn import_reader<R: Read>(storage: &Storage, reader: R) -> ImportSummary {
    let (stations, skipped) = parse_stations(reader);
    let mut summary = ImportSummary {
        skipped,
        ..Default::default()
    };

    for station in stations {
        let id = station.id;
        let name = station.name.clone();
        match storage.upsert_station(station) {
            Ok((Upsert::Inserted, _)) => {
                info!("Inserted station {} with id {}", name, id);
                summary.inserted += 1;
            }
            Ok((Upsert::Updated, _)) => {
                info!("Updated station {} with id {}", name, id);
                summary.updated += 1;
            }
            Err(e) => {
                error!("Error with station {}: {}", name, e);
                summary.skipped += 1;
            }
        }
    }
    summary
}

pub fn import_file(storage: &Storage, src: &Path) -> Result<ImportSummary> {
    let file = std::fs::File::open(src)
        .with_context(|| format!("Failed to open {}", src.display()))?;
    let summary = import_reader(storage, file);
    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        skipped = summary.skipped,
        "Import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use police_map_shared::geometry::marker_position;

    const HEADER: &str = "id\tname\tcity\tzipcode\tstreet\thouse_number\ttelephone\tfax\temail\twebsite\tlongitude\tlatitude";

    fn tsv(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    // --- Parsing ---

    #[test]
    fn test_parse_full_row() {
        let data = tsv(&["3\t Polizeirevier Weststadt \tFlensburg\t24937\tNorderhofenden\t1\t0461 484-0\t\tpr@polizei.de\t\t9.4321\t54.7836"]);
        let (stations, skipped) = parse_stations(data.as_bytes());
        assert_eq!(skipped, 0);
        let station = &stations[0];
        assert_eq!(station.id, StationId(3));
        assert_eq!(station.name, "Polizeirevier Weststadt");
        assert_eq!(station.fax, None);
        assert_eq!(station.website, None);
        let pos = marker_position(station.geojson.as_ref().unwrap()).unwrap();
        assert!((pos.lat - 54.7836).abs() < 1e-9);
        assert!((pos.lng - 9.4321).abs() < 1e-9);
    }

    #[test]
    fn test_row_without_id_is_skipped() {
        let data = tsv(&[
            "\tOhne Id\tKiel\t24103\t\t\t\t\t\t\t10.1\t54.3",
            "x\tKaputte Id\tKiel\t24103\t\t\t\t\t\t\t10.1\t54.3",
            "8\tMit Id\tKiel\t24103\t\t\t\t\t\t\t10.1\t54.3",
        ]);
        let (stations, skipped) = parse_stations(data.as_bytes());
        assert_eq!(skipped, 2);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, StationId(8));
    }

    #[test]
    fn test_bad_coordinate_drops_geometry() {
        let data = tsv(&["5\tWache\tKiel\t24103\t\t\t\t\t\t\tabc\t54.3"]);
        let (stations, _) = parse_stations(data.as_bytes());
        assert!(stations[0].geojson.is_none());
    }

    #[test]
    fn test_optional_type_and_image_columns() {
        let data = format!(
            "{}\tpolice_type\timage_url\n9\tBundespolizeiinspektion\tFlensburg\t24937\t\t\t\t\t\t\t9.43\t54.78\tBPOL\thttps://example.org/bpol.jpg",
            HEADER
        );
        let (stations, _) = parse_stations(data.as_bytes());
        assert_eq!(stations[0].police_type.as_deref(), Some("BPOL"));
        assert_eq!(stations[0].image_url.as_deref(), Some("https://example.org/bpol.jpg"));
    }

    // --- Import ---

    #[test]
    fn test_import_counts_inserts_and_updates() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("stations.redb")).unwrap();
        let data = tsv(&[
            "1\tWache Nord\tKiel\t24103\t\t\t\t\t\t\t10.1\t54.3",
            "2\tWache Süd\tKiel\t24103\t\t\t\t\t\t\t10.2\t54.2",
        ]);

        let first = import_reader(&storage, data.as_bytes());
        assert_eq!(first, ImportSummary { inserted: 2, updated: 0, skipped: 0 });

        let second = import_reader(&storage, data.as_bytes());
        assert_eq!(second, ImportSummary { inserted: 0, updated: 2, skipped: 0 });
        assert_eq!(storage.count_stations().unwrap(), 2);
    }

    #[test]
    fn test_import_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("stations.redb")).unwrap();
        assert!(import_file(&storage, &dir.path().join("missing.tsv")).is_err());
    }
}
