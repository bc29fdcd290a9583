use crate::models::Station;

/// One entry of the station detail list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRow {
    Name(String),
    Address { street_line: String, locality: String },
    Email(String),
    Website(String),
    Telephone(String),
    Fax(String),
}

impl DetailRow {
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            DetailRow::Name(_) | DetailRow::Address { .. } => None,
            DetailRow::Email(_) => Some("E-Mail"),
            DetailRow::Website(_) => Some("Website"),
            DetailRow::Telephone(_) => Some("Telefon"),
            DetailRow::Fax(_) => Some("Fax"),
        }
    }

    /// Link target for rows rendered as links.
    pub fn href(&self) -> Option<String> {
        match self {
            DetailRow::Email(email) => Some(format!("mailto:{}", email)),
            DetailRow::Website(url) => Some(url.clone()),
            _ => None,
        }
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Name and address always, then e-mail, website, telephone and fax when set.
pub fn detail_rows(station: &Station) -> Vec<DetailRow> {
    let mut rows = vec![
        DetailRow::Name(station.name.clone()),
        DetailRow::Address {
            street_line: station.street_line(),
            locality: station.locality(),
        },
    ];
    if let Some(email) = present(&station.email) {
        rows.push(DetailRow::Email(email));
    }
    if let Some(website) = present(&station.website) {
        rows.push(DetailRow::Website(website));
    }
    if let Some(telephone) = present(&station.telephone) {
        rows.push(DetailRow::Telephone(telephone));
    }
    if let Some(fax) = present(&station.fax) {
        rows.push(DetailRow::Fax(fax));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_station;

    #[test]
    fn test_rows_in_order_with_optional_fields() {
        let rows = detail_rows(&sample_station());
        assert_eq!(
            rows,
            vec![
                DetailRow::Name("Polizeirevier Flensburg - Weststadt".to_string()),
                DetailRow::Address {
                    street_line: "Norderhofenden 1".to_string(),
                    locality: "24937 Flensburg".to_string(),
                },
                DetailRow::Email("flensburg.pr@polizei.landsh.de".to_string()),
                DetailRow::Telephone("0461 484-0".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_optional_fields_are_skipped() {
        let mut station = sample_station();
        station.email = Some("  ".to_string());
        station.telephone = None;
        let rows = detail_rows(&station);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_all_optional_fields() {
        let mut station = sample_station();
        station.website = Some("https://www.polizei.schleswig-holstein.de".to_string());
        station.fax = Some("0461 484-1199".to_string());
        let headings: Vec<_> = detail_rows(&station).iter().filter_map(DetailRow::heading).collect();
        assert_eq!(headings, vec!["E-Mail", "Website", "Telefon", "Fax"]);
    }

    #[test]
    fn test_links() {
        assert_eq!(
            DetailRow::Email("a@b.de".to_string()).href().as_deref(),
            Some("mailto:a@b.de")
        );
        assert_eq!(
            DetailRow::Website("https://x.de".to_string()).href().as_deref(),
            Some("https://x.de")
        );
        assert!(DetailRow::Fax("1".to_string()).href().is_none());
    }
}
