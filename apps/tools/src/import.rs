//! `;`-delimited city and hotel CSV import.

use shared::domain::local_code_from_full;
use storage::Storage;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: empty {field}")]
    EmptyField { line: usize, field: &'static str },
    #[error("line {line}: city '{city_code}' does not exist")]
    UnknownCity { line: usize, city_code: String },
    #[error("line {line}: {source}")]
    Storage {
        line: usize,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRow {
    pub line: usize,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelRow {
    pub line: usize,
    pub city_code: String,
    pub local_code: String,
    pub name: String,
}

pub async fn fetch_csv(
    http: &reqwest::Client,
    url: &str,
    auth: Option<&BasicAuth>,
) -> Result<String, ImportError> {
    let download = |source| ImportError::Download {
        url: url.to_string(),
        source,
    };

    let mut request = http.get(url);
    if let Some(auth) = auth {
        request = request.basic_auth(&auth.username, auth.password.as_deref());
    }
    request
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(download)?
        .text()
        .await
        .map_err(download)
}

/// Splits non-blank lines into fields, numbering lines from 1.
fn records(body: &str) -> impl Iterator<Item = (usize, Vec<String>)> + '_ {
    body.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, split_fields(line)))
}

/// `;`-separated fields. A field opening with `"` runs to its closing quote,
/// so it may contain `;`; `""` inside it is a literal quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            ';' if !quoted => fields.push(take_field(&mut field)),
            _ => field.push(ch),
        }
    }
    fields.push(take_field(&mut field));
    fields
}

fn take_field(field: &mut String) -> String {
    std::mem::take(field).trim().to_string()
}

fn split_exact<const N: usize>(
    line: usize,
    values: Vec<String>,
) -> Result<[String; N], ImportError> {
    values
        .try_into()
        .map_err(|fields: Vec<String>| ImportError::FieldCount {
            line,
            expected: N,
            found: fields.len(),
        })
}

fn non_empty(line: usize, value: &str, field: &'static str) -> Result<(), ImportError> {
    if value.is_empty() {
        return Err(ImportError::EmptyField { line, field });
    }
    Ok(())
}

pub fn parse_city_rows(body: &str) -> Result<Vec<CityRow>, ImportError> {
    records(body)
        .map(|(line, values)| -> Result<CityRow, ImportError> {
            let [code, name] = split_exact::<2>(line, values)?;
            non_empty(line, &code, "city code")?;
            Ok(CityRow { line, code, name })
        })
        .collect()
}

pub fn parse_hotel_rows(body: &str) -> Result<Vec<HotelRow>, ImportError> {
    records(body)
        .map(|(line, values)| -> Result<HotelRow, ImportError> {
            let [city_code, full_code, name] = split_exact::<3>(line, values)?;
            non_empty(line, &city_code, "city code")?;
            non_empty(line, &full_code, "hotel code")?;
            Ok(HotelRow {
                line,
                city_code,
                local_code: local_code_from_full(&full_code).to_string(),
                name,
            })
        })
        .collect()
}

pub async fn import_cities(storage: &Storage, body: &str) -> Result<usize, ImportError> {
    let rows = parse_city_rows(body)?;
    for row in &rows {
        storage
            .upsert_city(&row.code, &row.name)
            .await
            .map_err(|source| ImportError::Storage {
                line: row.line,
                source,
            })?;
        debug!(code = %row.code, "city imported");
    }
    Ok(rows.len())
}

pub async fn import_hotels(storage: &Storage, body: &str) -> Result<usize, ImportError> {
    let rows = parse_hotel_rows(body)?;
    for row in &rows {
        let storage_error = |source| ImportError::Storage {
            line: row.line,
            source,
        };
        if storage
            .city_by_code(&row.city_code)
            .await
            .map_err(storage_error)?
            .is_none()
        {
            return Err(ImportError::UnknownCity {
                line: row.line,
                city_code: row.city_code.clone(),
            });
        }
        let outcome = storage
            .save_hotel(&row.city_code, &row.local_code, &row.name)
            .await
            .map_err(storage_error)?;
        debug!(
            city = %row.city_code,
            local_code = %row.local_code,
            hotel_id = %outcome.hotel_id(),
            "hotel imported"
        );
    }
    Ok(rows.len())
}

#[cfg(test)]
#[path = "tests/import_tests.rs"]
mod tests;
