use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HotelId(pub i64);

impl std::fmt::Display for HotelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum length of a city code; codes are the city's primary key.
pub const CITY_CODE_MAX_LEN: usize = 3;
/// Imported hotels keep only the last two characters of their full code.
pub const LOCAL_CODE_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

/// City-qualified hotel code, e.g. `BAR` + `A9` -> `BARA9`.
pub fn global_code(city_code: &str, local_code: &str) -> String {
    format!("{city_code}{local_code}")
}

/// Local code of a hotel from its full CSV code (`BARA9` -> `A9`).
///
/// Codes shorter than [`LOCAL_CODE_LEN`] are returned unchanged.
pub fn local_code_from_full(full_code: &str) -> &str {
    let chars = full_code.chars().count();
    if chars <= LOCAL_CODE_LEN {
        return full_code;
    }
    let skip = chars - LOCAL_CODE_LEN;
    let start = full_code
        .char_indices()
        .nth(skip)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &full_code[start..]
}
