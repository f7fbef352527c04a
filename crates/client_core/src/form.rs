use shared::protocol::SaveHotelRequest;

/// Contents of the hotel form. Mirrors the hotel being edited by its fields
/// only; it carries no id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub local_code: String,
    pub city: String,
}

impl FormState {
    pub fn populate(&mut self, name: &str, city: &str, local_code: &str) {
        self.name = name.to_string();
        self.city = city.to_string();
        self.local_code = local_code.to_string();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.local_code.is_empty() && self.city.is_empty()
    }

    pub fn to_request(&self) -> SaveHotelRequest {
        SaveHotelRequest {
            name: self.name.clone(),
            local_code: self.local_code.clone(),
            city: self.city.clone(),
        }
    }
}
