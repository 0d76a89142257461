use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub full_address: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub available: bool,
    pub services: Vec<String>,
    pub specialties: Vec<String>,
    pub working_hours: String,
    pub team: String,
}

impl Clinic {
    /// Label used on appointments, e.g. `Senhor Sorriso Formiga - Formiga, MG`.
    pub fn display_label(&self) -> String {
        format!("{} - {}, {}", self.name, self.city, self.state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DentalService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub duration: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyClinic {
    #[serde(flatten)]
    pub clinic: Clinic,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub max_km: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicStats {
    pub total_clinics: usize,
    pub total_services: usize,
    pub states: usize,
    pub state_breakdown: BTreeMap<String, usize>,
    pub service_categories: BTreeMap<String, usize>,
}
