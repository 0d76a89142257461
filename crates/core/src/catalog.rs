//! Static clinic and service catalog.
//!
//! The network of units is small and changes rarely, so the seed data lives
//! here and is copied into the `clinics` table on schema initialization.
//! Geolocation is consumed as-is; distances use the haversine formula.

use std::collections::BTreeMap;

use crate::models::clinic::{Clinic, ClinicStats, DentalService, NearbyClinic};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default radius for "clinics near me".
pub const DEFAULT_NEARBY_KM: f64 = 100.0;

/// Staff logins of the individual units and the clinic name each one manages.
const STAFF_LOGINS: [(&str, &str); 5] = [
    ("campobelo", "Senhor Sorriso Campo Belo"),
    ("formiga", "Senhor Sorriso Formiga"),
    ("itarare", "Senhor Sorriso Itararé"),
    ("capaobonito", "Senhor Sorriso Capão Bonito"),
    ("itapeva", "Senhor Sorriso Itapeva"),
];

pub fn clinic_name_for_login(login: &str) -> Option<&'static str> {
    STAFF_LOGINS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(login))
        .map(|(_, name)| *name)
}

pub fn staff_logins() -> impl Iterator<Item = &'static str> {
    STAFF_LOGINS.iter().map(|(key, _)| *key)
}

const WORKING_HOURS: &str = "Segunda a Sexta: 8h às 19h | Sábado: 8h às 13h";

#[allow(clippy::too_many_arguments)]
fn clinic(
    id: &str,
    city: &str,
    state: &str,
    address: &str,
    cep: &str,
    phone: &str,
    whatsapp: &str,
    email: &str,
    (latitude, longitude): (f64, f64),
    services: &[&str],
    specialties: &[&str],
    team: &str,
) -> Clinic {
    Clinic {
        id: id.to_string(),
        name: format!("Senhor Sorriso {}", city),
        city: city.to_string(),
        state: state.to_string(),
        address: address.to_string(),
        full_address: format!("{}, {} - {}, CEP {}", address, city, state, cep),
        phone: phone.to_string(),
        whatsapp: whatsapp.to_string(),
        email: email.to_string(),
        latitude,
        longitude,
        available: true,
        services: services.iter().map(|s| s.to_string()).collect(),
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        working_hours: WORKING_HOURS.to_string(),
        team: team.to_string(),
    }
}

pub fn default_clinics() -> Vec<Clinic> {
    vec![
        clinic(
            "campo-belo-mg",
            "Campo Belo",
            "MG",
            "Avenida Afonso Pena, 151, Centro",
            "37270-000",
            "(35) 99891-3803",
            "5535998913803",
            "campobelo@senhorsorriso.com.br",
            (-20.8889, -45.2733),
            &[
                "avaliacao-gratuita",
                "limpeza",
                "restauracao",
                "ortodontia",
                "implantodontia",
                "estetica-dental",
                "endodontia",
            ],
            &["Ortodontia", "Implantodontia", "Estética Dental"],
            "Dr. Carlos Silva e equipe",
        ),
        clinic(
            "formiga-mg",
            "Formiga",
            "MG",
            "Rua Barão de Piumhy, 198, Centro",
            "35570-128",
            "(37) 3443-0520",
            "5537999854123",
            "formiga@senhorsorriso.com.br",
            (-20.4642, -45.4267),
            &[
                "avaliacao-gratuita",
                "limpeza",
                "restauracao",
                "ortodontia",
                "implantodontia",
                "periodontia",
                "odontopediatria",
            ],
            &["Periodontia", "Odontopediatria", "Próteses"],
            "Dra. Maria Santos e equipe",
        ),
        clinic(
            "itarare-sp",
            "Itararé",
            "SP",
            "Rua São Pedro, 1348 (Loja), Centro",
            "18460-009",
            "(15) 99862-0028",
            "5515998620028",
            "itarare@senhorsorriso.com.br",
            (-24.1147, -49.3314),
            &[
                "avaliacao-gratuita",
                "limpeza",
                "restauracao",
                "ortodontia",
                "implantodontia",
                "estetica-dental",
                "urgencia",
            ],
            &["Emergência 24h", "Ortodontia", "Estética"],
            "Dr. João Oliveira e equipe",
        ),
        clinic(
            "capao-bonito-sp",
            "Capão Bonito",
            "SP",
            "Rua Floriano Peixoto, 732 (\"Super Lojas\"), Centro",
            "18300-250",
            "(15) 2153-0549",
            "5515215305499",
            "capaobonito@senhorsorriso.com.br",
            (-24.0094, -48.3506),
            &[
                "avaliacao-gratuita",
                "limpeza",
                "restauracao",
                "ortodontia",
                "implantodontia",
                "proteses-fixas",
                "endodontia",
            ],
            &["Próteses Fixas", "Endodontia", "Implantes"],
            "Dr. Pedro Costa e equipe",
        ),
        clinic(
            "itapeva-sp",
            "Itapeva",
            "SP",
            "Rua Doutor Pinheiro, 558, Centro",
            "18400-005",
            "(15) 2153-0549",
            "5515215305499",
            "itapeva@senhorsorriso.com.br",
            (-23.9822, -48.8764),
            &[
                "avaliacao-gratuita",
                "limpeza",
                "restauracao",
                "ortodontia",
                "implantodontia",
                "estetica-dental",
                "periodontia",
            ],
            &["Estética Dental", "Periodontia", "Restaurações"],
            "Dra. Ana Ferreira e equipe",
        ),
    ]
}

fn service(id: &str, name: &str, description: &str, price: &str, duration: &str, category: &str) -> DentalService {
    DentalService {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price: price.to_string(),
        duration: duration.to_string(),
        category: category.to_string(),
    }
}

pub fn dental_services() -> Vec<DentalService> {
    vec![
        service("avaliacao-gratuita", "Avaliação Gratuita", "Consulta inicial completa com diagnóstico", "Gratuita", "45 min", "Preventivo"),
        service("limpeza", "Limpeza Dental", "Profilaxia completa e aplicação de flúor", "A partir de R$ 80", "30 min", "Preventivo"),
        service("restauracao", "Restauração", "Restauração em resina ou porcelana", "A partir de R$ 150", "60 min", "Restaurador"),
        service("ortodontia", "Ortodontia", "Aparelho ortodôntico fixo ou móvel", "A partir de R$ 200/mês", "Acompanhamento mensal", "Ortodontia"),
        service("implantodontia", "Implantodontia", "Implante dentário com prótese", "A partir de R$ 1.200", "90 min", "Cirúrgico"),
        service("estetica-dental", "Estética Dental", "Clareamento e facetas", "A partir de R$ 300", "60 min", "Estético"),
        service("endodontia", "Endodontia", "Tratamento de canal", "A partir de R$ 400", "90 min", "Endodontia"),
        service("periodontia", "Periodontia", "Tratamento de gengiva", "A partir de R$ 200", "45 min", "Periodontal"),
        service("odontopediatria", "Odontopediatria", "Atendimento infantil especializado", "A partir de R$ 120", "45 min", "Infantil"),
        service("proteses-fixas", "Próteses Fixas", "Coroas e pontes fixas", "A partir de R$ 800", "2 sessões", "Protético"),
        service("urgencia", "Atendimento de Urgência", "Emergência odontológica 24h", "A partir de R$ 150", "30 min", "Urgência"),
    ]
}

/// Services offered by `clinic`, in catalog order.
pub fn clinic_services(clinic: &Clinic) -> Vec<DentalService> {
    dental_services()
        .into_iter()
        .filter(|service| clinic.services.contains(&service.id))
        .collect()
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Available clinics within `max_km`, closest first.
pub fn nearest(clinics: &[Clinic], lat: f64, lng: f64, max_km: f64) -> Vec<NearbyClinic> {
    let mut nearby: Vec<NearbyClinic> = clinics
        .iter()
        .filter(|c| c.available)
        .map(|c| NearbyClinic {
            distance_km: haversine_km(lat, lng, c.latitude, c.longitude),
            clinic: c.clone(),
        })
        .filter(|n| n.distance_km <= max_km)
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}

/// Case-insensitive search over name, city, state, address and specialties.
pub fn search(clinics: &[Clinic], query: &str) -> Vec<Clinic> {
    let needle = query.trim().to_lowercase();
    clinics
        .iter()
        .filter(|c| c.available)
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.city.to_lowercase().contains(&needle)
                || c.state.to_lowercase().contains(&needle)
                || c.address.to_lowercase().contains(&needle)
                || c.specialties.iter().any(|s| s.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

pub fn clinic_stats(clinics: &[Clinic], services: &[DentalService]) -> ClinicStats {
    let mut state_breakdown = BTreeMap::new();
    for clinic in clinics.iter().filter(|c| c.available) {
        *state_breakdown.entry(clinic.state.clone()).or_insert(0) += 1;
    }

    let mut service_categories = BTreeMap::new();
    for service in services {
        *service_categories.entry(service.category.clone()).or_insert(0) += 1;
    }

    ClinicStats {
        total_clinics: clinics.iter().filter(|c| c.available).count(),
        total_services: services.len(),
        states: state_breakdown.len(),
        state_breakdown,
        service_categories,
    }
}
