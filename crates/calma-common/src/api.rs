use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CommonError;

/// One recommended mental-health specialist within a result set.
///
/// Field names are the upstream wire format and are stored verbatim. Rating
/// and review count are display-only values sourced upstream, never
/// recomputed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Especialista {
    /// Identifier, unique within one result set.
    pub id: String,
    pub nombre: String,
    /// Professional type, e.g. "Psicóloga Clínica".
    pub tipo_profesional: String,
    /// "presencial", "en línea" or "híbrida".
    pub modalidad: String,
    pub ubicacion: Ubicacion,
    /// Free-text cost description, e.g. "$800 - $1,200 MXN por sesión".
    pub costo: String,
    pub costo_min: Option<f64>,
    /// Rating on a 0–5 scale.
    pub rating: f64,
    /// Review count.
    pub resenas: u32,
    pub especializaciones: Vec<String>,
    pub grupo_etario: Vec<String>,
    pub contacto: Contacto,
    pub disponibilidad: String,
    pub metodos_pago: Vec<String>,
    /// Optional relevance/similarity scores from the upstream search.
    pub scores: Option<Scores>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ubicacion {
    pub colonia: Option<String>,
    pub delegacion: Option<String>,
    pub latitud: Option<String>,
    pub longitud: Option<String>,
}

/// Contact channels, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contacto {
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub relevance: f64,
    pub similarity: f64,
}

/// The full result bundle of one specialist-search tool invocation.
///
/// Exactly one of these exists at a time: each `guardar_especialista` call
/// replaces the stored value wholesale (last write wins, no history).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recomendaciones {
    /// Symptom that originated the search, when the agent reported one.
    pub sintoma: Option<String>,
    /// Signals that the user's input warrants showing emergency contacts.
    pub alerta_crisis: bool,
    pub nivel_urgencia: Option<String>,
    pub numeros_emergencia: Option<NumerosEmergencia>,
    /// Search parameters the agent used, echoed back for display.
    pub parametros: Option<Parametros>,
    /// Display-only count sourced upstream. SHOULD equal `resultados.len()`
    /// but is not enforced.
    pub total_resultados: u32,
    /// Ordered results; index 0 is the most recommended.
    pub resultados: Vec<Especialista>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumerosEmergencia {
    /// Country crisis line, possibly annotated, e.g. "800-911-2000 (24 horas)".
    pub mexico: Option<String>,
    pub emergencia_general: Option<String>,
    pub mensaje: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parametros {
    pub sintoma: Option<String>,
    pub genero: Option<String>,
    pub presupuesto: Option<String>,
    pub ubicacion: Option<String>,
}

/// One saved coping-technique or informational snippet.
///
/// Appended to an ordered sequence in save order; never mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurso {
    pub titulo: String,
    pub contenido: String,
    /// The user question this resource answered. Empty when not reported.
    #[serde(default)]
    pub pregunta: String,
    /// ISO-8601 save time, stamped by the tool bridge.
    pub timestamp: String,
}

/// Inbound `datos` payload for `guardar_especialista`.
///
/// The agent may send the result bundle either as a structured JSON object or
/// as a JSON-encoded string; both forms are accepted and resolved by a single
/// normalization step at the tool boundary.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DatosRecomendaciones {
    Texto(String),
    Estructurado(serde_json::Value),
}

impl DatosRecomendaciones {
    /// Resolve either payload form into a validated [`Recomendaciones`].
    pub fn normalizar(self) -> Result<Recomendaciones, CommonError> {
        match self {
            Self::Texto(raw) => serde_json::from_str(&raw).map_err(|source| CommonError::Decode {
                context: "datos (cadena JSON)".to_string(),
                source,
            }),
            Self::Estructurado(value) => {
                serde_json::from_value(value).map_err(|source| CommonError::Decode {
                    context: "datos (objeto)".to_string(),
                    source,
                })
            }
        }
    }
}
