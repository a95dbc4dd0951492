/// Typed persistence layer for the two Calma records.
///
/// Key schema (one JSON document per key):
/// - `calma_recomendaciones` — one `Recomendaciones` object, replaced
///   wholesale on every save (last write wins, no history)
/// - `calma_recursos` — append-only array of `Recurso`, insertion order =
///   chronological order
///
/// Reads fail soft: an absent or undecodable document is logged and treated
/// as "no data". The tool bridge is the only writer; view endpoints only
/// read.
use tracing::warn;

use calma_common::api::{Recomendaciones, Recurso};
use calma_common::error::CommonError;
use calma_common::storage::JsonStore;

const KEY_RECOMENDACIONES: &str = "calma_recomendaciones";
const KEY_RECURSOS: &str = "calma_recursos";

pub struct CalmaStore {
    inner: JsonStore,
}

impl CalmaStore {
    pub fn new(inner: JsonStore) -> Self {
        Self { inner }
    }

    /// The stored recommendation set, or `None` when absent or undecodable.
    pub fn read_recomendaciones(&self) -> Option<Recomendaciones> {
        let raw = self.inner.read(KEY_RECOMENDACIONES)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| {
                warn!(error = %e, key = KEY_RECOMENDACIONES, "stored document undecodable, treating as absent")
            })
            .ok()
    }

    /// Replace the stored recommendation set.
    pub fn write_recomendaciones(&self, set: &Recomendaciones) -> Result<(), CommonError> {
        let raw = serde_json::to_string(set).map_err(|source| CommonError::Decode {
            context: KEY_RECOMENDACIONES.to_string(),
            source,
        })?;
        self.inner.write(KEY_RECOMENDACIONES, &raw)
    }

    /// All saved resources in insertion order. Empty when absent or
    /// undecodable.
    pub fn read_recursos(&self) -> Vec<Recurso> {
        let Some(raw) = self.inner.read(KEY_RECURSOS) else {
            return Vec::new();
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| {
                warn!(error = %e, key = KEY_RECURSOS, "stored document undecodable, treating as empty")
            })
            .unwrap_or_default()
    }

    /// Append one resource to the stored sequence.
    pub fn append_recurso(&self, recurso: &Recurso) -> Result<(), CommonError> {
        let mut recursos = self.read_recursos();
        recursos.push(recurso.clone());
        let raw = serde_json::to_string(&recursos).map_err(|source| CommonError::Decode {
            context: KEY_RECURSOS.to_string(),
            source,
        })?;
        self.inner.write(KEY_RECURSOS, &raw)
    }

    /// Whether a recommendation set has ever been saved. Presence only — a
    /// zero-result set still counts (the nav badge keys off this).
    pub fn has_recomendaciones(&self) -> bool {
        self.inner.contains(KEY_RECOMENDACIONES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calma_common::api::Especialista;

    fn store_in(dir: &std::path::Path) -> CalmaStore {
        CalmaStore::new(JsonStore::open(dir).unwrap())
    }

    #[test]
    fn recomendaciones_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.read_recomendaciones().is_none());
        assert!(!store.has_recomendaciones());

        let set = Recomendaciones {
            sintoma: Some("ansiedad".to_string()),
            total_resultados: 1,
            resultados: vec![Especialista {
                id: "esp-1".to_string(),
                nombre: "Dra. Ana Torres".to_string(),
                rating: 4.8,
                resenas: 32,
                ..Default::default()
            }],
            ..Default::default()
        };
        store.write_recomendaciones(&set).unwrap();
        assert_eq!(store.read_recomendaciones(), Some(set));
        assert!(store.has_recomendaciones());
    }

    #[test]
    fn second_write_replaces_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .write_recomendaciones(&Recomendaciones {
                total_resultados: 5,
                ..Default::default()
            })
            .unwrap();
        store
            .write_recomendaciones(&Recomendaciones {
                total_resultados: 2,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.read_recomendaciones().unwrap().total_resultados, 2);
    }

    #[test]
    fn recursos_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.read_recursos().is_empty());

        for titulo in ["primero", "segundo", "tercero"] {
            store
                .append_recurso(&Recurso {
                    titulo: titulo.to_string(),
                    contenido: "...".to_string(),
                    pregunta: String::new(),
                    timestamp: "2026-08-06T12:00:00.000Z".to_string(),
                })
                .unwrap();
        }

        let titulos: Vec<String> = store.read_recursos().into_iter().map(|r| r.titulo).collect();
        assert_eq!(titulos, ["primero", "segundo", "tercero"]);
    }

    #[test]
    fn undecodable_documents_fail_soft() {
        let dir = tempfile::tempdir().unwrap();
        let inner = JsonStore::open(dir.path()).unwrap();
        inner.write(KEY_RECOMENDACIONES, "{ not json").unwrap();
        inner.write(KEY_RECURSOS, "42").unwrap();

        let store = store_in(dir.path());
        assert!(store.read_recomendaciones().is_none());
        assert!(store.read_recursos().is_empty());
        // Presence is about the document existing, not decoding.
        assert!(store.has_recomendaciones());
    }
}
