/// MCP server bridging the external voice agent to the persisted store.
///
/// Exposes two tools:
/// - `guardar_especialista`: persist a specialist recommendation bundle
/// - `guardar_recurso`: persist one coping-technique snippet
///
/// Both tools are the only writers to the store. They return a plain
/// human-readable string — the agent speaks it back to the user — and never
/// surface a protocol error: any decode or write failure is logged and
/// converted into a failure string.
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info};

use calma_common::api::{DatosRecomendaciones, Recurso};
use calma_common::events::{EventBus, StoreEvent};

use crate::store::CalmaStore;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GuardarEspecialistaParams {
    /// Result bundle from the specialist search, as a JSON object or a
    /// JSON-encoded string.
    pub datos: DatosRecomendaciones,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GuardarRecursoParams {
    /// Short title for the saved technique or information.
    pub titulo: String,
    /// Full text of the technique or information.
    pub contenido: String,
    /// The user question that prompted this resource.
    pub pregunta: Option<String>,
}

const MSG_ESPECIALISTAS_OK: &str = "Especialistas guardados con éxito en el dispositivo.";
const MSG_ESPECIALISTAS_ERR: &str = "Hubo un error guardando los datos.";
const MSG_RECURSO_OK: &str = "Recurso guardado correctamente.";
const MSG_RECURSO_ERR: &str = "Hubo un error guardando el recurso.";

#[derive(Clone)]
pub struct CalmaToolServer {
    store: Arc<CalmaStore>,
    events: Arc<EventBus>,
    tool_router: ToolRouter<CalmaToolServer>,
}

impl CalmaToolServer {
    pub fn new(store: Arc<CalmaStore>, events: Arc<EventBus>) -> Self {
        Self {
            store,
            events,
            tool_router: Self::tool_router(),
        }
    }

    /// Normalize, persist and announce a recommendation bundle. Returns the
    /// feedback string for the agent.
    fn guardar_especialista_impl(&self, datos: DatosRecomendaciones) -> String {
        let set = match datos.normalizar() {
            Ok(set) => set,
            Err(e) => {
                error!(error = %e, tool = "guardar_especialista", "payload rejected");
                return MSG_ESPECIALISTAS_ERR.to_string();
            }
        };

        if let Err(e) = self.store.write_recomendaciones(&set) {
            error!(error = %e, tool = "guardar_especialista", "store write failed");
            return MSG_ESPECIALISTAS_ERR.to_string();
        }

        info!(
            total_resultados = set.total_resultados,
            alerta_crisis = set.alerta_crisis,
            "recommendation set saved"
        );
        self.events
            .publish(StoreEvent::RecomendacionesActualizadas(set));
        MSG_ESPECIALISTAS_OK.to_string()
    }

    /// Stamp, append and announce one resource. Returns the feedback string
    /// for the agent.
    fn guardar_recurso_impl(&self, params: GuardarRecursoParams) -> String {
        let recurso = Recurso {
            titulo: params.titulo,
            contenido: params.contenido,
            pregunta: params.pregunta.unwrap_or_default(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        if let Err(e) = self.store.append_recurso(&recurso) {
            error!(error = %e, tool = "guardar_recurso", "store write failed");
            return MSG_RECURSO_ERR.to_string();
        }

        info!(titulo = %recurso.titulo, "resource saved");
        self.events.publish(StoreEvent::RecursosActualizados);
        MSG_RECURSO_OK.to_string()
    }
}

#[tool_router]
impl CalmaToolServer {
    #[tool(description = "Guarda en el dispositivo el paquete completo de especialistas \
recomendados (objeto JSON o cadena JSON). Reemplaza cualquier recomendación anterior.")]
    async fn guardar_especialista(
        &self,
        Parameters(params): Parameters<GuardarEspecialistaParams>,
    ) -> String {
        self.guardar_especialista_impl(params.datos)
    }

    #[tool(description = "Guarda una técnica o información útil en la caja de herramientas \
del usuario. Requiere titulo y contenido; pregunta es opcional.")]
    async fn guardar_recurso(
        &self,
        Parameters(params): Parameters<GuardarRecursoParams>,
    ) -> String {
        self.guardar_recurso_impl(params)
    }
}

#[tool_handler]
impl ServerHandler for CalmaToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "calma-companion".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Calma companion server. Call guardar_especialista with the full \
recommendation bundle after a specialist search, and guardar_recurso after sharing a \
coping technique or useful information. Both tools reply with a short Spanish sentence \
to read back to the user."
                    .to_string(),
            ),
        }
    }
}
