/// Local HTTP surface for the view projections.
///
/// Every page endpoint hydrates from the persisted store at request time;
/// `/api/eventos` is the live-update path — an SSE stream fed by the event
/// fan-out. Clients open a page (one read) and subscribe (SSE) for the rest
/// of its lifetime; closing the connection drops the subscription.
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use calma_common::events::{EventBus, StoreEvent};

use crate::nav::{self, NavItem};
use crate::store::CalmaStore;
use crate::views::{self, EspecialistasView, HistorialView, InicioView, RecursosView};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CalmaStore>,
    pub events: Arc<EventBus>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/inicio", get(inicio))
        .route("/api/especialistas", get(especialistas))
        .route("/api/recursos", get(recursos))
        .route("/api/historial", get(historial))
        .route("/api/nav", get(nav_shell))
        .route("/api/eventos", get(eventos))
        .with_state(state)
}

/// Bind and serve the view API until the process exits.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(listen_addr = %addr, "view API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn inicio(State(state): State<AppState>) -> Json<InicioView> {
    let datos = state.store.read_recomendaciones();
    let recursos = state.store.read_recursos();
    Json(views::inicio_view(datos.as_ref(), &recursos))
}

async fn especialistas(State(state): State<AppState>) -> Json<EspecialistasView> {
    let datos = state.store.read_recomendaciones();
    Json(views::especialistas_view(datos.as_ref()))
}

async fn recursos(State(state): State<AppState>) -> Json<RecursosView> {
    let recursos = state.store.read_recursos();
    Json(views::recursos_view(&recursos))
}

async fn historial() -> Json<HistorialView> {
    Json(views::historial_view())
}

#[derive(Debug, Deserialize)]
struct NavQuery {
    /// Current route of the requesting page, e.g. "/especialistas".
    ruta: Option<String>,
}

async fn nav_shell(
    State(state): State<AppState>,
    Query(query): Query<NavQuery>,
) -> Json<Vec<NavItem>> {
    let ruta = query.ruta.as_deref().unwrap_or("/");
    Json(nav::nav_view(ruta, state.store.has_recomendaciones()))
}

/// SSE relay of store events. Event `recomendaciones` carries the new set as
/// JSON; event `recursos` carries no payload — clients re-fetch the page.
async fn eventos(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.events.subscribe();
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(StoreEvent::RecomendacionesActualizadas(set)) => {
                    yield Ok(Event::default()
                        .event("recomendaciones")
                        .json_data(&set)
                        .unwrap_or_else(|_| {
                            Event::default().event("recomendaciones").data("{}")
                        }));
                }
                Ok(StoreEvent::RecursosActualizados) => {
                    yield Ok(Event::default().event("recursos").data(""));
                }
                // No replay: a lagged subscriber skips the missed events.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    };
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calma_common::api::Recomendaciones;
    use calma_common::storage::JsonStore;

    fn state_in(dir: &std::path::Path) -> AppState {
        AppState {
            store: Arc::new(CalmaStore::new(JsonStore::open(dir).unwrap())),
            events: Arc::new(EventBus::new()),
        }
    }

    #[tokio::test]
    async fn inicio_sin_datos_devuelve_listas_vacias() {
        let dir = tempfile::tempdir().unwrap();
        let Json(view) = inicio(State(state_in(dir.path()))).await;
        assert!(view.especialistas_recientes.is_empty());
        assert!(view.recursos_recientes.is_empty());
    }

    #[tokio::test]
    async fn nav_sin_ruta_marca_inicio() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        state
            .store
            .write_recomendaciones(&Recomendaciones::default())
            .unwrap();

        let Json(items) = nav_shell(State(state), Query(NavQuery { ruta: None })).await;
        let inicio = items.iter().find(|i| i.ruta == "/").unwrap();
        assert!(inicio.activo);
        // Presence semantics: even an empty saved set raises the badge.
        let especialistas = items.iter().find(|i| i.ruta == "/especialistas").unwrap();
        assert!(especialistas.insignia);
    }
}
