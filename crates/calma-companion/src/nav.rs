/// Bottom-navigation model.
///
/// Active-tab state derives purely from the current route. The unread badge
/// on the Especialistas tab keys off store *presence* (a saved set exists),
/// not content, and is hidden while that tab is active.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pestana {
    Recursos,
    Inicio,
    Especialistas,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub id: Pestana,
    pub etiqueta: String,
    pub ruta: String,
    pub activo: bool,
    pub insignia: bool,
}

fn pestana_activa(ruta: &str) -> Pestana {
    match ruta {
        "/especialistas" => Pestana::Especialistas,
        "/recursos" => Pestana::Recursos,
        _ => Pestana::Inicio,
    }
}

pub fn nav_view(ruta_actual: &str, tiene_recomendaciones: bool) -> Vec<NavItem> {
    let activa = pestana_activa(ruta_actual);
    [
        (Pestana::Recursos, "Recursos", "/recursos"),
        (Pestana::Inicio, "Inicio", "/"),
        (Pestana::Especialistas, "Especialistas", "/especialistas"),
    ]
    .into_iter()
    .map(|(id, etiqueta, ruta)| NavItem {
        id,
        etiqueta: etiqueta.to_string(),
        ruta: ruta.to_string(),
        activo: id == activa,
        insignia: id == Pestana::Especialistas
            && tiene_recomendaciones
            && activa != Pestana::Especialistas,
    })
    .collect()
}
