/// Pure projections from stored records to serializable view models.
///
/// These encode the page-level rendering rules: empty states, the crisis
/// alert block, the "Recomendado" marker on the first result, specialization
/// tag collapse, contact links, and the newest-first display order for
/// resources. Results are never re-sorted or filtered here — ordering comes
/// entirely from the stored payload.
use serde::Serialize;

use calma_common::api::{Especialista, Recomendaciones, Recurso, Ubicacion};

/// Tags beyond this count collapse into a "+N más" indicator.
const MAX_ETIQUETAS_VISIBLES: usize = 5;

/// Sentinel the upstream agent sends for unset search parameters.
const NO_ESPECIFICADO: &str = "no especificado";

/// A presentation-only link (`tel:`, `mailto:` or `https://`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enlace {
    pub etiqueta: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EstadoVacio {
    pub titulo: String,
    pub mensaje: String,
}

// --- Especialistas page ---

#[derive(Debug, Clone, Serialize)]
pub struct EspecialistasView {
    /// Rendered above the content whenever the stored set carries the crisis
    /// flag, regardless of result count.
    pub alerta_crisis: Option<AlertaCrisis>,
    pub contenido: ContenidoEspecialistas,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "estado", rename_all = "snake_case")]
pub enum ContenidoEspecialistas {
    Vacio(EstadoVacio),
    Resultados(ListaEspecialistas),
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertaCrisis {
    pub titulo: String,
    pub mensaje: Option<String>,
    pub telefonos: Vec<Enlace>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListaEspecialistas {
    pub encabezado: String,
    /// Search-parameter chips, skipping unset ("no especificado") values.
    pub busqueda: Vec<ChipBusqueda>,
    pub tarjetas: Vec<TarjetaEspecialista>,
    pub pie_emergencia: Enlace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChipBusqueda {
    pub etiqueta: String,
    pub valor: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TarjetaEspecialista {
    /// Set on the first card only; index 0 is the most recommended.
    pub recomendado: bool,
    pub nombre: String,
    pub tipo_profesional: String,
    pub modalidad: String,
    pub rating: f64,
    pub resenas: u32,
    pub ubicacion: String,
    pub costo: String,
    pub especializaciones: Vec<String>,
    /// "+N más" when more than five tags exist.
    pub especializaciones_extra: Option<String>,
    pub disponibilidad: String,
    pub metodos_pago: Vec<String>,
    pub contacto: Vec<Enlace>,
}

/// Project the stored recommendation set into the Especialistas page.
pub fn especialistas_view(datos: Option<&Recomendaciones>) -> EspecialistasView {
    let alerta_crisis = datos.and_then(alerta_crisis);

    let contenido = match datos {
        None => ContenidoEspecialistas::Vacio(sin_recomendaciones()),
        Some(set) if set.total_resultados == 0 => {
            ContenidoEspecialistas::Vacio(sin_recomendaciones())
        }
        Some(set) => ContenidoEspecialistas::Resultados(ListaEspecialistas {
            encabezado: encabezado(set.total_resultados),
            busqueda: chips_busqueda(set),
            tarjetas: set
                .resultados
                .iter()
                .enumerate()
                .map(|(i, esp)| tarjeta_especialista(esp, i == 0))
                .collect(),
            pie_emergencia: Enlace {
                etiqueta: "800-911-2000".to_string(),
                href: "tel:800-911-2000".to_string(),
            },
        }),
    };

    EspecialistasView {
        alerta_crisis,
        contenido,
    }
}

fn sin_recomendaciones() -> EstadoVacio {
    EstadoVacio {
        titulo: "Sin Recomendaciones".to_string(),
        mensaje: "Aún no hay especialistas recomendados. Habla con Calma y automáticamente \
guardará los especialistas que te recomiende aquí."
            .to_string(),
    }
}

fn encabezado(total: u32) -> String {
    let plural = if total == 1 { "" } else { "s" };
    format!("{total} especialista{plural} encontrado{plural}")
}

fn alerta_crisis(set: &Recomendaciones) -> Option<AlertaCrisis> {
    if !set.alerta_crisis {
        return None;
    }

    let mut telefonos = Vec::new();
    let mut mensaje = None;
    if let Some(numeros) = &set.numeros_emergencia {
        mensaje = numeros.mensaje.clone();
        if let Some(mexico) = &numeros.mexico {
            // The number may be annotated ("800-911-2000 (24 horas)");
            // only the first token is dialable.
            let marcable = mexico.split_whitespace().next().unwrap_or(mexico);
            telefonos.push(Enlace {
                etiqueta: mexico.clone(),
                href: format!("tel:{marcable}"),
            });
        }
        if let Some(general) = &numeros.emergencia_general {
            telefonos.push(Enlace {
                etiqueta: general.clone(),
                href: format!("tel:{general}"),
            });
        }
    }

    Some(AlertaCrisis {
        titulo: match &set.nivel_urgencia {
            Some(nivel) => format!("Nivel de Urgencia: {nivel}"),
            None => "Nivel de Urgencia".to_string(),
        },
        mensaje,
        telefonos,
    })
}

fn chips_busqueda(set: &Recomendaciones) -> Vec<ChipBusqueda> {
    let Some(parametros) = &set.parametros else {
        return Vec::new();
    };
    [
        ("Síntoma", &parametros.sintoma),
        ("Género", &parametros.genero),
        ("Presupuesto", &parametros.presupuesto),
        ("Ubicación", &parametros.ubicacion),
    ]
    .into_iter()
    .filter_map(|(etiqueta, valor)| {
        let valor = valor.as_deref()?;
        if valor == NO_ESPECIFICADO {
            return None;
        }
        Some(ChipBusqueda {
            etiqueta: etiqueta.to_string(),
            valor: valor.to_string(),
        })
    })
    .collect()
}

fn tarjeta_especialista(esp: &Especialista, recomendado: bool) -> TarjetaEspecialista {
    let visibles = esp
        .especializaciones
        .iter()
        .take(MAX_ETIQUETAS_VISIBLES)
        .cloned()
        .collect();
    let extra = esp.especializaciones.len().saturating_sub(MAX_ETIQUETAS_VISIBLES);

    let mut contacto = Vec::new();
    if let Some(telefono) = &esp.contacto.telefono {
        contacto.push(Enlace {
            etiqueta: "Llamar".to_string(),
            href: format!("tel:{telefono}"),
        });
    }
    if let Some(email) = &esp.contacto.email {
        contacto.push(Enlace {
            etiqueta: "Email".to_string(),
            href: format!("mailto:{email}"),
        });
    }
    if let Some(website) = &esp.contacto.website {
        let sin_esquema = website
            .strip_prefix("https://")
            .or_else(|| website.strip_prefix("http://"))
            .unwrap_or(website);
        contacto.push(Enlace {
            etiqueta: "Sitio Web".to_string(),
            href: format!("https://{sin_esquema}"),
        });
    }

    TarjetaEspecialista {
        recomendado,
        nombre: esp.nombre.clone(),
        tipo_profesional: esp.tipo_profesional.clone(),
        modalidad: esp.modalidad.clone(),
        rating: esp.rating,
        resenas: esp.resenas,
        ubicacion: ubicacion_resumen(&esp.ubicacion),
        costo: esp.costo.clone(),
        especializaciones: visibles,
        especializaciones_extra: (extra > 0).then(|| format!("+{extra} más")),
        disponibilidad: esp.disponibilidad.clone(),
        metodos_pago: esp.metodos_pago.clone(),
        contacto,
    }
}

fn ubicacion_resumen(ubicacion: &Ubicacion) -> String {
    let zona = ubicacion.delegacion.as_deref().unwrap_or("Online");
    match &ubicacion.colonia {
        Some(colonia) => format!("{colonia}, {zona}"),
        None => zona.to_string(),
    }
}

// --- Recursos page ---

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "estado", rename_all = "snake_case")]
pub enum RecursosView {
    Vacio(EstadoVacio),
    Lista { tarjetas: Vec<TarjetaRecurso> },
}

#[derive(Debug, Clone, Serialize)]
pub struct TarjetaRecurso {
    pub titulo: String,
    pub contenido: String,
    pub fecha: String,
    /// Shown beneath a divider when the resource answered a question,
    /// e.g. `Respuesta a: "¿cómo me calmo?"`.
    pub pregunta: Option<String>,
}

/// Project the stored resources, newest first. The stored order is not
/// mutated; display order is a reversal.
pub fn recursos_view(recursos: &[Recurso]) -> RecursosView {
    if recursos.is_empty() {
        return RecursosView::Vacio(EstadoVacio {
            titulo: "Tu caja de herramientas está vacía".to_string(),
            mensaje: "Cuando practiquemos técnicas o encuentre información útil, la guardaré \
aquí."
                .to_string(),
        });
    }

    RecursosView::Lista {
        tarjetas: recursos.iter().rev().map(tarjeta_recurso).collect(),
    }
}

fn tarjeta_recurso(recurso: &Recurso) -> TarjetaRecurso {
    TarjetaRecurso {
        titulo: recurso.titulo.clone(),
        contenido: recurso.contenido.clone(),
        fecha: fecha_corta(&recurso.timestamp),
        pregunta: (!recurso.pregunta.is_empty())
            .then(|| format!("Respuesta a: \"{}\"", recurso.pregunta)),
    }
}

fn fecha_corta(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.date_naive().format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

// --- Home page cards ---

#[derive(Debug, Clone, Serialize)]
pub struct InicioView {
    /// Up to three most recommended specialists, in stored order.
    pub especialistas_recientes: Vec<TarjetaInicioEspecialista>,
    /// Up to two most recent resources, newest first.
    pub recursos_recientes: Vec<TarjetaInicioRecurso>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TarjetaInicioEspecialista {
    pub nombre: String,
    pub especialidad: String,
    pub costo: Option<String>,
    pub ubicacion: Option<String>,
    pub telefono: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TarjetaInicioRecurso {
    pub titulo: String,
    pub contenido: String,
}

pub fn inicio_view(datos: Option<&Recomendaciones>, recursos: &[Recurso]) -> InicioView {
    let especialistas_recientes = datos
        .map(|set| {
            set.resultados
                .iter()
                .take(3)
                .map(|esp| TarjetaInicioEspecialista {
                    nombre: esp.nombre.clone(),
                    especialidad: esp.tipo_profesional.clone(),
                    costo: (!esp.costo.is_empty()).then(|| esp.costo.clone()),
                    ubicacion: (esp.ubicacion.colonia.is_some()
                        || esp.ubicacion.delegacion.is_some())
                    .then(|| ubicacion_resumen(&esp.ubicacion)),
                    telefono: esp.contacto.telefono.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    InicioView {
        especialistas_recientes,
        recursos_recientes: recursos
            .iter()
            .rev()
            .take(2)
            .map(|r| TarjetaInicioRecurso {
                titulo: r.titulo.clone(),
                contenido: r.contenido.clone(),
            })
            .collect(),
    }
}

// --- Historial page ---

#[derive(Debug, Clone, Serialize)]
pub struct HistorialView {
    pub titulo: String,
    pub mensaje: String,
    pub detalle: String,
}

/// The conversation-history page is a placeholder.
pub fn historial_view() -> HistorialView {
    HistorialView {
        titulo: "Historial de Conversaciones".to_string(),
        mensaje: "Próximamente".to_string(),
        detalle: "Aquí podrás ver el historial de tus conversaciones".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calma_common::api::{Contacto, NumerosEmergencia, Parametros};

    fn especialista(nombre: &str, tags: &[&str]) -> Especialista {
        Especialista {
            id: nombre.to_lowercase(),
            nombre: nombre.to_string(),
            tipo_profesional: "Psicólogo".to_string(),
            modalidad: "en línea".to_string(),
            costo: "$800 MXN".to_string(),
            rating: 4.5,
            resenas: 10,
            especializaciones: tags.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn recurso(titulo: &str, pregunta: &str) -> Recurso {
        Recurso {
            titulo: titulo.to_string(),
            contenido: "Inhala 4s...".to_string(),
            pregunta: pregunta.to_string(),
            timestamp: "2026-08-06T12:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn sin_datos_muestra_estado_vacio() {
        let view = especialistas_view(None);
        assert!(view.alerta_crisis.is_none());
        match view.contenido {
            ContenidoEspecialistas::Vacio(vacio) => {
                assert_eq!(vacio.titulo, "Sin Recomendaciones")
            }
            _ => panic!("expected empty state"),
        }
    }

    #[test]
    fn cero_resultados_muestra_estado_vacio_no_lista() {
        let set = Recomendaciones {
            total_resultados: 0,
            resultados: vec![],
            ..Default::default()
        };
        match especialistas_view(Some(&set)).contenido {
            ContenidoEspecialistas::Vacio(_) => {}
            _ => panic!("expected empty state for zero results"),
        }
    }

    #[test]
    fn alerta_crisis_se_muestra_incluso_sin_resultados() {
        let set = Recomendaciones {
            alerta_crisis: true,
            nivel_urgencia: Some("alto".to_string()),
            numeros_emergencia: Some(NumerosEmergencia {
                mexico: Some("800-911-2000 (24 horas)".to_string()),
                emergencia_general: Some("911".to_string()),
                mensaje: Some("No estás solo.".to_string()),
            }),
            total_resultados: 0,
            ..Default::default()
        };
        let view = especialistas_view(Some(&set));
        let alerta = view.alerta_crisis.expect("crisis block");
        assert_eq!(alerta.titulo, "Nivel de Urgencia: alto");
        assert_eq!(alerta.mensaje.as_deref(), Some("No estás solo."));
        assert_eq!(
            alerta.telefonos,
            vec![
                Enlace {
                    etiqueta: "800-911-2000 (24 horas)".to_string(),
                    href: "tel:800-911-2000".to_string(),
                },
                Enlace {
                    etiqueta: "911".to_string(),
                    href: "tel:911".to_string(),
                },
            ]
        );
        assert!(matches!(view.contenido, ContenidoEspecialistas::Vacio(_)));
    }

    #[test]
    fn primer_resultado_lleva_marcador_recomendado() {
        let set = Recomendaciones {
            total_resultados: 2,
            resultados: vec![especialista("Ana", &[]), especialista("Luis", &[])],
            ..Default::default()
        };
        match especialistas_view(Some(&set)).contenido {
            ContenidoEspecialistas::Resultados(lista) => {
                assert_eq!(lista.encabezado, "2 especialistas encontrados");
                assert!(lista.tarjetas[0].recomendado);
                assert!(!lista.tarjetas[1].recomendado);
                // Stored order is display order.
                assert_eq!(lista.tarjetas[0].nombre, "Ana");
                assert_eq!(lista.tarjetas[1].nombre, "Luis");
            }
            _ => panic!("expected results"),
        }
    }

    #[test]
    fn etiquetas_extra_se_colapsan() {
        let set = Recomendaciones {
            total_resultados: 1,
            resultados: vec![especialista(
                "Ana",
                &["a", "b", "c", "d", "e", "f", "g"],
            )],
            ..Default::default()
        };
        match especialistas_view(Some(&set)).contenido {
            ContenidoEspecialistas::Resultados(lista) => {
                let tarjeta = &lista.tarjetas[0];
                assert_eq!(tarjeta.especializaciones.len(), 5);
                assert_eq!(tarjeta.especializaciones_extra.as_deref(), Some("+2 más"));
            }
            _ => panic!("expected results"),
        }
    }

    #[test]
    fn enlaces_de_contacto_usan_esquemas_correctos() {
        let mut esp = especialista("Ana", &[]);
        esp.contacto = Contacto {
            telefono: Some("555-0100".to_string()),
            email: Some("ana@example.mx".to_string()),
            website: Some("http://ana.example.mx".to_string()),
        };
        let tarjeta = tarjeta_especialista(&esp, true);
        let hrefs: Vec<&str> = tarjeta.contacto.iter().map(|e| e.href.as_str()).collect();
        assert_eq!(
            hrefs,
            ["tel:555-0100", "mailto:ana@example.mx", "https://ana.example.mx"]
        );
    }

    #[test]
    fn chips_omiten_no_especificado() {
        let set = Recomendaciones {
            total_resultados: 1,
            resultados: vec![especialista("Ana", &[])],
            parametros: Some(Parametros {
                sintoma: Some("ansiedad".to_string()),
                genero: Some(NO_ESPECIFICADO.to_string()),
                presupuesto: None,
                ubicacion: Some("Coyoacán".to_string()),
            }),
            ..Default::default()
        };
        match especialistas_view(Some(&set)).contenido {
            ContenidoEspecialistas::Resultados(lista) => {
                let etiquetas: Vec<&str> =
                    lista.busqueda.iter().map(|c| c.etiqueta.as_str()).collect();
                assert_eq!(etiquetas, ["Síntoma", "Ubicación"]);
            }
            _ => panic!("expected results"),
        }
    }

    #[test]
    fn recursos_se_muestran_del_mas_nuevo_al_mas_viejo() {
        let almacenados = vec![recurso("primero", ""), recurso("segundo", "")];
        match recursos_view(&almacenados) {
            RecursosView::Lista { tarjetas } => {
                assert_eq!(tarjetas[0].titulo, "segundo");
                assert_eq!(tarjetas[1].titulo, "primero");
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn recursos_vacios_muestran_caja_de_herramientas() {
        match recursos_view(&[]) {
            RecursosView::Vacio(vacio) => {
                assert_eq!(vacio.titulo, "Tu caja de herramientas está vacía")
            }
            _ => panic!("expected empty state"),
        }
    }

    #[test]
    fn tarjeta_de_recurso_cita_la_pregunta() {
        let almacenados = vec![recurso("Respiración 4-4-4", "¿cómo me calmo?")];
        match recursos_view(&almacenados) {
            RecursosView::Lista { tarjetas } => {
                assert_eq!(tarjetas.len(), 1);
                assert_eq!(tarjetas[0].titulo, "Respiración 4-4-4");
                assert_eq!(
                    tarjetas[0].pregunta.as_deref(),
                    Some("Respuesta a: \"¿cómo me calmo?\"")
                );
                assert_eq!(tarjetas[0].fecha, "06/08/2026");
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn pregunta_vacia_no_genera_seccion() {
        let almacenados = vec![recurso("Diario", "")];
        match recursos_view(&almacenados) {
            RecursosView::Lista { tarjetas } => assert!(tarjetas[0].pregunta.is_none()),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn inicio_limita_tarjetas_recientes() {
        let set = Recomendaciones {
            total_resultados: 4,
            resultados: vec![
                especialista("A", &[]),
                especialista("B", &[]),
                especialista("C", &[]),
                especialista("D", &[]),
            ],
            ..Default::default()
        };
        let recursos = vec![recurso("r1", ""), recurso("r2", ""), recurso("r3", "")];
        let view = inicio_view(Some(&set), &recursos);
        assert_eq!(view.especialistas_recientes.len(), 3);
        assert_eq!(view.especialistas_recientes[0].nombre, "A");
        assert_eq!(view.recursos_recientes.len(), 2);
        assert_eq!(view.recursos_recientes[0].titulo, "r3");
    }
}
