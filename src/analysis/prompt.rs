use crate::aggregate::{Aggregation, UrlCount};
use crate::config::{ReportConfig, Variant};

const ROLE: &str = "Eres un experto en SEO técnico. Analiza los siguientes datos de un rastreo de sitio web y proporciona un análisis ejecutivo conciso y accionable.";

const REQUIRED_STRUCTURE: &str = "\
ESTRUCTURA REQUERIDA:

**DIAGNÓSTICO**
Evaluación directa del estado del sitio en 2-3 líneas máximo.

**PROBLEMAS IDENTIFICADOS**
Lista los problemas en orden de severidad (usa checkboxes):
- [ ] Problema 1
- [ ] Problema 2
- [ ] Problema 3

**PLAN DE ACCIÓN (Por Orden de Prioridad)**
Acciones específicas y concretas ordenadas por prioridad (usa numeración):

1. **Prioridad Crítica**
   - [ ] Acción específica 1
   - [ ] Acción específica 2

2. **Prioridad Alta**
   - [ ] Acción específica 1
   - [ ] Acción específica 2

3. **Prioridad Media**
   - [ ] Acción específica 1
   - [ ] Acción específica 2

**IMPACTO EN SEO**
Breve explicación (2-3 bullets) de cómo esto afecta el posicionamiento.

IMPORTANTE:
- Sé conciso y directo
- NO menciones herramientas de rastreo
- NO incluyas tiempos estimados
- Usa formato checklist para acciones
- Enfócate en QUÉ hacer, no en CUÁNDO hacerlo";

/// Build the analysis prompt from one aggregation.
///
/// The extended variant adds 308 and 500 counts, the most linked
/// destinations and the distinct anchor texts of broken links.
pub fn build(aggregation: &Aggregation<'_>, variant: Variant, config: &ReportConfig) -> String {
    let extended = variant.extended_prompt();
    let mut prompt = String::new();

    prompt.push_str(ROLE);
    prompt.push_str("\n\nDATOS DEL SITIO:\n");
    prompt.push_str(&format!("- Total de enlaces problemáticos: {}\n", aggregation.row_count()));
    if extended {
        prompt.push_str(&format!("- URLs de destino únicas con problemas: {}\n", aggregation.distinct_destinations()));
    }
    prompt.push_str(&format!("- Errores 404 (páginas no encontradas): {}\n", aggregation.count(404)));
    prompt.push_str(&format!("- Errores 403 (acceso prohibido): {}\n", aggregation.count(403)));
    prompt.push_str(&format!("- Errores 400 (bad request): {}\n", aggregation.count(400)));
    if extended {
        prompt.push_str(&format!("- Errores 500 (error del servidor): {}\n", aggregation.count(500)));
    }
    prompt.push_str(&format!("- Redirecciones 301 (permanentes): {}\n", aggregation.count(301)));
    prompt.push_str(&format!("- Redirecciones 302 (temporales): {}\n", aggregation.count(302)));
    if extended {
        prompt.push_str(&format!("- Redirecciones 308 (permanentes): {}\n", aggregation.count(308)));
    }

    prompt.push_str("\nPÁGINAS CON MÁS PROBLEMAS:\n");
    prompt.push_str(&url_lines(
        &aggregation.top_sources(config.top_n),
        "enlaces problemáticos",
    ));

    if extended {
        prompt.push_str("\nURLS DE DESTINO MÁS ENLAZADAS:\n");
        prompt.push_str(&url_lines(
            &aggregation.top_destinations(config.top_n),
            "enlaces",
        ));

        prompt.push_str("\nTEXTOS DE ENLACE QUE APUNTAN A 404:\n");
        let anchors = aggregation.not_found_anchors(config.anchor_cap);
        if anchors.items.is_empty() {
            prompt.push_str("No disponible\n");
        }
        for anchor in &anchors.items {
            prompt.push_str(&format!("- \"{}\"\n", anchor));
        }
        if anchors.omitted > 0 {
            prompt.push_str(&format!("- ... y {} más\n", anchors.omitted));
        }
    }

    prompt.push('\n');
    prompt.push_str(REQUIRED_STRUCTURE);
    prompt
}

fn url_lines(urls: &[UrlCount], unit: &str) -> String {
    if urls.is_empty() {
        return "No disponible\n".to_string();
    }
    let mut out = String::new();
    for entry in urls {
        out.push_str(&format!("- {}: {} {}\n", entry.url, entry.count, unit));
    }
    out
}
