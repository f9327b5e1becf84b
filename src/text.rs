//! Utilidades de texto para etiquetas de visualización.

/// Longitud máxima (en caracteres) de las etiquetas cortas de los nodos.
pub const LABEL_MAX_CHARS: usize = 15;

const ELLIPSIS: &str = "...";

/// Capitaliza cada palabra: la primera letra tras un carácter no alfabético
/// va en mayúscula y el resto en minúscula.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Recorta a `LABEL_MAX_CHARS` caracteres y añade puntos suspensivos si hubo recorte.
/// Sólo para mostrar; nunca se usa para comparar.
pub fn truncate_label(text: &str) -> String {
    if text.chars().count() <= LABEL_MAX_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(LABEL_MAX_CHARS).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_display_convention() {
        assert_eq!(title_case("GOBIERNO REGIONAL DE PIURA"), "Gobierno Regional De Piura");
        assert_eq!(title_case("ñandú s.a.c."), "Ñandú S.A.C.");
        assert_eq!(title_case("consorcio 3m-perú"), "Consorcio 3M-Perú");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn truncates_long_labels_only() {
        assert_eq!(truncate_label("Essalud"), "Essalud");
        assert_eq!(truncate_label("Municipalidad Provincial"), "Municipalidad P...");
        assert_eq!(truncate_label("Ministerio de Salud").chars().count(), LABEL_MAX_CHARS + 3);
        // multibyte characters count as one
        assert_eq!(truncate_label("ÁÉÍÓÚÁÉÍÓÚÁÉÍÓÚÁ"), "ÁÉÍÓÚÁÉÍÓÚÁÉÍÓÚ...");
    }
}
