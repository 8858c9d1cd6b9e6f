//! Text normalization for header matching and breakdown key lookups
//!
//! The template mixes accents, casing, and stray whitespace freely
//! ("Programa Admón Financiera" vs "ADMON FINANCIERA"), so every
//! comparison goes through these helpers instead of raw string equality.

/// Replace accented Latin characters with their base letter.
pub fn strip_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'Ñ' => 'N',
            'Ç' => 'C',
            _ => c,
        })
        .collect()
}

/// Uppercase comparison form: accents stripped, whitespace collapsed.
pub fn norm(s: &str) -> String {
    strip_accents(s.trim())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Lookup key for breakdown campus/program values: lowercase, accent,
/// period and whitespace insensitive, with a leading "programa " token
/// dropped so that header-declared names match the persisted short form
/// ("Programa Ing. Software" keys the same as "ING SOFTWARE").
pub fn norm_key(s: &str) -> String {
    let folded = strip_accents(s.trim())
        .replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    match folded.strip_prefix("programa ") {
        Some(rest) => rest.trim().to_string(),
        None => folded,
    }
}

/// Title-case every alphabetic run: "ADMON FINANCIERA (PRESENCIAL)" →
/// "Admon Financiera (Presencial)".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
