//! Text normalisation applied before a message is rendered.

use alloc::string::String;

/// How raw message text is shaped before rasterization or layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TextPolicy {
    pub upper_case: bool,
    /// Drop trailing whitespace, including trailing line breaks.
    pub trim_end: bool,
    /// Replace accented Latin letters and typographic punctuation with their
    /// ASCII base so a plain ASCII font can show them.
    pub fold_accents: bool,
}

impl Default for TextPolicy {
    fn default() -> Self {
        Self {
            upper_case: true,
            trim_end: false,
            fold_accents: false,
        }
    }
}

impl TextPolicy {
    pub fn apply(&self, raw: &str) -> String {
        let source = if self.trim_end { raw.trim_end() } else { raw };

        let mut out = String::with_capacity(source.len());
        for c in source.chars() {
            let c = if self.fold_accents { fold_char(c) } else { c };
            if self.upper_case {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
        }

        out
    }
}

pub fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        '’' | '‘' | '‚' | '‛' | 'ʼ' | 'ʻ' | '´' => '\'',
        '“' | '”' | '„' | '‟' => '"',
        '‐' | '‑' | '‒' | '–' | '—' | '―' => '-',
        '…' => '.',
        _ => c,
    }
}
