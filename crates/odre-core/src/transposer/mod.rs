//! Transposición de cifrados.
//!
//! Recorre un texto de letra con acordes y desplaza cada acorde `n`
//! semitonos. Las líneas de acordes se reescriben conservando las columnas;
//! las líneas de letra sólo cambian en acordes en línea estilo ChordPro
//! (`[G]Santo`). Nada de lo que no sea un acorde se toca.

mod chord;

pub use chord::{chord_pitch_classes, is_chord, pitch_class, spell, transpose_chord};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Acorde en línea dentro de una línea de letra: `[F#m7]`.
static INLINE_CHORD_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\[([^\[\]\s]+)\]").expect("inline chord pattern is valid"));

/// Marcas que pueden acompañar a los acordes sin convertir la línea en letra:
/// barras de compás, repeticiones (`x2`) y etiquetas de sección (`Coro:`).
static NEUTRAL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^(?:[|/%\-.:]+|\(?[xX][0-9]+\)?|\S+:)$").expect("neutral token pattern is valid")
});

/// Transpone todos los acordes de `text` en `semitones` semitonos.
///
/// Con un desplazamiento múltiplo de 12 (incluido 0) o texto vacío devuelve
/// el texto intacto. No falla nunca: lo que no se reconoce como acorde se
/// deja como texto.
///
/// ```
/// use odre_core::transposer::transpose;
/// assert_eq!(transpose("G   D/F#  Em\nTu fidelidad", 2), "A   E/G#  F#m\nTu fidelidad");
/// assert_eq!(transpose("Hello world, no chords here.", 5), "Hello world, no chords here.");
/// ```
pub fn transpose(text: &str, semitones: i32) -> String {
  if text.is_empty() || semitones.rem_euclid(12) == 0 {
    return text.to_string();
  }

  let mut out = String::with_capacity(text.len() + text.len() / 8);

  for raw in text.split_inclusive('\n') {
    let (line, eol) = split_eol(raw);
    out.push_str(&transpose_line(line, semitones));
    out.push_str(eol);
  }

  out
}

fn split_eol(raw: &str) -> (&str, &str) {
  if let Some(line) = raw.strip_suffix("\r\n") {
    (line, "\r\n")
  } else if let Some(line) = raw.strip_suffix('\n') {
    (line, "\n")
  } else {
    (raw, "")
  }
}

/// Trozos consecutivos de espacio (`true`) y de texto (`false`).
fn segments(line: &str) -> Vec<(bool, &str)> {
  let mut segs = Vec::new();
  let mut start = 0;
  let mut current: Option<bool> = None;

  for (i, c) in line.char_indices() {
    let ws = c.is_whitespace();
    match current {
      Some(kind) if kind == ws => {}
      Some(kind) => {
        segs.push((kind, &line[start..i]));
        start = i;
        current = Some(ws);
      }
      None => current = Some(ws),
    }
  }

  if let Some(kind) = current {
    segs.push((kind, &line[start..]));
  }

  segs
}

fn is_chord_line(segs: &[(bool, &str)]) -> bool {
  let mut chords = 0usize;

  for (ws, token) in segs {
    if *ws {
      continue;
    }
    if is_chord(token) {
      chords += 1;
    } else if !NEUTRAL_RE.is_match(token) {
      return false;
    }
  }

  chords > 0
}

fn transpose_line(line: &str, semitones: i32) -> String {
  let segs = segments(line);

  if is_chord_line(&segs) {
    transpose_chord_line(&segs, semitones)
  } else {
    INLINE_CHORD_RE
      .replace_all(line, |caps: &Captures| match transpose_chord(&caps[1], semitones) {
        Some(chord) => format!("[{chord}]"),
        None => caps[0].to_string(),
      })
      .into_owned()
  }
}

/// Reescribe una línea de acordes manteniendo cada acorde en su columna.
///
/// `drift` es cuánto más larga (positivo) o corta (negativo) va la salida
/// respecto de la entrada; el siguiente hueco de espacios lo compensa sin
/// bajar nunca de un espacio.
fn transpose_chord_line(segs: &[(bool, &str)], semitones: i32) -> String {
  let mut out = String::new();
  let mut drift: isize = 0;
  let last = segs.len().saturating_sub(1);

  for (i, (ws, token)) in segs.iter().enumerate() {
    if !*ws {
      let rewritten = transpose_chord(token, semitones);
      let new = rewritten.as_deref().unwrap_or(token);
      drift += width(new) - width(token);
      out.push_str(new);
      continue;
    }

    // Los espacios iniciales y finales, y los tabuladores, se copian tal cual.
    if i == 0 || i == last || token.contains('\t') || drift == 0 {
      out.push_str(token);
      continue;
    }

    let original = width(token);
    let emitted = (original - drift).max(1);
    drift += emitted - original;
    out.extend(std::iter::repeat_n(' ', emitted as usize));
  }

  out
}

fn width(s: &str) -> isize {
  s.chars().count() as isize
}
