use once_cell::sync::Lazy;
use regex::Regex;

/// Grafía preferida para cada clase de altura (0 = Do).
///
/// Mezcla sostenidos y bemoles como en el cifrado habitual de las doce
/// tonalidades: `Bb` y no `A#`, `F#` y no `Gb`.
const SPELLING: [&str; 12] = ["C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B"];

/// Raíz, alteración, sufijo de calidad (se conserva literal) y bajo opcional.
static CHORD_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"^(?P<root>[A-G][#b]?)(?P<suffix>(?:maj|min|dim|aug|sus|add|m|M|\+|-|°|ø|[0-9]|[()#b])*)(?:/(?P<bass>[A-G][#b]?))?$",
  )
  .expect("chord pattern is valid")
});

/// Clase de altura (0–11) de una nota escrita como letra + alteración.
///
/// ```
/// use odre_core::transposer::pitch_class;
/// assert_eq!(pitch_class("Bb"), Some(10));
/// assert_eq!(pitch_class("Cb"), Some(11));
/// assert_eq!(pitch_class("H"), None);
/// ```
pub fn pitch_class(note: &str) -> Option<u8> {
  let mut chars = note.chars();
  let natural: i32 = match chars.next()? {
    'C' => 0,
    'D' => 2,
    'E' => 4,
    'F' => 5,
    'G' => 7,
    'A' => 9,
    'B' => 11,
    _ => return None,
  };

  let accidental = match chars.next() {
    None => 0,
    Some('#') => 1,
    Some('b') => -1,
    Some(_) => return None,
  };

  if chars.next().is_some() {
    return None;
  }

  Some((natural + accidental).rem_euclid(12) as u8)
}

const SHARPS: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
const FLATS: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

/// Nombre preferido de una clase de altura. Se reduce módulo 12.
pub fn spell(pitch_class: u8) -> &'static str {
  SPELLING[usize::from(pitch_class % 12)]
}

/// Grafía del bajo según la raíz: sobre raíces de tonalidad con sostenidos
/// (`E/G#`) el bajo va con sostenido; sobre las de bemoles (`Bb/D`, `Eb/Db`),
/// con bemol. Sobre `C` se usa la tabla general.
fn spell_bass(root: u8, bass: u8) -> &'static str {
  let bass = usize::from(bass % 12);
  match root % 12 {
    1 | 2 | 4 | 6 | 7 | 9 | 11 => SHARPS[bass],
    3 | 5 | 8 | 10 => FLATS[bass],
    _ => SPELLING[bass],
  }
}

/// Clase de altura de `note` desplazada `semitones`. Reduce el desplazamiento
/// antes de sumar, así que no desborda con ningún `i32`.
fn shift_pitch(note: &str, semitones: i32) -> Option<u8> {
  let pc = pitch_class(note)?;
  let shift = semitones.rem_euclid(12) as u8;
  Some((pc + shift) % 12)
}

/// Quita un par de `()` o `[]` que envuelve al token, si lo hay.
fn unwrap_token(token: &str) -> (&str, &str, &str) {
  for (open, close) in [('(', ')'), ('[', ']')] {
    if token.len() > 2 && token.starts_with(open) && token.ends_with(close) {
      return (&token[..1], &token[1..token.len() - 1], &token[token.len() - 1..]);
    }
  }
  ("", token, "")
}

/// Indica si `token` es un acorde (opcionalmente entre paréntesis o corchetes).
pub fn is_chord(token: &str) -> bool {
  let (_, inner, _) = unwrap_token(token);
  CHORD_RE.is_match(inner)
}

/// Transpone un único token de acorde.
///
/// Devuelve `None` si el token no es un acorde; el llamador lo deja como
/// texto. El sufijo de calidad (`m7`, `sus4`, `add9`…) se conserva tal cual
/// y el bajo de los acordes con barra también se desplaza.
///
/// ```
/// use odre_core::transposer::transpose_chord;
/// assert_eq!(transpose_chord("Bb", 2).as_deref(), Some("C"));
/// assert_eq!(transpose_chord("C/G", -1).as_deref(), Some("B/F#"));
/// assert_eq!(transpose_chord("Hola", 3), None);
/// ```
pub fn transpose_chord(token: &str, semitones: i32) -> Option<String> {
  let (open, inner, close) = unwrap_token(token);
  let caps = CHORD_RE.captures(inner)?;

  let root = shift_pitch(caps.name("root")?.as_str(), semitones)?;
  let suffix = caps.name("suffix").map_or("", |m| m.as_str());

  let mut out = String::with_capacity(token.len() + 2);
  out.push_str(open);
  out.push_str(spell(root));
  out.push_str(suffix);

  if let Some(bass) = caps.name("bass") {
    out.push('/');
    out.push_str(spell_bass(root, shift_pitch(bass.as_str(), semitones)?));
  }

  out.push_str(close);
  Some(out)
}

/// Raíz (y bajo) en clases de altura. Útil para comparar acordes con
/// grafías enarmónicas distintas.
pub fn chord_pitch_classes(token: &str) -> Option<(u8, Option<u8>)> {
  let (_, inner, _) = unwrap_token(token);
  let caps = CHORD_RE.captures(inner)?;
  let root = pitch_class(caps.name("root")?.as_str())?;
  let bass = match caps.name("bass") {
    Some(b) => Some(pitch_class(b.as_str())?),
    None => None,
  };
  Some((root, bass))
}
