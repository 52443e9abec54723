/// Pasa a minúsculas y quita tildes y diéresis del español.
///
/// Se usa para comparar textos escritos a mano: `"Adoración"`, `"adoracion"`
/// y `"ADORACIÓN"` normalizan igual.
pub fn fold(s: &str) -> String {
  s.trim()
    .chars()
    .flat_map(char::to_lowercase)
    .map(|c| match c {
      'á' | 'à' | 'ä' | 'â' => 'a',
      'é' | 'è' | 'ë' | 'ê' => 'e',
      'í' | 'ì' | 'ï' | 'î' => 'i',
      'ó' | 'ò' | 'ö' | 'ô' => 'o',
      'ú' | 'ù' | 'ü' | 'û' => 'u',
      'ñ' => 'n',
      other => other,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::fold;

  #[test]
  fn folds_case_and_accents() {
    assert_eq!(fold("  ADORACIÓN "), "adoracion");
    assert_eq!(fold("Señor"), "senor");
    assert_eq!(fold("Pingüino"), "pinguino");
  }
}
