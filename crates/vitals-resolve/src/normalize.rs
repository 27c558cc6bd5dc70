//! Match-key normalization.

/// Reduce a name to its match key: ASCII-folded, lowercase, punctuation
/// replaced by spaces, whitespace collapsed, leading "the" dropped.
pub(crate) fn match_key(name: &str) -> String {
  let mut folded = String::with_capacity(name.len());
  for c in name.chars() {
    match c {
      '&' => folded.push_str(" and "),
      c if c.is_ascii_alphanumeric() => folded.push(c.to_ascii_lowercase()),
      c => match fold_latin(c) {
        Some(ascii) => folded.push(ascii),
        None => folded.push(' '),
      },
    }
  }

  let words: Vec<&str> = folded.split_whitespace().collect();
  let words = match words.split_first() {
    Some((&"the", rest)) if !rest.is_empty() => rest,
    _ => &words[..],
  };
  words.join(" ")
}

fn fold_latin(c: char) -> Option<char> {
  let folded = match c.to_lowercase().next()? {
    'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
    'ç' => 'c',
    'è' | 'é' | 'ê' | 'ë' => 'e',
    'ì' | 'í' | 'î' | 'ï' => 'i',
    'ñ' => 'n',
    'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
    'ù' | 'ú' | 'û' | 'ü' => 'u',
    'ý' | 'ÿ' => 'y',
    _ => return None,
  };
  Some(folded)
}

#[cfg(test)]
mod tests {
  use super::match_key;

  #[test]
  fn punctuation_and_case() {
    assert_eq!(match_key("Congo, Dem. Rep."), "congo dem rep");
    assert_eq!(match_key("  UNITED   states "), "united states");
    assert_eq!(match_key("Trinidad & Tobago"), "trinidad and tobago");
  }

  #[test]
  fn diacritics_fold() {
    assert_eq!(match_key("Côte d'Ivoire"), "cote d ivoire");
    assert_eq!(match_key("São Tomé and Príncipe"), "sao tome and principe");
  }

  #[test]
  fn leading_article_dropped() {
    assert_eq!(match_key("The Gambia"), "gambia");
    assert_eq!(match_key("the"), "the");
  }
}
