/// Returns the last `num_chars` characters of `content`.
///
/// Counts `char`s, not bytes, so the result never splits a code point. If
/// `content` is no longer than `num_chars` it is returned whole.
pub fn tail_chars(content: &str, num_chars: usize) -> &str {
  if num_chars == 0 {
    return "";
  }

  match content.char_indices().rev().nth(num_chars - 1) {
    Some((start, _)) => &content[start..],
    None => content,
  }
}
