/// Characters the model uses for markup that would be read aloud by synthesis
const MARKUP_CHARS: [char; 3] = ['*', '-', '#'];

/// Strip markup characters from generated text.
///
/// Everything else, including the whitespace left behind, is kept as is.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect()
}
