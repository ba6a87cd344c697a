use std::fmt::Write;

use crate::models::PreferenceSet;

/// Builds the recommendation instruction sent as the single user message
pub fn build_prompt(prefs: &PreferenceSet) -> String {
    let mut prompt = String::from(
        "You are a movie recommendation expert. Based on the following preferences, \
         recommend exactly 3-5 movies that match these criteria:\n\n",
    );

    // Writing to a String cannot fail
    let _ = writeln!(prompt, "Mood: {}", prefs.mood.trim());
    let _ = writeln!(prompt, "Genre: {}", prefs.genre.trim());
    let _ = writeln!(
        prompt,
        "Year Range: {} - {}",
        prefs.year_range.start, prefs.year_range.end
    );
    let _ = writeln!(prompt, "Industry: {}", prefs.industry.trim());
    let _ = writeln!(prompt, "Type: {}", prefs.content_type);
    if let Some(language) = prefs.language() {
        let _ = writeln!(prompt, "Language: {}", language);
    }
    if let Some(rating) = prefs.rating() {
        let _ = writeln!(prompt, "Minimum Rating: {}", rating);
    }

    prompt.push_str(
        "\nPlease respond with ONLY a JSON array of movie titles (exact titles as they \
         appear in TMDB). Format: [\"Movie Title 1\", \"Movie Title 2\", \"Movie Title 3\"]\n\n\
         Do not include any explanation, just the JSON array of movie titles.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::fixtures::happy_comedy;

    #[test]
    fn test_prompt_embeds_every_required_field() {
        let prompt = build_prompt(&happy_comedy());

        assert!(prompt.contains("Mood: happy\n"));
        assert!(prompt.contains("Genre: Comedy\n"));
        assert!(prompt.contains("Year Range: 2010 - 2023\n"));
        assert!(prompt.contains("Industry: hollywood\n"));
        assert!(prompt.contains("Type: movie\n"));
        assert!(prompt.contains("exactly 3-5 movies"));
        assert!(prompt.contains("ONLY a JSON array"));
    }

    #[test]
    fn test_optional_fields_only_when_present() {
        let mut prefs = happy_comedy();
        let prompt = build_prompt(&prefs);
        assert!(!prompt.contains("Language:"));
        assert!(!prompt.contains("Minimum Rating:"));

        prefs.language = Some("Korean".to_string());
        prefs.rating = Some("8".to_string());
        let prompt = build_prompt(&prefs);
        assert!(prompt.contains("Language: Korean\n"));
        assert!(prompt.contains("Minimum Rating: 8\n"));
    }

    #[test]
    fn test_blank_language_omitted() {
        let mut prefs = happy_comedy();
        prefs.language = Some("   ".to_string());
        assert!(!build_prompt(&prefs).contains("Language:"));
    }
}
