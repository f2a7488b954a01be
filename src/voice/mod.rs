//! Voice selection heuristics shared by the engine adapters.
//!
//! Resolution is best effort: gender detection works off name keywords
//! and carries no correctness guarantee beyond "keyword match".

mod select;

pub use select::{Gender, VoiceInfo, detect_gender, resolve};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_voices() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo {
                id: "en-us+m3".to_string(),
                name: "English David".to_string(),
                language: "en-US".to_string(),
                gender: Gender::Male,
            },
            VoiceInfo {
                id: "en-us+f2".to_string(),
                name: "English Zira".to_string(),
                language: "en-US".to_string(),
                gender: Gender::Female,
            },
            VoiceInfo {
                id: "de".to_string(),
                name: "German".to_string(),
                language: "de".to_string(),
                gender: Gender::Unknown,
            },
        ]
    }

    // ===========================================
    // Gender detection tests
    // ===========================================

    #[test]
    fn test_detect_gender_female_keyword() {
        assert_eq!(detect_gender("Microsoft Zira Desktop"), Gender::Female);
        assert_eq!(detect_gender("some female voice"), Gender::Female);
    }

    #[test]
    fn test_detect_gender_male_keyword() {
        assert_eq!(detect_gender("Microsoft David Desktop"), Gender::Male);
    }

    #[test]
    fn test_detect_gender_bracket_tags() {
        assert_eq!(detect_gender("Vivienne [f]"), Gender::Female);
        assert_eq!(detect_gender("Takumi [m]"), Gender::Male);
        assert_eq!(detect_gender("Karen (f)"), Gender::Female);
    }

    #[test]
    fn test_detect_gender_unknown() {
        assert_eq!(detect_gender("Kokoro"), Gender::Unknown);
    }

    // ===========================================
    // Resolution priority tests
    // ===========================================

    #[test]
    fn test_resolve_gender_query_female() {
        let voices = sample_voices();
        let voice = resolve("female", &voices).unwrap();
        assert_eq!(voice.id, "en-us+f2");
    }

    #[test]
    fn test_resolve_gender_query_male_localized() {
        let voices = sample_voices();
        let voice = resolve("pria", &voices).unwrap();
        assert_eq!(voice.id, "en-us+m3");
    }

    #[test]
    fn test_resolve_gender_query_without_match_falls_back_to_first() {
        let voices = vec![VoiceInfo {
            id: "x".to_string(),
            name: "Nondescript".to_string(),
            language: "en".to_string(),
            gender: Gender::Unknown,
        }];
        let voice = resolve("female", &voices).unwrap();
        assert_eq!(voice.id, "x");
    }

    #[test]
    fn test_resolve_numeric_index() {
        let voices = sample_voices();
        let voice = resolve("2", &voices).unwrap();
        assert_eq!(voice.id, "de");
    }

    #[test]
    fn test_resolve_index_out_of_range() {
        let voices = sample_voices();
        assert!(resolve("99", &voices).is_none());
    }

    #[test]
    fn test_resolve_substring_match() {
        let voices = sample_voices();
        let voice = resolve("german", &voices).unwrap();
        assert_eq!(voice.id, "de");
    }

    #[test]
    fn test_resolve_no_match_leaves_default() {
        let voices = sample_voices();
        assert!(resolve("klingon", &voices).is_none());
    }

    #[test]
    fn test_resolve_gender_wins_over_index_and_substring() {
        let mut voices = sample_voices();
        voices.push(VoiceInfo {
            id: "odd".to_string(),
            name: "male-sounding test voice".to_string(),
            language: "en".to_string(),
            gender: Gender::Unknown,
        });
        let voice = resolve("male", &voices).unwrap();
        assert_eq!(voice.id, "en-us+m3");
    }

    #[test]
    fn test_resolve_empty_list() {
        assert!(resolve("female", &[]).is_none());
        assert!(resolve("0", &[]).is_none());
    }
}
