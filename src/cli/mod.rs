//! CLI argument parsing and validation.

mod args;

pub use args::Args;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineChoice;
    use crate::style::Style;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_parse_positional_text_and_output() {
        let args = Args::try_parse_from(["emo-tts-rs", "Hello world", "out.wav"]).unwrap();
        assert_eq!(args.text.as_deref(), Some("Hello world"));
        assert_eq!(args.output, Some(PathBuf::from("out.wav")));
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["emo-tts-rs", "Hello", "out.wav"]).unwrap();
        assert_eq!(args.style, Style::Neutral);
        assert_eq!(args.intensity, 50);
        assert_eq!(args.engine, EngineChoice::Auto);
        assert!(args.voice.is_none());
        assert!(args.speed.is_none());
        assert!(!args.serve);
        assert_eq!(args.port, 8000);
        assert_eq!(args.neural_port, 5002);
    }

    #[test]
    fn test_parse_style_and_intensity() {
        let args = Args::try_parse_from([
            "emo-tts-rs",
            "We did it!",
            "out.wav",
            "--style",
            "enthusiastic",
            "--intensity",
            "80",
        ])
        .unwrap();
        assert_eq!(args.style, Style::Enthusiastic);
        assert_eq!(args.intensity, 80);
    }

    #[test]
    fn test_parse_rejects_out_of_range_intensity() {
        let result =
            Args::try_parse_from(["emo-tts-rs", "Hello", "out.wav", "--intensity", "150"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_style_flag() {
        // The CLI surface is a closed value enum, unlike the lenient
        // HTTP surface.
        let result = Args::try_parse_from(["emo-tts-rs", "Hello", "out.wav", "--style", "spooky"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_engine_selection() {
        let args =
            Args::try_parse_from(["emo-tts-rs", "Hello", "out.wav", "--engine", "system"]).unwrap();
        assert_eq!(args.engine, EngineChoice::System);
    }

    #[test]
    fn test_parse_utility_flags_without_positionals() {
        let args = Args::try_parse_from(["emo-tts-rs", "--status"]).unwrap();
        assert!(args.status);
        assert!(args.text.is_none());

        let args = Args::try_parse_from(["emo-tts-rs", "--list-voices"]).unwrap();
        assert!(args.list_voices);
    }

    #[test]
    fn test_parse_serve_flags() {
        let args =
            Args::try_parse_from(["emo-tts-rs", "--serve", "--port", "9000", "--verbose"]).unwrap();
        assert!(args.serve);
        assert_eq!(args.port, 9000);
        assert!(args.verbose);
    }

    #[test]
    fn test_resolve_audio_dir_override() {
        let args =
            Args::try_parse_from(["emo-tts-rs", "--serve", "--audio-dir", "/tmp/clips"]).unwrap();
        assert_eq!(args.resolve_audio_dir(), PathBuf::from("/tmp/clips"));
    }
}
