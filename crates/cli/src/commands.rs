use std::path::PathBuf;

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Plain text: type it into the input and press Enter.
    Say(String),
    Speaker(String),
    Style(String),
    History,
    /// 1-based, newest first.
    Play(usize),
    Save(usize, PathBuf),
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Say(line.to_owned());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };

        match name {
            "speaker" => Self::Speaker(arg.to_owned()),
            "style" => Self::Style(arg.to_owned()),
            "history" => Self::History,
            "play" => match parse_index(arg) {
                Some(n) => Self::Play(n),
                None => Self::Invalid(format!("usage: :play <n> (got {arg:?})")),
            },
            "save" => {
                let (index, path) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
                match (parse_index(index), path.trim()) {
                    (Some(n), path) if !path.is_empty() => Self::Save(n, PathBuf::from(path)),
                    _ => Self::Invalid("usage: :save <n> <path>".to_owned()),
                }
            }
            "quit" | "q" => Self::Quit,
            other => Self::Invalid(format!("unknown command :{other}")),
        }
    }
}

fn parse_index(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_spoken_verbatim() {
        assert_eq!(Command::parse("  hello "), Command::Say("  hello ".to_owned()));
        assert_eq!(Command::parse(""), Command::Say(String::new()));
    }

    #[test]
    fn speaker_and_style_take_the_rest_of_the_line() {
        assert_eq!(Command::parse(":speaker p225"), Command::Speaker("p225".to_owned()));
        assert_eq!(Command::parse(":speaker"), Command::Speaker(String::new()));
        assert_eq!(
            Command::parse(":style  refs/my style.wav"),
            Command::Style("refs/my style.wav".to_owned())
        );
    }

    #[test]
    fn play_and_save_need_a_positive_index() {
        assert_eq!(Command::parse(":play 2"), Command::Play(2));
        assert!(matches!(Command::parse(":play 0"), Command::Invalid(_)));
        assert!(matches!(Command::parse(":play x"), Command::Invalid(_)));
        assert_eq!(
            Command::parse(":save 1 out.wav"),
            Command::Save(1, PathBuf::from("out.wav"))
        );
        assert!(matches!(Command::parse(":save 1"), Command::Invalid(_)));
    }

    #[test]
    fn misc_commands() {
        assert_eq!(Command::parse(":history"), Command::History);
        assert_eq!(Command::parse(":q"), Command::Quit);
        assert!(matches!(Command::parse(":nope"), Command::Invalid(_)));
    }
}
