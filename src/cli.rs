use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "tweet-sentiment",
    about = "Classify posts as positive or negative with a pre-fitted linear model",
    version,
    group(ArgGroup::new("input").required(true).multiple(true).args(["text", "user", "file"]))
)]
pub struct Cli {
    /// Text to classify; each argument is one post. Use `-` to read posts from stdin, one per line
    pub text: Vec<String>,

    /// Fetch and classify the latest posts of a user (repeatable, with or without @)
    #[arg(short, long, value_name = "USER")]
    pub user: Vec<String>,

    /// Classify posts from a file (`.json` array of posts, otherwise one post per line)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Number of posts fetched per user [default: 5, or source.number from config]
    #[arg(short, long, value_name = "N")]
    pub number: Option<usize>,

    /// Directory holding vocabulary.json and model.json [default: ./artifacts]
    #[arg(long, value_name = "DIR")]
    pub artifacts: Option<PathBuf>,

    /// Config file [default: ./.tweet-sentiment/config.toml, fallback ~/.config/tweet-sentiment/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exit with status 1 if any post is classified negative
    #[arg(long)]
    pub fail_on_negative: bool,

    /// Show decision scores and info-level logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_arguments() {
        let cli = Cli::try_parse_from(["tweet-sentiment", "I love it", "meh"]).unwrap();
        assert_eq!(cli.text, vec!["I love it", "meh"]);
        assert!(cli.user.is_empty());
        assert!(matches!(cli.report, ReportFormat::Terminal));
    }

    #[test]
    fn test_users_and_options() {
        let cli = Cli::try_parse_from([
            "tweet-sentiment",
            "--user",
            "@jack",
            "-u",
            "biz",
            "-n",
            "10",
            "--report",
            "json",
            "--fail-on-negative",
        ])
        .unwrap();
        assert_eq!(cli.user, vec!["@jack", "biz"]);
        assert_eq!(cli.number, Some(10));
        assert!(matches!(cli.report, ReportFormat::Json));
        assert!(cli.fail_on_negative);
    }

    #[test]
    fn test_some_input_required() {
        assert!(Cli::try_parse_from(["tweet-sentiment", "--verbose"]).is_err());
    }
}
