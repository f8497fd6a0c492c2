//! Command line

use std::path::PathBuf;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub help: bool,
    /// `-p`: start with plugins enabled
    pub plugins: bool,
    pub config: Option<PathBuf>,
    /// First positional argument, loaded instead of the home page
    pub uri: Option<String>,
}

/// Parse arguments after the program name.
///
/// Flags end at the first positional argument. Unrecognized flags are
/// skipped.
pub fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs::default();
    let mut index = 0usize;

    while let Some(token) = args.get(index) {
        match token.as_str() {
            "-h" | "--help" => {
                parsed.help = true;
                return Ok(parsed);
            }
            "-p" => {
                parsed.plugins = true;
                index += 1;
            }
            "--config" => {
                parsed.config = Some(PathBuf::from(take_value(args, index, "--config")?));
                index += 2;
            }
            "--" => {
                parsed.uri = args.get(index + 1).cloned();
                break;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                tracing::warn!(flag, "Ignoring unknown argument");
                index += 1;
            }
            value => {
                parsed.uri = Some(value.to_string());
                break;
            }
        }
    }

    Ok(parsed)
}

fn take_value(args: &[String], index: usize, flag: &str) -> Result<String, String> {
    args.get(index + 1)
        .cloned()
        .ok_or_else(|| format!("error: missing value for {flag}"))
}

pub const HELP_TEXT: &str = "\
Minimal browser shell

Usage:
  meme [flags] [uri]

Flags:
  -p                   enable plugins
      --config path    configuration file (default: $MEME_DIR/config.toml)
  -h, --help           help for meme

Input (one line per activation):
  <uri or search>      navigate, or search when it does not look like a URI
  /<text>              find in page
  !plugins on|off      toggle plugins and reload
  !bookmark <uri>      add a bookmark
  about:bookmarks      show the bookmarks file
  \\<chord>             press a key chord, e.g. \\ctrl+r
  :back :forward :reload :home :focus :complete <key> :quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse_args(&[]).unwrap(), ParsedArgs::default());
    }

    #[test]
    fn test_plugins_and_uri() {
        let parsed = parse_args(&args(&["-p", "example.com"])).unwrap();
        assert!(parsed.plugins);
        assert_eq!(parsed.uri.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_flags_stop_at_positional() {
        let parsed = parse_args(&args(&["http://a.test/", "-p"])).unwrap();
        assert!(!parsed.plugins);
        assert_eq!(parsed.uri.as_deref(), Some("http://a.test/"));
    }

    #[test]
    fn test_config() {
        let parsed = parse_args(&args(&["--config", "/tmp/meme.toml"])).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("/tmp/meme.toml")));

        let err = parse_args(&args(&["--config"])).unwrap_err();
        assert!(err.contains("missing value"));
    }

    #[test]
    fn test_help() {
        assert!(parse_args(&args(&["-p", "--help"])).unwrap().help);
        assert!(parse_args(&args(&["-h"])).unwrap().help);
    }

    #[test]
    fn test_unknown_flags_skipped() {
        let parsed = parse_args(&args(&["-x", "http://a.test"])).unwrap();
        assert_eq!(parsed.uri.as_deref(), Some("http://a.test"));

        let parsed = parse_args(&args(&["--verbose", "-p", "-x"])).unwrap();
        assert!(parsed.plugins);
        assert!(parsed.uri.is_none());
    }
}
