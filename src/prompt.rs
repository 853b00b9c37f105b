//! Interactive input.
//!
//! Operations ask questions through [`Prompt`] so they can run against a
//! terminal ([`TermPrompt`]), a list of prepared answers ([`ScriptedPrompt`])
//! or answers piped in one per line ([`LinePrompt`]).
use anyhow::{bail, Context as _, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::collections::VecDeque;
use std::io::BufRead;

pub trait Prompt {
    /// Ask for free text. An empty answer falls back to `default`;
    /// without a default an empty answer is not accepted.
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String>;

    /// Ask to pick one of `options` and return the picked value.
    fn choice(&mut self, message: &str, options: &[String]) -> Result<String>;
}

pub struct TermPrompt {
    theme: ColorfulTheme,
}

impl TermPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TermPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TermPrompt {
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(message);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .with_context(|| format!("Can not read answer for {:?}", message))
    }

    fn choice(&mut self, message: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            bail!("Nothing to choose for {:?}", message);
        }
        let index = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(options)
            .default(0)
            .interact()
            .with_context(|| format!("Can not read answer for {:?}", message))?;
        Ok(options[index].clone())
    }
}

/// Answers questions from a queue, in order.
///
/// An empty text answer takes the default like a terminal would.
/// A choice answer must be one of the offered options.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> Result<String> {
        self.answers
            .pop_front()
            .with_context(|| format!("No answer left for {:?}", message))
    }
}

impl Prompt for ScriptedPrompt {
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        let answer = self.next(message)?;
        text_answer(answer, message, default)
    }

    fn choice(&mut self, message: &str, options: &[String]) -> Result<String> {
        let answer = self.next(message)?;
        choice_answer(answer, options)
    }
}

/// Reads one answer per line, for input that is not a terminal.
#[derive(Debug)]
pub struct LinePrompt<R> {
    reader: R,
}

impl<R> LinePrompt<R>
where
    R: BufRead,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn next(&mut self, message: &str) -> Result<String> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .with_context(|| format!("Can not read answer for {:?}", message))?;
        if read == 0 {
            bail!("No answer left for {:?}", message);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R> Prompt for LinePrompt<R>
where
    R: BufRead,
{
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        let answer = self.next(message)?;
        text_answer(answer, message, default)
    }

    fn choice(&mut self, message: &str, options: &[String]) -> Result<String> {
        let answer = self.next(message)?;
        choice_answer(answer, options)
    }
}

fn text_answer(answer: String, message: &str, default: Option<&str>) -> Result<String> {
    match (answer.is_empty(), default) {
        (true, Some(default)) => Ok(default.to_string()),
        (true, None) => bail!("Empty answer for {:?}", message),
        (false, _) => Ok(answer),
    }
}

fn choice_answer(answer: String, options: &[String]) -> Result<String> {
    if !options.contains(&answer) {
        bail!("{:?} is not one of {:?}", answer, options);
    }
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Some("master"), "master")]
    #[case("develop", Some("master"), "develop")]
    #[case("app", None, "app")]
    fn test_scripted_text(#[case] answer: &str, #[case] default: Option<&str>, #[case] expected: &str) {
        let mut prompt = ScriptedPrompt::new([answer]);
        assert_eq!(prompt.text("Which branch?", default).unwrap(), expected);
        assert_eq!(prompt.remaining(), 0);
    }

    #[test]
    fn test_scripted_text_empty_without_default() {
        let mut prompt = ScriptedPrompt::new([""]);
        assert!(prompt.text("Enter project name", None).is_err());
    }

    #[test]
    fn test_scripted_exhausted() {
        let mut prompt = ScriptedPrompt::default();
        assert!(prompt.text("Enter git repo", None).is_err());
    }

    #[test]
    fn test_scripted_choice() {
        let options = vec!["app".to_string(), "admin".to_string()];
        let mut prompt = ScriptedPrompt::new(["admin", "blog"]);
        assert_eq!(prompt.choice("Which one?", &options).unwrap(), "admin");
        assert!(prompt.choice("Which one?", &options).is_err());
    }

    #[test]
    fn test_line_prompt() {
        let input = "admin\r\n\nweb\n";
        let options = vec!["app".to_string(), "admin".to_string()];
        let mut prompt = LinePrompt::new(input.as_bytes());

        assert_eq!(prompt.choice("Which one?", &options).unwrap(), "admin");
        assert_eq!(prompt.text("Which branch?", Some("master")).unwrap(), "master");
        assert_eq!(prompt.text("Enter git repo", None).unwrap(), "web");
        assert!(prompt.text("Enter deploy path", None).is_err());
    }
}
