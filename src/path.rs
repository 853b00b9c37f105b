//! Path expansion for values stored in the config file.
//!
//! `workspace` and `dest` are kept verbatim in `~/.landrc.json`;
//! expansion happens only when a deploy needs real paths.
use anyhow::Context as _;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Expand `${VARNAME}` references and a leading `~`.
///
/// A `$` that is not followed by `{` is kept as is.
pub fn expand_env_var(s: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    if chars.peek() == Some(&'~') {
        let mut rest = s[1..].chars();
        if matches!(rest.next(), None | Some('/')) {
            let home = dirs::home_dir().context("Can not get home directory")?;
            result.push_str(&home.to_string_lossy());
            chars.next();
        }
    }

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        if chars.peek() != Some(&'{') {
            result.push('$');
            continue;
        }
        chars.next();

        let mut varname = String::new();
        let mut is_end = false;
        for c in chars.by_ref() {
            if c == '}' {
                is_end = true;
                break;
            }
            varname.push(c);
        }
        if !is_end || varname.is_empty() {
            bail!("invalid env var name: {}", s);
        }
        let value =
            std::env::var(&varname).with_context(|| format!("env var {} not found", varname))?;
        result.push_str(&value);
    }
    Ok(result)
}

pub fn expand_path(s: &str) -> Result<PathBuf> {
    Ok(PathBuf::from(expand_env_var(s)?))
}
