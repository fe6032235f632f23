use crate::error::ConvertError;
use std::path::Path;
use tokio::process::Command;

/// An external converter command line such as
/// `python3 /opt/convert.py {input} {output}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    parts: Vec<String>,
}

impl CommandTemplate {
    pub fn parse(template: &str) -> Result<Self, ConvertError> {
        let parts = split_command(template);
        if parts.is_empty() {
            return Err(ConvertError::CommandEmpty);
        }
        Ok(CommandTemplate { parts })
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Substitutes `{input}`, `{output}` and `{workdir}` in every argument.
    pub fn expand(&self, input: &Path, output: &Path, workdir: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let workdir = workdir.to_string_lossy();

        self.parts
            .iter()
            .map(|part| {
                part.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace("{workdir}", &workdir)
            })
            .collect()
    }

    pub async fn run(&self, input: &Path, output: &Path, workdir: &Path) -> Result<(), ConvertError> {
        let expanded = self.expand(input, output, workdir);
        let (program, args) = expanded.split_first().ok_or(ConvertError::CommandEmpty)?;
        if program.is_empty() {
            return Err(ConvertError::CommandEmpty);
        }

        log::info!("running converter: {} {}", program, args.join(" "));
        let result = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| ConvertError::CommandSpawn {
                program: program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConvertError::CommandFailed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Splits on spaces outside quotes. A quote opened by `"` or `'` is only
/// closed by the same character and the quote characters are dropped.
pub fn split_command(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in command.trim().chars() {
        match (ch, quote) {
            ('"' | '\'', None) => quote = Some(ch),
            (c, Some(q)) if c == q => quote = None,
            (' ', None) => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
