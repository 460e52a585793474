use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// Read the whole input: a file, stdin for `-`, or piped stdin when no file
/// is given.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        Some(_) => read_stdin(),
        None if io::stdin().is_terminal() => {
            bail!("no input: pass a file, '-' for stdin, or pipe content in")
        }
        None => read_stdin(),
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .wrap_err("failed to read stdin")?;
    Ok(buffer)
}
