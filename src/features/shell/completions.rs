//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, elvish and PowerShell.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::HabitError;

/// Binary name used in generated scripts.
const BIN_NAME: &str = "habitrack";

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns `HabitError::Parse` if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, HabitError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).map_err(|e| HabitError::Parse(format!("UTF-8 error: {e}")))
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(habitrack completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
habitrack completions zsh > ~/.zsh/completions/_habitrack
# Then add to ~/.zshrc:
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
habitrack completions fish > ~/.config/fish/completions/habitrack.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
habitrack completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish completions directory:
habitrack completions elvish > ~/.elvish/lib/habitrack.elv
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_bash_completions() {
        let script = generate_completions(Shell::Bash).unwrap();
        assert!(script.contains("habitrack"));
        assert!(script.contains("complete"));
    }

    #[test]
    fn test_generate_fish_completions() {
        let script = generate_completions(Shell::Fish).unwrap();
        assert!(script.contains("toggle"));
    }

    #[test]
    fn test_completion_instructions_not_empty() {
        assert!(completion_install_instructions(Shell::Bash).contains("habitrack"));
        assert!(completion_install_instructions(Shell::Zsh).contains("compinit"));
        assert!(!completion_install_instructions(Shell::Fish).is_empty());
    }
}
