use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io;

const BIN_NAME: &str = "tenantwatch";

impl From<&Shell> for ClapShell {
    fn from(shell: &Shell) -> Self {
        match shell {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::PowerShell => ClapShell::PowerShell,
            Shell::Elvish => ClapShell::Elvish,
        }
    }
}

/// Where the generated script should go for each shell
fn install_hint(shell: &Shell) -> &'static str {
    match shell {
        Shell::Bash => "Add to ~/.bashrc:\n#   eval \"$(tenantwatch completions bash)\"",
        Shell::Zsh => {
            "Save to ~/.zfunc/_tenantwatch and add to ~/.zshrc:\n#   fpath=(~/.zfunc $fpath)"
        }
        Shell::Fish => {
            "Save to fish completion directory:\n#   tenantwatch completions fish > ~/.config/fish/completions/tenantwatch.fish"
        }
        Shell::PowerShell => {
            "Add to PowerShell profile:\n#   tenantwatch completions powershell | Out-String | Invoke-Expression"
        }
        Shell::Elvish => "Add to Elvish config:\n#   eval (tenantwatch completions elvish | slurp)",
    }
}

pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    tracing::debug!("Generating completion file for {:?}", shell);
    generate(ClapShell::from(&shell), &mut cmd, BIN_NAME, &mut io::stdout());
    eprintln!("\n# {}", install_hint(&shell));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_script_for_every_shell() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            let mut buffer = Vec::new();
            generate(ClapShell::from(&shell), &mut Cli::command(), BIN_NAME, &mut buffer);
            let script = String::from_utf8(buffer).unwrap();
            assert!(script.contains(BIN_NAME), "{:?}", shell);
            assert!(install_hint(&shell).contains("tenantwatch"));
        }
    }
}
